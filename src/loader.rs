//! Turns user input (a URL or literal HTML) into a [`Document`].
//!
//! Fetching is a single blocking GET with a timeout and no retries.

use reqwest::Url;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{Document, LoadError, LoaderOptions};

/// What the user asked to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Url(String),
    Html(String),
}

impl Input {
    /// Classifies free-form text as HTML or a URL.
    ///
    /// Text starting with `<` and containing `>` is HTML; `http://`,
    /// `https://` and bare `www.` prefixes are URLs. Other schemes are
    /// rejected rather than guessed at.
    pub fn detect(text: &str) -> Result<Self, LoadError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        if text.starts_with('<') && text.contains('>') {
            return Ok(Input::Html(text.to_string()));
        }

        let lower = text.to_ascii_lowercase();
        if ["http://", "https://", "www."]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        {
            return Ok(Input::Url(text.to_string()));
        }
        if let Some((scheme, _)) = lower.split_once("://") {
            let looks_like_scheme = !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c));
            if looks_like_scheme {
                return Err(LoadError::DisallowedScheme(scheme.to_string()));
            }
        }

        Err(LoadError::InvalidInput)
    }
}

/// Where an analyzed document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum SourceKind {
    Url(String),
    RawHtml,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Url(url) => write!(f, "URL ({})", url),
            SourceKind::RawHtml => write!(f, "Raw HTML"),
        }
    }
}

/// Validates a user-supplied URL, adding `https://` to bare `www.` hosts.
pub fn normalize_url(raw: &str) -> Result<Url, LoadError> {
    let raw = raw.trim();
    let candidate = if raw.to_ascii_lowercase().starts_with("www.") {
        format!("https://{}", raw)
    } else {
        raw.to_string()
    };

    let url = Url::parse(&candidate).map_err(|e| LoadError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(LoadError::DisallowedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(LoadError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Retrieves the body of a URL.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<String, LoadError>;
}

pub struct HttpFetcher {
    options: LoaderOptions,
}

impl HttpFetcher {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.options.timeout())
            .user_agent(self.options.user_agent.as_str())
            .build()
            .map_err(|e| LoadError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let response = client.get(url.clone()).send().map_err(|e| {
            if e.is_timeout() {
                LoadError::Timeout(self.options.timeout_secs)
            } else {
                LoadError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| LoadError::Network(format!("Failed to read response body: {}", e)))
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub source: SourceKind,
}

pub struct ContentLoader<F: Fetch = HttpFetcher> {
    fetcher: F,
}

impl ContentLoader<HttpFetcher> {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            fetcher: HttpFetcher::new(options),
        }
    }
}

impl Default for ContentLoader<HttpFetcher> {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl<F: Fetch> ContentLoader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn load(&self, input: &Input) -> Result<LoadedDocument, LoadError> {
        match input {
            Input::Html(html) => {
                if html.trim().is_empty() {
                    return Err(LoadError::EmptyInput);
                }
                let document = Document::parse(html)?;
                debug!(elements = document.len(), "parsed raw HTML");
                Ok(LoadedDocument {
                    document,
                    source: SourceKind::RawHtml,
                })
            }
            Input::Url(raw) => {
                if raw.trim().is_empty() {
                    return Err(LoadError::EmptyInput);
                }
                let url = normalize_url(raw)?;
                info!(url = %url, "fetching");
                let body = self.fetcher.fetch(&url).map_err(|e| {
                    warn!(url = %url, error = %e, "fetch failed");
                    e
                })?;
                let document = Document::parse(&body)?;
                debug!(elements = document.len(), "parsed fetched HTML");
                Ok(LoadedDocument {
                    document,
                    source: SourceKind::Url(url.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves canned responses and remembers what was requested.
    pub(crate) struct StubFetcher {
        pub response: Result<String, u16>,
        pub requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        pub fn ok(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                requested: RefCell::new(Vec::new()),
            }
        }

        pub fn status(code: u16) -> Self {
            Self {
                response: Err(code),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<String, LoadError> {
            self.requested.borrow_mut().push(url.to_string());
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(code) => Err(LoadError::HttpStatus(*code)),
            }
        }
    }

    #[test]
    fn test_detect_html_and_urls() {
        assert_eq!(
            Input::detect("  <p>hi</p> ").unwrap(),
            Input::Html("<p>hi</p>".to_string())
        );
        assert_eq!(
            Input::detect("https://example.com").unwrap(),
            Input::Url("https://example.com".to_string())
        );
        assert_eq!(
            Input::detect("www.example.com").unwrap(),
            Input::Url("www.example.com".to_string())
        );
    }

    #[test]
    fn test_detect_rejects_other_input() {
        assert!(matches!(Input::detect("   "), Err(LoadError::EmptyInput)));
        assert!(matches!(Input::detect("hello world"), Err(LoadError::InvalidInput)));
        assert!(matches!(
            Input::detect("ftp://example.com/file"),
            Err(LoadError::DisallowedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("www.example.com").unwrap().as_str(),
            "https://www.example.com/"
        );
        assert!(matches!(
            normalize_url("file:///etc/passwd"),
            Err(LoadError::DisallowedScheme(s)) if s == "file"
        ));
        assert!(matches!(
            normalize_url("http://"),
            Err(LoadError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_load_url_uses_fetcher() {
        let loader = ContentLoader::with_fetcher(StubFetcher::ok(r#"<img src="a.png">"#));
        let loaded = loader
            .load(&Input::Url("www.example.com".to_string()))
            .unwrap();
        assert_eq!(loaded.source, SourceKind::Url("https://www.example.com/".to_string()));
        assert_eq!(loaded.document.find_by_tag("img").count(), 1);
        assert_eq!(
            *loader.fetcher.requested.borrow(),
            vec!["https://www.example.com/".to_string()]
        );
    }

    #[test]
    fn test_load_surfaces_http_errors() {
        let loader = ContentLoader::with_fetcher(StubFetcher::status(404));
        let err = loader
            .load(&Input::Url("https://example.com/missing".to_string()))
            .unwrap_err();
        assert!(matches!(err, LoadError::HttpStatus(404)));
        assert_eq!(err.to_string(), "HTTP Error 404");
    }

    #[test]
    fn test_disallowed_scheme_never_reaches_fetcher() {
        let loader = ContentLoader::with_fetcher(StubFetcher::ok(""));
        let err = loader
            .load(&Input::Url("javascript:alert(1)".to_string()))
            .unwrap_err();
        assert!(matches!(err, LoadError::DisallowedScheme(_)));
        assert!(loader.fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn test_unreachable_host_is_a_load_error() {
        let options = LoaderOptions {
            timeout_secs: 2,
            ..LoaderOptions::default()
        };
        let loader = ContentLoader::new(options);
        // Port 9 (discard) on loopback is expected to refuse the connection.
        let result = loader.load(&Input::Url("http://127.0.0.1:9/".to_string()));
        assert!(matches!(
            result,
            Err(LoadError::Network(_)) | Err(LoadError::Timeout(_))
        ));
    }
}
