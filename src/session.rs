//! The submit-and-display cycle behind the command line tool.
//!
//! A [`Session`] turns one input into one [`Submission`]. Load failures are
//! reported as a user-facing message next to an empty report; nothing here
//! returns an error or panics.

use serde::Serialize;
use tracing::warn;

use crate::loader::{ContentLoader, Fetch, HttpFetcher, Input};
use crate::report::OutputFormat;
use crate::{Engine, EngineConfig, LoadError, LoaderOptions, Report};

/// How the submitted text should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Auto,
    Url,
    Html,
}

impl InputMode {
    pub fn to_input(self, text: &str) -> Result<Input, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::EmptyInput);
        }
        match self {
            InputMode::Auto => Input::detect(text),
            InputMode::Url => Ok(Input::Url(text.trim().to_string())),
            InputMode::Html => Ok(Input::Html(text.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub report: Report,
}

impl Submission {
    fn failed(err: &LoadError) -> Self {
        Self {
            status: "Error occurred".to_string(),
            error: Some(format!("Error: {}", err)),
            report: Report::empty(),
        }
    }

    fn completed(report: Report) -> Self {
        let status = if report.is_empty() {
            "Accessibility check completed successfully!".to_string()
        } else {
            format!(
                "Analysis completed! Found {} accessibility issues.",
                report.len()
            )
        };
        Self {
            status,
            error: None,
            report,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn issue_count(&self) -> usize {
        self.report.len()
    }

    /// What the user sees: the error message alone on failure, otherwise the
    /// rendered report.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match (format, &self.error) {
            (OutputFormat::Text, Some(error)) => Ok(format!("{}\n", error)),
            (OutputFormat::Text, None) => Ok(self.report.to_text()),
            (OutputFormat::Json, _) => serde_json::to_string_pretty(self),
        }
    }
}

pub struct Session<F: Fetch = HttpFetcher> {
    engine: Engine,
    loader: ContentLoader<F>,
}

impl Session<HttpFetcher> {
    pub fn new(config: EngineConfig, loader_options: LoaderOptions) -> Self {
        Self {
            engine: Engine::new(Some(config)),
            loader: ContentLoader::new(loader_options),
        }
    }
}

impl Default for Session<HttpFetcher> {
    fn default() -> Self {
        Self::new(EngineConfig::default(), LoaderOptions::default())
    }
}

impl<F: Fetch> Session<F> {
    pub fn with_loader(engine: Engine, loader: ContentLoader<F>) -> Self {
        Self { engine, loader }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn submit(&self, mode: InputMode, text: &str) -> Submission {
        let loaded = mode
            .to_input(text)
            .and_then(|input| self.loader.load(&input));

        match loaded {
            Ok(loaded) => {
                let report = self.engine.analyze(&loaded.document).with_source(loaded.source);
                Submission::completed(report)
            }
            Err(err) => {
                warn!(error = %err, "could not load input");
                Submission::failed(&err)
            }
        }
    }
}
