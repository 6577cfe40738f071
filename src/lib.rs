//! Accessibility checks for HTML: missing or generic alt text, small font
//! sizes and low color contrast, each reported against a WCAG criterion.
//!
//! ```no_run
//! use a11y_lint::Engine;
//!
//! let engine = Engine::new(None);
//! let report = engine.analyze_html(r#"<img src="x.png">"#).unwrap();
//! println!("{}", report.to_text());
//! ```

pub mod checks;
pub mod color;
pub mod config;
pub mod dom;
pub mod loader;
pub mod report;
pub mod session;
pub mod wcag;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

pub use checks::Rule;
pub use config::{EngineConfig, LoaderOptions, MatchMode};
pub use dom::{Document, Element, ElementRef};
pub use loader::{ContentLoader, Fetch, HttpFetcher, Input, LoadedDocument, SourceKind};
pub use report::{OutputFormat, Report, Summary};
pub use session::{InputMode, Session, Submission};
pub use wcag::{Level, WcagCriterion};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Please provide a URL or HTML content to analyze")]
    EmptyInput,
    #[error("Invalid input format: expected an http(s) URL or HTML content")]
    InvalidInput,
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Unsupported URL scheme '{0}': only http and https are allowed")]
    DisallowedScheme(String),
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("HTTP Error {0}")]
    HttpStatus(u16),
    #[error("Error parsing HTML: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A problem with a single element that stops it from being checked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("malformed {property} value '{value}'")]
    MalformedStyle { property: String, value: String },
    #[error("unexpected element shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

// Variant order is alphabetical by the kebab-case name; report ordering relies on it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AltText,
    ColorContrast,
    FontSize,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::AltText => write!(f, "alt-text"),
            Category::ColorContrast => write!(f, "color-contrast"),
            Category::FontSize => write!(f, "font-size"),
        }
    }
}

/// One accessibility problem. Built by a check and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    category: Category,
    severity: Severity,
    message: String,
    wcag: WcagCriterion,
    suggestion: String,
    element: Option<ElementRef>,
}

impl Finding {
    pub fn new(
        category: Category,
        severity: Severity,
        wcag: WcagCriterion,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            wcag,
            suggestion: String::new(),
            element: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_element(mut self, element: &Element) -> Self {
        self.element = Some(element.reference());
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn wcag(&self) -> WcagCriterion {
        self.wcag
    }

    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    pub fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }
}

pub struct Engine {
    pub(crate) rules: Vec<Box<dyn Rule>>,
    config: EngineConfig,
}

impl Engine {
    /// An engine with the built-in checks registered.
    pub fn new(config: Option<EngineConfig>) -> Self {
        Self::with_rules(checks::builtin(), config)
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>, config: Option<EngineConfig>) -> Self {
        Self {
            rules,
            config: config.unwrap_or_default(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Runs every registered check over `document`.
    ///
    /// An element that a check cannot interpret is left out of the report
    /// entirely and noted in the report's warnings.
    pub fn analyze(&self, document: &Document) -> Report {
        let mut findings = Vec::new();
        let mut warnings = Vec::new();
        let mut skipped = Vec::new();

        for element in document.elements() {
            match self.inspect_element(element) {
                Ok(element_findings) => findings.extend(element_findings),
                Err(err) => {
                    skipped.push(element.index());
                    warn!(
                        element = element.index(),
                        tag = element.tag_name(),
                        error = %err,
                        "skipping element"
                    );
                    warnings.push(format!(
                        "Skipped element {} (<{}>): {}",
                        element.index(),
                        element.tag_name(),
                        err
                    ));
                }
            }
        }

        // Document-level rules only see elements that passed inspection.
        let checked;
        let document = if skipped.is_empty() {
            document
        } else {
            checked = document.without(&skipped);
            &checked
        };

        for rule in &self.rules {
            let document_findings = rule.inspect_document(document, &self.config);
            check_categories(rule.as_ref(), &document_findings);
            debug!(
                rule = rule.name(),
                count = document_findings.len(),
                "document-level findings"
            );
            findings.extend(document_findings);
        }

        Report::new(findings, warnings)
    }

    fn inspect_element(&self, element: &Element) -> Result<Vec<Finding>, AnalysisError> {
        if element.tag_name().is_empty() {
            return Err(AnalysisError::UnexpectedShape(
                "element has no tag name".to_string(),
            ));
        }

        let mut findings = Vec::new();
        for rule in &self.rules {
            let found = rule.inspect(element, &self.config)?;
            check_categories(rule.as_ref(), &found);
            if !found.is_empty() {
                debug!(
                    rule = rule.name(),
                    element = element.index(),
                    count = found.len(),
                    "findings"
                );
            }
            findings.extend(found);
        }
        Ok(findings)
    }

    /// Parses `html` and analyzes it.
    pub fn analyze_html(&self, html: &str) -> Result<Report, LoadError> {
        let document = Document::parse(html)?;
        Ok(self.analyze(&document).with_source(SourceKind::RawHtml))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Some(EngineConfig::from_json(json)?)))
    }

    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Some(EngineConfig::from_json_file(path)?)))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }
}

fn check_categories(rule: &dyn Rule, findings: &[Finding]) {
    debug_assert!(
        findings.iter().all(|f| f.category() == rule.category()),
        "rule {} emitted a finding outside its {} category",
        rule.name(),
        rule.category()
    );
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(None)
    }
}
