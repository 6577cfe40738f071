//! Ordering and rendering of findings.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::loader::SourceKind;
use crate::{Finding, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The result of one analysis: findings in priority order plus any
/// elements that had to be skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    source: Option<SourceKind>,
    summary: Summary,
    findings: Vec<Finding>,
    warnings: Vec<String>,
}

// Severity descending, then category, then document order. Findings with no
// element sort after those with one.
fn priority(a: &Finding, b: &Finding) -> Ordering {
    b.severity()
        .cmp(&a.severity())
        .then_with(|| a.category().cmp(&b.category()))
        .then_with(|| {
            match (a.element(), b.element()) {
                (Some(x), Some(y)) => x.index.cmp(&y.index),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        })
}

impl Report {
    pub fn new(mut findings: Vec<Finding>, warnings: Vec<String>) -> Self {
        findings.sort_by(priority);

        let count = |severity| findings.iter().filter(|f| f.severity() == severity).count();
        let summary = Summary {
            total: findings.len(),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
        };

        Self {
            source: None,
            summary,
            findings,
            warnings,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn source(&self) -> Option<&SourceKind> {
        self.source.as_ref()
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_high_severity(&self) -> bool {
        self.summary.high > 0
    }

    /// Distinct suggestions, in the order their findings appear.
    pub fn recommendations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for finding in &self.findings {
            let suggestion = finding.suggestion();
            if !suggestion.is_empty() && !seen.contains(&suggestion) {
                seen.push(suggestion);
            }
        }
        seen
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => self.to_json(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();

        if self.findings.is_empty() {
            output.push_str("No major accessibility issues detected.\n");
            self.push_warnings(&mut output);
            return output;
        }

        output.push_str("## Accessibility Analysis Report\n\n");
        output.push_str(&format!("**Issues Found:** {}\n", self.findings.len()));
        if let Some(source) = &self.source {
            output.push_str(&format!("**Source:** {}\n", source));
        }
        output.push('\n');

        for (severity, heading) in [
            (Severity::High, "High Priority Issues"),
            (Severity::Medium, "Medium Priority Issues"),
            (Severity::Low, "Low Priority Issues"),
        ] {
            let mut group = self
                .findings
                .iter()
                .filter(|f| f.severity() == severity)
                .peekable();
            if group.peek().is_none() {
                continue;
            }

            output.push_str(&format!("### {}\n\n", heading));
            for finding in group {
                push_finding(&mut output, finding);
            }
        }

        let recommendations = self.recommendations();
        if !recommendations.is_empty() {
            output.push_str("## Recommended Actions\n\n");
            for (i, suggestion) in recommendations.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, suggestion));
            }
        }

        self.push_warnings(&mut output);
        output
    }

    fn push_warnings(&self, output: &mut String) {
        if self.warnings.is_empty() {
            return;
        }
        output.push_str("\n## Warnings\n\n");
        for warning in &self.warnings {
            output.push_str(&format!("- {}\n", warning));
        }
    }
}

fn push_finding(output: &mut String, finding: &Finding) {
    let location = finding
        .element()
        .map(|e| e.source.clone())
        .unwrap_or_else(|| "whole document".to_string());
    output.push_str(&format!(
        "**[{}] {}** - {}\n",
        finding.severity(),
        finding.category(),
        location
    ));
    output.push_str(&format!("- {}\n", finding.message()));
    if !finding.suggestion().is_empty() {
        output.push_str(&format!("- Suggestion: {}\n", finding.suggestion()));
    }
    output.push_str(&format!(
        "- Standard: [{}]({})\n\n",
        finding.wcag(),
        finding.wcag().url()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Element, WcagCriterion};

    fn finding(category: Category, severity: Severity, index: usize) -> Finding {
        let elements: Vec<_> = (0..=index).map(|_| Element::new("p")).collect();
        let doc = crate::Document::from_elements(elements);
        Finding::new(category, severity, WcagCriterion::ContrastMinimum, "m")
            .with_suggestion(format!("fix {:?}", category))
            .with_element(&doc.elements()[index])
    }

    #[test]
    fn test_orders_by_severity_descending() {
        let report = Report::new(
            vec![
                finding(Category::AltText, Severity::Low, 0),
                finding(Category::AltText, Severity::High, 1),
                finding(Category::AltText, Severity::Medium, 2),
            ],
            Vec::new(),
        );
        let severities: Vec<_> = report.findings().iter().map(Finding::severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Medium, Severity::Low]);
    }

    #[test]
    fn test_ties_break_on_category_then_document_order() {
        let report = Report::new(
            vec![
                finding(Category::FontSize, Severity::Medium, 0),
                finding(Category::AltText, Severity::Medium, 5),
                finding(Category::AltText, Severity::Medium, 2),
                Finding::new(Category::AltText, Severity::Medium, WcagCriterion::UseOfColor, "doc"),
            ],
            Vec::new(),
        );
        let keys: Vec<_> = report
            .findings()
            .iter()
            .map(|f| (f.category(), f.element().map(|e| e.index)))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Category::AltText, Some(2)),
                (Category::AltText, Some(5)),
                (Category::AltText, None),
                (Category::FontSize, Some(0)),
            ]
        );
    }

    #[test]
    fn test_summary_and_recommendations() {
        let report = Report::new(
            vec![
                finding(Category::AltText, Severity::High, 0),
                finding(Category::AltText, Severity::High, 1),
                finding(Category::FontSize, Severity::Low, 2),
            ],
            Vec::new(),
        );
        assert_eq!(
            report.summary(),
            Summary {
                total: 3,
                high: 2,
                medium: 0,
                low: 1
            }
        );
        assert_eq!(report.recommendations(), vec!["fix AltText", "fix FontSize"]);
        assert!(report.has_high_severity());
    }

    #[test]
    fn test_text_rendering_groups_and_links() {
        let report = Report::new(vec![finding(Category::AltText, Severity::High, 0)], Vec::new())
            .with_source(SourceKind::RawHtml);
        let text = report.to_text();
        assert!(text.contains("**Issues Found:** 1"));
        assert!(text.contains("**Source:** Raw HTML"));
        assert!(text.contains("### High Priority Issues"));
        assert!(!text.contains("### Low Priority Issues"));
        assert!(
            text.contains("(https://www.w3.org/WAI/WCAG21/Understanding/contrast-minimum.html)")
        );
        assert!(text.contains("1. fix AltText"));
    }

    #[test]
    fn test_empty_report_text() {
        let report = Report::new(Vec::new(), vec!["Skipped element 3".to_string()]);
        let text = report.to_text();
        assert!(text.starts_with("No major accessibility issues detected."));
        assert!(text.contains("- Skipped element 3"));
    }

    #[test]
    fn test_json_rendering() {
        let report = Report::new(
            vec![finding(Category::ColorContrast, Severity::High, 0)],
            Vec::new(),
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["high"], 1);
        assert_eq!(value["findings"][0]["category"], "color-contrast");
        assert_eq!(value["findings"][0]["severity"], "high");
        assert_eq!(value["findings"][0]["wcag"], "1.4.3");
        assert_eq!(value["findings"][0]["element"]["tag_name"], "p");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }
}
