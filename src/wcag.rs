use serde::{Deserialize, Serialize};
use std::fmt;

const UNDERSTANDING_BASE: &str = "https://www.w3.org/WAI/WCAG21/Understanding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    A,
    AA,
    AAA,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::A => write!(f, "A"),
            Level::AA => write!(f, "AA"),
            Level::AAA => write!(f, "AAA"),
        }
    }
}

/// The WCAG 2.1 success criteria a finding may cite.
///
/// Findings hold one of these variants rather than a free-form string, so a
/// finding without a known reference cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WcagCriterion {
    #[serde(rename = "1.1.1")]
    NonTextContent,
    #[serde(rename = "1.4.1")]
    UseOfColor,
    #[serde(rename = "1.4.3")]
    ContrastMinimum,
    #[serde(rename = "1.4.4")]
    ResizeText,
    #[serde(rename = "2.4.8")]
    Location,
}

impl WcagCriterion {
    pub const ALL: [WcagCriterion; 5] = [
        WcagCriterion::NonTextContent,
        WcagCriterion::UseOfColor,
        WcagCriterion::ContrastMinimum,
        WcagCriterion::ResizeText,
        WcagCriterion::Location,
    ];

    pub fn id(self) -> &'static str {
        match self {
            WcagCriterion::NonTextContent => "1.1.1",
            WcagCriterion::UseOfColor => "1.4.1",
            WcagCriterion::ContrastMinimum => "1.4.3",
            WcagCriterion::ResizeText => "1.4.4",
            WcagCriterion::Location => "2.4.8",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WcagCriterion::NonTextContent => "Non-text Content",
            WcagCriterion::UseOfColor => "Use of Color",
            WcagCriterion::ContrastMinimum => "Contrast (Minimum)",
            WcagCriterion::ResizeText => "Resize Text",
            WcagCriterion::Location => "Location",
        }
    }

    pub fn level(self) -> Level {
        match self {
            WcagCriterion::NonTextContent | WcagCriterion::UseOfColor => Level::A,
            WcagCriterion::ContrastMinimum | WcagCriterion::ResizeText => Level::AA,
            WcagCriterion::Location => Level::AAA,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            WcagCriterion::NonTextContent => "non-text-content",
            WcagCriterion::UseOfColor => "use-of-color",
            WcagCriterion::ContrastMinimum => "contrast-minimum",
            WcagCriterion::ResizeText => "resize-text",
            WcagCriterion::Location => "location",
        }
    }

    /// Link to the W3C "Understanding" page for this criterion.
    pub fn url(self) -> String {
        format!("{}/{}.html", UNDERSTANDING_BASE, self.slug())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id.trim())
    }
}

impl fmt::Display for WcagCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WCAG 2.1 Level {} - {} {}",
            self.level(),
            self.id(),
            self.title()
        )
    }
}
