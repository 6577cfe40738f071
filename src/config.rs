use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// How alt text is compared against the generic term list.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Trimmed, lowercased alt text must equal a term.
    #[default]
    Exact,
    /// Lowercased alt text must contain a term.
    Contains,
}

/// Policy tables and thresholds used by the built-in checks.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub image_tags: Vec<String>,
    pub generic_alt_terms: Vec<String>,
    pub generic_alt_match: MatchMode,
    pub decorative_roles: Vec<String>,
    pub min_font_size_px: f64,
    pub base_font_size_px: f64,
    pub large_text_px: f64,
    pub large_bold_text_px: f64,
    pub normal_contrast_ratio: f64,
    pub large_contrast_ratio: f64,
    pub long_text_tags: Vec<String>,
    pub long_text_threshold: usize,
    pub color_dependency_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            image_tags: strings(&["img"]),
            generic_alt_terms: strings(&["image", "photo", "picture", "img"]),
            generic_alt_match: MatchMode::Exact,
            decorative_roles: strings(&["presentation", "none"]),
            min_font_size_px: 12.0,
            base_font_size_px: 16.0,
            large_text_px: 24.0,
            large_bold_text_px: 18.66,
            normal_contrast_ratio: 4.5,
            large_contrast_ratio: 3.0,
            long_text_tags: strings(&["p", "div", "span", "li", "td", "th"]),
            long_text_threshold: 500,
            color_dependency_threshold: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_font_size_px", self.min_font_size_px),
            ("base_font_size_px", self.base_font_size_px),
            ("large_text_px", self.large_text_px),
            ("large_bold_text_px", self.large_bold_text_px),
            ("normal_contrast_ratio", self.normal_contrast_ratio),
            ("large_contrast_ratio", self.large_contrast_ratio),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn is_image_tag(&self, tag: &str) -> bool {
        self.image_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn is_decorative_role(&self, role: &str) -> bool {
        role.split_whitespace()
            .any(|r| self.decorative_roles.iter().any(|d| d.eq_ignore_ascii_case(r)))
    }

    pub(crate) fn is_long_text_tag(&self, tag: &str) -> bool {
        self.long_text_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn generic_term_for(&self, alt: &str) -> Option<&str> {
        let alt = alt.trim().to_lowercase();
        self.generic_alt_terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .find(|term| {
                let term = term.to_lowercase();
                match self.generic_alt_match {
                    MatchMode::Exact => alt == term,
                    MatchMode::Contains => alt.contains(&term),
                }
            })
    }
}

/// Settings for the HTTP side of the content loader.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoaderOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl LoaderOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"min_font_size_px": 14}"#).unwrap();
        assert_eq!(config.min_font_size_px, 14.0);
        assert_eq!(config.normal_contrast_ratio, 4.5);
        assert_eq!(config.generic_alt_terms.len(), 4);
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let err = EngineConfig::from_json(r#"{"large_text_px": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_generic_term_exact_and_contains() {
        let mut config = EngineConfig::default();
        assert_eq!(config.generic_term_for("  Photo "), Some("photo"));
        assert_eq!(config.generic_term_for("photo of a cat"), None);

        config.generic_alt_match = MatchMode::Contains;
        assert_eq!(config.generic_term_for("Photo of a cat"), Some("photo"));
    }

    #[test]
    fn test_decorative_role_tokens() {
        let config = EngineConfig::default();
        assert!(config.is_decorative_role("presentation"));
        assert!(config.is_decorative_role("NONE"));
        assert!(!config.is_decorative_role("img"));
    }
}
