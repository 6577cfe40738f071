use crate::checks::Rule;
use crate::dom::{resolve_font_size, FontSize};
use crate::{AnalysisError, Category, Element, EngineConfig, Finding, Severity, WcagCriterion};

/// Inline font sizes below the configured minimum, WCAG 1.4.4 Resize Text.
///
/// Only sizes that resolve to absolute pixels are judged. Relative sizes
/// depend on layout context and elements without a declared size are
/// assumed to use the base size, so neither produces a finding.
pub struct FontSizeCheck;

impl Rule for FontSizeCheck {
    fn name(&self) -> &str {
        "font-size"
    }

    fn category(&self) -> Category {
        Category::FontSize
    }

    fn inspect(
        &self,
        element: &Element,
        config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError> {
        let Some(value) = element.style().font_size() else {
            return Ok(Vec::new());
        };
        if !element.is_text_bearing() {
            return Ok(Vec::new());
        }

        let px = match resolve_font_size(value)? {
            FontSize::Absolute(px) => px,
            FontSize::Relative | FontSize::Indeterminate => return Ok(Vec::new()),
        };
        if px >= config.min_font_size_px {
            return Ok(Vec::new());
        }

        let finding = Finding::new(
            Category::FontSize,
            Severity::Medium,
            WcagCriterion::ResizeText,
            format!(
                "font size {} (≈{:.1}px) is below the {}px minimum and may be hard to read",
                value, px, config.min_font_size_px
            ),
        )
        .with_suggestion(format!(
            "Use at least {}px for body text (14px+ recommended) and make sure text \
             can be zoomed to 200% without loss of content",
            config.min_font_size_px
        ))
        .with_element(element);

        Ok(vec![finding])
    }
}

/// Very long unbroken text blocks.
pub struct LongTextCheck;

impl Rule for LongTextCheck {
    fn name(&self) -> &str {
        "long-text"
    }

    fn category(&self) -> Category {
        Category::FontSize
    }

    fn inspect(
        &self,
        element: &Element,
        config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError> {
        if !config.is_long_text_tag(element.tag_name()) {
            return Ok(Vec::new());
        }
        let length = element.own_text().chars().count();
        if length <= config.long_text_threshold {
            return Ok(Vec::new());
        }

        let finding = Finding::new(
            Category::FontSize,
            Severity::Low,
            WcagCriterion::Location,
            format!(
                "very long text block ({} characters) may hurt readability",
                length
            ),
        )
        .with_suggestion(
            "Break up long text blocks with headings, bullet points, or shorter paragraphs",
        )
        .with_element(element);

        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(tag: &str, style: &str, text: &str) -> Element {
        Element::new(tag).with_attr("style", style).with_text(text)
    }

    fn check(element: &Element) -> Result<Vec<Finding>, AnalysisError> {
        FontSizeCheck.inspect(element, &EngineConfig::default())
    }

    #[test]
    fn test_small_absolute_size_is_flagged() {
        let findings = check(&styled("p", "font-size: 8px", "tiny")).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Medium);
        assert_eq!(findings[0].wcag().id(), "1.4.4");
        assert!(findings[0].message().contains("8px"));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(check(&styled("p", "font-size: 12px", "ok")).unwrap().is_empty());
        assert!(check(&styled("p", "font-size: 14px", "ok")).unwrap().is_empty());
        assert_eq!(check(&styled("p", "font-size: 11.9px", "no")).unwrap().len(), 1);
    }

    #[test]
    fn test_points_are_converted() {
        // 8pt is about 10.7px.
        assert_eq!(check(&styled("p", "font-size: 8pt", "small")).unwrap().len(), 1);
        assert!(check(&styled("p", "font-size: 9pt", "fine")).unwrap().is_empty());
    }

    #[test]
    fn test_relative_sizes_are_not_judged() {
        for size in ["0.5em", "0.5rem", "50%", "smaller", "1vw"] {
            let findings = check(&styled("p", &format!("font-size: {}", size), "x")).unwrap();
            assert!(findings.is_empty(), "size {} should be skipped", size);
        }
    }

    #[test]
    fn test_missing_size_and_empty_elements_are_skipped() {
        assert!(check(&styled("p", "color: red", "text")).unwrap().is_empty());
        assert!(check(&styled("div", "font-size: 6px", "")).unwrap().is_empty());
    }

    #[test]
    fn test_configured_minimum() {
        let config = EngineConfig {
            min_font_size_px: 16.0,
            ..EngineConfig::default()
        };
        let element = styled("p", "font-size: 14px", "text");
        assert_eq!(FontSizeCheck.inspect(&element, &config).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_size_is_an_error() {
        let err = check(&styled("p", "font-size: 12foo", "x")).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedStyle { .. }));
    }

    #[test]
    fn test_long_text_blocks() {
        let config = EngineConfig::default();
        let long = "word ".repeat(120);
        let findings = LongTextCheck
            .inspect(&Element::new("p").with_text(&long), &config)
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Low);
        assert_eq!(findings[0].wcag().id(), "2.4.8");

        let short = LongTextCheck
            .inspect(&Element::new("p").with_text("short"), &config)
            .unwrap();
        assert!(short.is_empty());

        let other_tag = LongTextCheck
            .inspect(&Element::new("h1").with_text(&long), &config)
            .unwrap();
        assert!(other_tag.is_empty());
    }
}
