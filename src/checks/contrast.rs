//! Color contrast between inline text and background colors.
//!
//! Only explicitly declared colors on the same element are compared; there is
//! no cascade, so an element that sets one color and inherits the other is
//! not judged.

use crate::checks::Rule;
use crate::color::{contrast_ratio, parse_color};
use crate::dom::{is_bold, resolve_font_size, FontSize};
use crate::{
    AnalysisError, Category, Document, Element, EngineConfig, Finding, Severity, WcagCriterion,
};

/// WCAG 1.4.3 Contrast (Minimum).
pub struct ContrastCheck;

impl ContrastCheck {
    fn is_large_text(element: &Element, config: &EngineConfig) -> Result<bool, AnalysisError> {
        let px = match element.style().font_size() {
            Some(value) => match resolve_font_size(value)? {
                FontSize::Absolute(px) => px,
                FontSize::Relative | FontSize::Indeterminate => return Ok(false),
            },
            None => config.base_font_size_px,
        };
        let bold = element.style().font_weight().is_some_and(is_bold)
            || matches!(element.tag_name(), "b" | "strong" | "th")
            || is_heading(element.tag_name());

        Ok(px >= config.large_text_px || (bold && px >= config.large_bold_text_px))
    }
}

fn is_heading(tag_name: &str) -> bool {
    matches!(tag_name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

impl Rule for ContrastCheck {
    fn name(&self) -> &str {
        "color-contrast"
    }

    fn category(&self) -> Category {
        Category::ColorContrast
    }

    fn inspect(
        &self,
        element: &Element,
        config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError> {
        let style = element.style();
        let (Some(fg_value), Some((bg_property, bg_value))) =
            (style.color(), style.background_declaration())
        else {
            return Ok(Vec::new());
        };

        let fg = parse_color("color", fg_value)?;
        let bg = if bg_property == "background" {
            // The shorthand may carry images or positions; only a bare color
            // is comparable and anything else is indeterminate.
            parse_color(bg_property, bg_value).ok().flatten()
        } else {
            parse_color(bg_property, bg_value)?
        };
        let (Some(fg), Some(bg)) = (fg, bg) else {
            return Ok(Vec::new());
        };

        let ratio = contrast_ratio(fg, bg);
        let large = Self::is_large_text(element, config)?;
        let (required, severity, size_label) = if large {
            (config.large_contrast_ratio, Severity::Medium, "large")
        } else {
            (config.normal_contrast_ratio, Severity::High, "normal")
        };

        if ratio >= required {
            return Ok(Vec::new());
        }

        let finding = Finding::new(
            Category::ColorContrast,
            severity,
            WcagCriterion::ContrastMinimum,
            format!(
                "text color \"{}\" on background \"{}\" has a contrast ratio of {:.2}:1, \
                 below the {}:1 minimum for {} text",
                fg_value, bg_value, ratio, required, size_label
            ),
        )
        .with_suggestion(format!(
            "Increase the contrast between text and background to at least {}:1 \
             (7:1 for AAA); avoid similar shades for text and background",
            required
        ))
        .with_element(element);

        Ok(vec![finding])
    }
}

/// Pages that lean heavily on color, WCAG 1.4.1 Use of Color.
pub struct ColorDependencyCheck;

impl Rule for ColorDependencyCheck {
    fn name(&self) -> &str {
        "color-dependency"
    }

    fn category(&self) -> Category {
        Category::ColorContrast
    }

    fn inspect(
        &self,
        _element: &Element,
        _config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError> {
        Ok(Vec::new())
    }

    fn inspect_document(&self, document: &Document, config: &EngineConfig) -> Vec<Finding> {
        let colored = document
            .elements()
            .iter()
            .filter(|e| e.style().color().is_some())
            .count();

        if colored <= config.color_dependency_threshold {
            return Vec::new();
        }

        vec![Finding::new(
            Category::ColorContrast,
            Severity::Medium,
            WcagCriterion::UseOfColor,
            format!(
                "{} elements set an inline text color; make sure information is not \
                 conveyed by color alone",
                colored
            ),
        )
        .with_suggestion(
            "Don't rely solely on color to convey information - use icons, text, or patterns too",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(style: &str) -> Element {
        Element::new("p").with_attr("style", style).with_text("hi")
    }

    fn check(element: &Element) -> Result<Vec<Finding>, AnalysisError> {
        ContrastCheck.inspect(element, &EngineConfig::default())
    }

    #[test]
    fn test_low_contrast_normal_text_is_high() {
        let findings = check(&styled("color:#777;background-color:#888;font-size:14px")).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::High);
        assert_eq!(findings[0].wcag().id(), "1.4.3");
        assert_eq!(findings[0].category(), Category::ColorContrast);
    }

    #[test]
    fn test_sufficient_contrast_passes() {
        assert!(check(&styled("color: black; background-color: white")).unwrap().is_empty());
        assert!(check(&styled("color: #767676; background-color: #fff")).unwrap().is_empty());
    }

    #[test]
    fn test_large_text_uses_lower_threshold() {
        // #949494 on white is about 3.03:1.
        let large = styled("color:#949494;background-color:#fff;font-size:24px");
        assert!(check(&large).unwrap().is_empty());

        let large_low = styled("color:#aaa;background-color:#fff;font-size:32px");
        let findings = check(&large_low).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Medium);

        let normal = styled("color:#949494;background-color:#fff;font-size:16px");
        assert_eq!(check(&normal).unwrap()[0].severity(), Severity::High);
    }

    #[test]
    fn test_bold_text_counts_as_large_from_14pt() {
        let bold = styled("color:#949494;background-color:#fff;font-size:19px;font-weight:bold");
        assert!(check(&bold).unwrap().is_empty());
    }

    #[test]
    fn test_requires_both_colors() {
        assert!(check(&styled("color: #777")).unwrap().is_empty());
        assert!(check(&styled("background-color: #777")).unwrap().is_empty());
        assert!(check(&Element::new("p").with_text("plain")).unwrap().is_empty());
    }

    #[test]
    fn test_indeterminate_colors_are_skipped() {
        assert!(check(&styled("color: inherit; background-color: #fff")).unwrap().is_empty());
        assert!(check(&styled("color: #eee; background-color: transparent")).unwrap().is_empty());
        let image_background = styled("color: #eee; background: url(bg.png) no-repeat");
        assert!(check(&image_background).unwrap().is_empty());
    }

    #[test]
    fn test_background_shorthand_color() {
        let findings = check(&styled("color: yellow; background: white")).unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_composite_shorthand_is_indeterminate() {
        let style = "background-color:#000; background: #fff url(x.png) no-repeat; color:#111";
        assert!(check(&styled(style)).unwrap().is_empty());
        assert!(check(&styled("color: #111; background: #12")).unwrap().is_empty());

        let err = check(&styled("color: #111; background-color: #12")).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedStyle { property, .. } if property == "background-color"
        ));
    }

    #[test]
    fn test_malformed_color_is_an_error() {
        let err = check(&styled("color: #12; background-color: #fff")).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedStyle {
                property: "color".to_string(),
                value: "#12".to_string()
            }
        );
    }

    #[test]
    fn test_swapping_colors_gives_same_result() {
        let a = check(&styled("color:#336;background-color:#99c")).unwrap();
        let b = check(&styled("color:#99c;background-color:#336")).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].severity(), b[0].severity());
    }

    #[test]
    fn test_color_dependency_threshold() {
        let config = EngineConfig::default();
        let many: Vec<_> = (0..6).map(|_| styled("color: red")).collect();
        let findings =
            ColorDependencyCheck.inspect_document(&Document::from_elements(many), &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].wcag().id(), "1.4.1");
        assert!(findings[0].element().is_none());

        let few: Vec<_> = (0..5).map(|_| styled("color: red")).collect();
        assert!(ColorDependencyCheck
            .inspect_document(&Document::from_elements(few), &config)
            .is_empty());
    }
}
