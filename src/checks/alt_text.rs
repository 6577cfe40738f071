use crate::checks::Rule;
use crate::{AnalysisError, Category, Element, EngineConfig, Finding, Severity, WcagCriterion};

/// Image alt text, WCAG 1.1.1 Non-text Content.
pub struct AltTextCheck;

impl AltTextCheck {
    fn is_decorative(element: &Element, config: &EngineConfig) -> bool {
        let by_role = element
            .attr("role")
            .is_some_and(|role| config.is_decorative_role(role));
        let hidden = element
            .attr("aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        by_role || hidden
    }

    fn describe(element: &Element) -> String {
        match element.attr("src").map(str::trim).filter(|src| !src.is_empty()) {
            Some(src) => format!("image with src=\"{}\"", src),
            None => "image".to_string(),
        }
    }
}

impl Rule for AltTextCheck {
    fn name(&self) -> &str {
        "alt-text"
    }

    fn category(&self) -> Category {
        Category::AltText
    }

    fn inspect(
        &self,
        element: &Element,
        config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError> {
        if !config.is_image_tag(element.tag_name()) {
            return Ok(Vec::new());
        }

        let finding = match element.attr("alt") {
            None => Some(
                Finding::new(
                    Category::AltText,
                    Severity::High,
                    WcagCriterion::NonTextContent,
                    "image has no alt attribute",
                )
                .with_suggestion(
                    "Add alt text describing the image, or alt=\"\" if it is purely decorative",
                ),
            ),
            Some(alt) if alt.trim().is_empty() => {
                if Self::is_decorative(element, config) {
                    None
                } else {
                    Some(
                        Finding::new(
                            Category::AltText,
                            Severity::Medium,
                            WcagCriterion::NonTextContent,
                            format!(
                                "{} has empty alt text but is not marked decorative",
                                Self::describe(element)
                            ),
                        )
                        .with_suggestion(
                            "Describe the image, or mark it decorative with role=\"presentation\"",
                        ),
                    )
                }
            }
            Some(alt) => config.generic_term_for(alt).map(|term| {
                Finding::new(
                    Category::AltText,
                    Severity::Low,
                    WcagCriterion::NonTextContent,
                    "alt text is generic and non-descriptive",
                )
                .with_suggestion(format!(
                    "Replace \"{}\" on {} with a concise description of what the image \
                     shows (aim for 125 characters or less)",
                    term,
                    Self::describe(element)
                ))
            }),
        };

        Ok(finding
            .map(|f| f.with_element(element))
            .into_iter()
            .collect())
    }
}
