use regex::Regex;
use std::sync::OnceLock;

use crate::AnalysisError;

/// Declarations from an element's `style` attribute, in source order.
///
/// Lookups return the last declaration for a property, matching how the
/// cascade treats repeated declarations inside a single block. `!important`
/// markers are stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(style: &str) -> Self {
        let declarations = split_declarations(style)
            .into_iter()
            .filter_map(|decl| {
                let (property, value) = decl.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = strip_important(value.trim());
                if property.is_empty() || value.is_empty() {
                    return None;
                }
                Some((property, value.to_string()))
            })
            .collect();

        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn font_size(&self) -> Option<&str> {
        self.get("font-size")
    }

    pub fn font_weight(&self) -> Option<&str> {
        self.get("font-weight")
    }

    pub fn color(&self) -> Option<&str> {
        self.get("color")
    }

    /// `background-color` if declared, otherwise the `background` shorthand.
    ///
    /// Whichever of the two was declared last wins, as in CSS.
    pub fn background(&self) -> Option<&str> {
        self.background_declaration().map(|(_, value)| value)
    }

    /// Like [`InlineStyle::background`], but also names the property that
    /// supplied the value.
    pub fn background_declaration(&self) -> Option<(&str, &str)> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == "background-color" || name == "background")
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    }
}

// Splits on `;` outside of parentheses so `url(data:...;base64,...)` stays whole.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// A `font-size` value as far as it can be known without layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Resolved to CSS pixels.
    Absolute(f64),
    /// Depends on the parent or viewport (`em`, `%`, `smaller`, ...).
    Relative,
    /// A cascade keyword such as `inherit`, or an unrecognised identifier.
    Indeterminate,
}

fn length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))([a-z%]*)$").expect("length regex is valid")
    })
}

pub fn resolve_font_size(value: &str) -> Result<FontSize, AnalysisError> {
    let value = value.trim().to_ascii_lowercase();
    let malformed = || AnalysisError::MalformedStyle {
        property: "font-size".to_string(),
        value: value.clone(),
    };

    if let Some(px) = absolute_size_keyword(&value) {
        return Ok(FontSize::Absolute(px));
    }
    match value.as_str() {
        "smaller" | "larger" => return Ok(FontSize::Relative),
        _ => {}
    }
    if ["calc(", "clamp(", "min(", "max(", "var("]
        .iter()
        .any(|f| value.starts_with(f))
    {
        return Ok(FontSize::Relative);
    }

    let starts_numeric = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'));
    if !starts_numeric {
        return Ok(FontSize::Indeterminate);
    }

    let caps = length_re().captures(&value).ok_or_else(malformed)?;
    let number: f64 = caps[1].parse().map_err(|_| malformed())?;
    if number < 0.0 {
        return Err(malformed());
    }

    let px = match &caps[2] {
        "px" => number,
        "pt" => number * 96.0 / 72.0,
        "pc" => number * 16.0,
        "in" => number * 96.0,
        "cm" => number * 96.0 / 2.54,
        "mm" => number * 96.0 / 25.4,
        "q" => number * 96.0 / 101.6,
        // Unitless zero is the only valid unitless length.
        "" if number == 0.0 => 0.0,
        "em" | "rem" | "%" | "ex" | "ch" | "cap" | "ic" | "lh" | "rlh" | "vw" | "vh"
        | "vmin" | "vmax" | "svw" | "svh" | "lvw" | "lvh" | "dvw" | "dvh" => {
            return Ok(FontSize::Relative)
        }
        _ => return Err(malformed()),
    };

    Ok(FontSize::Absolute(px))
}

fn absolute_size_keyword(value: &str) -> Option<f64> {
    let px = match value {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        "xxx-large" => 48.0,
        _ => return None,
    };
    Some(px)
}

/// Whether a `font-weight` value is bold (700 or heavier).
pub fn is_bold(weight: &str) -> bool {
    match weight.trim().to_ascii_lowercase().as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<f64>().is_ok_and(|w| w >= 700.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_declarations() {
        let style = InlineStyle::parse("color: #777; Background-Color:#888 ;font-size:14px");
        assert_eq!(style.color(), Some("#777"));
        assert_eq!(style.background(), Some("#888"));
        assert_eq!(style.font_size(), Some("14px"));
    }

    #[test]
    fn test_color_is_not_confused_with_background_color() {
        let style = InlineStyle::parse("background-color: white");
        assert_eq!(style.color(), None);
        assert_eq!(style.background(), Some("white"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let style = InlineStyle::parse(
            "color: red; color: blue !important; background: black; background-color: white",
        );
        assert_eq!(style.color(), Some("blue"));
        assert_eq!(style.background(), Some("white"));
    }

    #[test]
    fn test_background_declaration_names_its_property() {
        let style = InlineStyle::parse("background-color: #000; background: #fff url(x.png)");
        assert_eq!(
            style.background_declaration(),
            Some(("background", "#fff url(x.png)"))
        );
        let style = InlineStyle::parse("background: red; background-color: blue");
        assert_eq!(style.background_declaration(), Some(("background-color", "blue")));
    }

    #[test]
    fn test_semicolons_inside_parentheses() {
        let style = InlineStyle::parse("background: url(data:image/png;base64,AAAA); color: red");
        assert_eq!(style.background(), Some("url(data:image/png;base64,AAAA)"));
        assert_eq!(style.color(), Some("red"));
    }

    #[test]
    fn test_ignores_garbage() {
        let style = InlineStyle::parse(";;  no-colon ; :value; color:");
        assert!(style.is_empty());
    }

    #[test]
    fn test_resolves_absolute_units() {
        assert_eq!(resolve_font_size("14px").unwrap(), FontSize::Absolute(14.0));
        assert_eq!(resolve_font_size("12PT").unwrap(), FontSize::Absolute(16.0));
        assert_eq!(resolve_font_size("1pc").unwrap(), FontSize::Absolute(16.0));
        assert_eq!(resolve_font_size(".5in").unwrap(), FontSize::Absolute(48.0));
        assert_eq!(resolve_font_size("small").unwrap(), FontSize::Absolute(13.0));
    }

    #[test]
    fn test_relative_and_indeterminate_sizes() {
        assert_eq!(resolve_font_size("0.5em").unwrap(), FontSize::Relative);
        assert_eq!(resolve_font_size("80%").unwrap(), FontSize::Relative);
        assert_eq!(resolve_font_size("2vw").unwrap(), FontSize::Relative);
        assert_eq!(resolve_font_size("smaller").unwrap(), FontSize::Relative);
        assert_eq!(resolve_font_size("calc(1rem + 2px)").unwrap(), FontSize::Relative);
        assert_eq!(resolve_font_size("inherit").unwrap(), FontSize::Indeterminate);
    }

    #[test]
    fn test_malformed_sizes() {
        assert!(resolve_font_size("12foo").is_err());
        assert!(resolve_font_size("-3px").is_err());
        assert!(resolve_font_size("12").is_err());
        assert!(resolve_font_size("1.2.3px").is_err());
    }

    #[test]
    fn test_bold_weights() {
        assert!(is_bold("bold"));
        assert!(is_bold("700"));
        assert!(is_bold("900"));
        assert!(!is_bold("normal"));
        assert!(!is_bold("400"));
    }
}
