//! CSS value parsing per [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/).
//!
//! Every length the layout engine reads goes through [`LengthValue::parse`].
//! The parser is total: it never fails, it only degrades.
//!
//! ```text
//!  "auto", "", "1.5em", "abc"  ──►  LengthValue::Auto        (the sentinel)
//!  "12px", "12", " 12 "        ──►  LengthValue::Px(12.0)
//!  "50%"                       ──►  LengthValue::Percent(50.0)
//! ```
//!
//! Width-class properties (`width`, `height`) keep the sentinel so the caller
//! can run its `auto` rules. Additive edges (margins, padding, borders) go
//! through [`resolve_edge`], which turns the sentinel and negatives into 0.

use boxwood_common::warning::warn_once;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// A parsed length before resolution against a reference length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthValue {
    /// `auto`, empty, or anything we cannot parse.
    Auto,
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// Pixels. A bare number is treated as pixels.
    Px(f32),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    Percent(f32),
}

impl LengthValue {
    /// Parse a raw declared value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }

        if let Some(number) = value.strip_suffix('%') {
            return parse_number(number).map_or(Self::Auto, Self::Percent);
        }

        let lower = value.to_ascii_lowercase();
        if let Some(number) = lower.strip_suffix("px") {
            return parse_number(number).map_or(Self::Auto, Self::Px);
        }

        if let Some(number) = parse_number(value) {
            return Self::Px(number);
        }

        if lower.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == '+') {
            warn_once("CSS", &format!("unsupported length unit in '{value}', treating as auto"));
        }
        Self::Auto
    }

    /// True for the unresolved sentinel.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve to pixels. Percentages need a reference; without one they stay
    /// unresolved, like `height: 50%` inside an auto-height parent.
    #[must_use]
    pub fn resolve(self, reference: Option<f32>) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Px(px) => Some(px),
            Self::Percent(pct) => reference.map(|r| r * pct / 100.0),
        }
    }
}

/// Parse a finite decimal number. Rejects `inf`, `NaN` and friends.
#[must_use]
pub fn parse_number(text: &str) -> Option<f32> {
    let text = text.trim();
    if text.is_empty() || text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f32>().ok().filter(|n| n.is_finite())
}

/// Resolve a width-class value (`width`, `height`).
///
/// `None` is the sentinel: the value was absent, `auto`, unparseable, a
/// percentage without a reference, or negative (negative sizes are invalid).
#[must_use]
pub fn resolve_length(value: Option<&str>, reference: Option<f32>) -> Option<f32> {
    value
        .map(LengthValue::parse)
        .and_then(|length| length.resolve(reference))
        .filter(|px| *px >= 0.0)
}

/// Resolve an additive edge (margin, padding) to pixels, never negative.
#[must_use]
pub fn resolve_edge(value: Option<&str>, reference: f32) -> f32 {
    resolve_length(value, Some(reference)).unwrap_or(0.0)
}

/// True if the declared value is literally `auto`.
#[must_use]
pub fn is_auto_keyword(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("auto"))
}

/// [§ 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
///
/// "thin <= medium <= thick". A side whose style is `none` or `hidden` has a
/// used width of 0. An absent style leaves the declared width in force.
#[must_use]
pub fn resolve_border_width(width: Option<&str>, style: Option<&str>, reference: f32) -> f32 {
    if style.is_some_and(|s| {
        let s = s.trim();
        s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("hidden")
    }) {
        return 0.0;
    }
    match width.map(|w| w.trim().to_ascii_lowercase()).as_deref() {
        Some("thin") => 1.0,
        Some("medium") => 3.0,
        Some("thick") => 5.0,
        other => resolve_edge(other, reference),
    }
}

/// [§ 2.5 Absolute size keywords](https://www.w3.org/TR/css-fonts-4/#absolute-size-value)
fn absolute_font_size(keyword: &str) -> Option<f32> {
    let px = match keyword {
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

/// [§ 2.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// Compute a declared `font-size` to absolute pixels against the parent's
/// computed size. Handles px, bare numbers, `%`, `em`, `rem`, the absolute
/// keywords, and `smaller`/`larger`. Returns `None` when the value cannot be
/// resolved; the caller keeps the declared string in that case.
#[must_use]
pub fn compute_font_size(value: &str, parent_px: f32) -> Option<f32> {
    let lower = value.trim().to_ascii_lowercase();
    if let Some(px) = absolute_font_size(&lower) {
        return Some(px);
    }
    // [§ 2.5](https://www.w3.org/TR/css-fonts-4/#relative-size-value)
    // "smaller / larger: ... a ratio of 1.2 is suggested."
    match lower.as_str() {
        "smaller" => return Some(parent_px / 1.2),
        "larger" => return Some(parent_px * 1.2),
        _ => {}
    }
    if let Some(number) = lower.strip_suffix("rem") {
        return parse_number(number).map(|n| n * DEFAULT_FONT_SIZE_PX);
    }
    if let Some(number) = lower.strip_suffix("em") {
        return parse_number(number).map(|n| n * parent_px);
    }
    LengthValue::parse(&lower)
        .resolve(Some(parent_px))
        .filter(|px| *px >= 0.0)
}

/// Format a pixel value the way computed values are stored in property maps.
#[must_use]
pub fn format_px(px: f32) -> String {
    format!("{px}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length_forms() {
        assert_eq!(LengthValue::parse("12px"), LengthValue::Px(12.0));
        assert_eq!(LengthValue::parse("  12.5PX "), LengthValue::Px(12.5));
        assert_eq!(LengthValue::parse("7"), LengthValue::Px(7.0));
        assert_eq!(LengthValue::parse("50%"), LengthValue::Percent(50.0));
        assert_eq!(LengthValue::parse("auto"), LengthValue::Auto);
        assert_eq!(LengthValue::parse(""), LengthValue::Auto);
        assert_eq!(LengthValue::parse("1.5em"), LengthValue::Auto);
        assert_eq!(LengthValue::parse("inf"), LengthValue::Auto);
        assert_eq!(LengthValue::parse("NaN"), LengthValue::Auto);
        assert_eq!(LengthValue::parse("px"), LengthValue::Auto);
    }

    #[test]
    fn test_resolve_length_sentinel() {
        assert_eq!(resolve_length(Some("50%"), Some(800.0)), Some(400.0));
        assert_eq!(resolve_length(Some("50%"), None), None);
        assert_eq!(resolve_length(Some("auto"), Some(800.0)), None);
        assert_eq!(resolve_length(None, Some(800.0)), None);
        assert_eq!(resolve_length(Some("-10px"), Some(800.0)), None);
    }

    #[test]
    fn test_resolve_edge_never_negative() {
        assert!((resolve_edge(Some("10px"), 800.0) - 10.0).abs() < f32::EPSILON);
        assert!((resolve_edge(Some("10%"), 200.0) - 20.0).abs() < f32::EPSILON);
        assert!(resolve_edge(Some("-4px"), 800.0).abs() < f32::EPSILON);
        assert!(resolve_edge(Some("garbage"), 800.0).abs() < f32::EPSILON);
        assert!(resolve_edge(None, 800.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_border_width_keywords_and_style() {
        assert!((resolve_border_width(Some("thin"), Some("solid"), 0.0) - 1.0).abs() < f32::EPSILON);
        assert!((resolve_border_width(Some("thick"), None, 0.0) - 5.0).abs() < f32::EPSILON);
        assert!((resolve_border_width(Some("2px"), None, 0.0) - 2.0).abs() < f32::EPSILON);
        assert!(resolve_border_width(Some("2px"), Some("none"), 0.0).abs() < f32::EPSILON);
        assert!(resolve_border_width(Some("2px"), Some("hidden"), 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_compute_font_size() {
        assert_eq!(compute_font_size("20px", 16.0), Some(20.0));
        assert_eq!(compute_font_size("2em", 10.0), Some(20.0));
        assert_eq!(compute_font_size("150%", 20.0), Some(30.0));
        assert_eq!(compute_font_size("1rem", 40.0), Some(16.0));
        assert_eq!(compute_font_size("x-large", 10.0), Some(24.0));
        let larger = compute_font_size("larger", 10.0).unwrap_or_default();
        assert!((larger - 12.0).abs() < 0.001);
        assert_eq!(compute_font_size("huge", 10.0), None);
    }

    #[test]
    fn test_format_px_is_compact() {
        assert_eq!(format_px(32.0), "32px");
        assert_eq!(format_px(12.5), "12.5px");
    }
}
