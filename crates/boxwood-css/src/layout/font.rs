//! Text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout never measures text itself. It asks a [`FontMetrics`] provider,
//! through a per-pass [`FontCache`], so a real shaping engine can replace the
//! monospaced [`ApproximateFontMetrics`] without touching layout.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::cascade::StyledNode;
use crate::values::{DEFAULT_FONT_SIZE_PX, LengthValue, parse_number};

/// The font properties text measurement depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    /// Computed font size in px.
    pub size: f32,
    /// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop), 100..=900.
    pub weight: u16,
    /// True for `italic` and `oblique`.
    pub italic: bool,
}

impl FontStyle {
    /// Weight used for `normal`.
    pub const NORMAL_WEIGHT: u16 = 400;
    /// Weight used for `bold`.
    pub const BOLD_WEIGHT: u16 = 700;

    /// A regular, upright style at `size`.
    #[must_use]
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            weight: Self::NORMAL_WEIGHT,
            italic: false,
        }
    }

    /// Read the font style off a styled node. `font-size` is already an
    /// absolute px value after the cascade; anything else falls back to
    /// `base_font_size`.
    #[must_use]
    pub fn from_styled(node: &StyledNode<'_>, base_font_size: f32) -> Self {
        let size = match node.value("font-size").map(LengthValue::parse) {
            Some(LengthValue::Px(px)) if px >= 0.0 => px,
            _ => base_font_size,
        };

        // "bolder" has no parent weight to step from here; treat it as bold.
        // Numeric weights are filtered to 1..=1000 before the cast.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let weight = match node.value("font-weight").map(str::trim) {
            Some(w) if w.eq_ignore_ascii_case("bold") || w.eq_ignore_ascii_case("bolder") => {
                Self::BOLD_WEIGHT
            }
            Some(w) => parse_number(w)
                .filter(|n| (1.0..=1000.0).contains(n))
                .map_or(Self::NORMAL_WEIGHT, |n| n as u16),
            None => Self::NORMAL_WEIGHT,
        };

        let italic = node.value("font-style").is_some_and(|s| {
            let s = s.trim();
            s.eq_ignore_ascii_case("italic") || s.eq_ignore_ascii_case("oblique")
        });

        Self {
            size,
            weight,
            italic,
        }
    }

    /// True for weights of 600 and above.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Measured extent of a run of text, in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    /// Advance width of the whole run.
    pub width: f32,
    /// Height of one line.
    pub height: f32,
}

/// Font metrics interface for text measurement during layout.
///
/// Implementations must be deterministic: the same text and style always
/// measure the same.
pub trait FontMetrics: Send + Sync {
    /// Measure `text` set on a single line in `style`.
    fn measure(&self, text: &str, style: &FontStyle) -> TextSize;
}

/// Monospaced approximation used when no real font is available, and in tests.
///
/// `width = glyphs × advance × (size / base_font_size)`,
/// `height = line_height × (size / base_font_size)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    /// Advance of one glyph at the base font size.
    pub advance: f32,
    /// Line height at the base font size.
    pub line_height: f32,
    /// The size the two values above are given for.
    pub base_font_size: f32,
}

impl ApproximateFontMetrics {
    /// Average advance of a Latin glyph relative to the font size.
    pub const ADVANCE_RATIO: f32 = 0.6;
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    /// "We recommend a used value for 'normal' between 1.0 and 1.2."
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;

    /// Metrics for a base font size using the standard ratios.
    #[must_use]
    pub const fn for_base_size(base_font_size: f32) -> Self {
        Self {
            advance: base_font_size * Self::ADVANCE_RATIO,
            line_height: base_font_size * Self::LINE_HEIGHT_RATIO,
            base_font_size,
        }
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::for_base_size(DEFAULT_FONT_SIZE_PX)
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> TextSize {
        let scale = if self.base_font_size > 0.0 {
            style.size / self.base_font_size
        } else {
            0.0
        };
        TextSize {
            width: text.chars().count() as f32 * self.advance * scale,
            height: self.line_height * scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    size_bits: u32,
    weight: u16,
    italic: bool,
}

/// Per-pass memo in front of a [`FontMetrics`] provider.
///
/// Each distinct (text, style) pair is measured at most once. The cache is
/// owned by a single render pass; it is deliberately not `Sync`, so two
/// passes on two threads each build their own.
pub struct FontCache<'m> {
    metrics: &'m dyn FontMetrics,
    entries: RefCell<HashMap<CacheKey, TextSize>>,
}

impl<'m> FontCache<'m> {
    /// An empty cache over `metrics`.
    #[must_use]
    pub fn new(metrics: &'m dyn FontMetrics) -> Self {
        Self {
            metrics,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// The provider behind the cache.
    #[must_use]
    pub fn metrics(&self) -> &'m dyn FontMetrics {
        self.metrics
    }

    /// Measure through the cache.
    pub fn measure(&self, text: &str, style: &FontStyle) -> TextSize {
        let key = CacheKey {
            text: text.to_string(),
            size_bits: style.size.to_bits(),
            weight: style.weight,
            italic: style.italic,
        };
        *self
            .entries
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| self.metrics.measure(text, style))
    }

    /// Number of distinct measurements taken so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True if nothing has been measured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for FontCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

/// [§ 10.8 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
///
/// Used line height for text at `font_size`. `normal` (or nothing) keeps the
/// provider's own line height.
#[must_use]
pub fn resolve_line_height(value: Option<&str>, font_size: f32, normal: f32) -> f32 {
    let Some(value) = value.map(str::trim) else {
        return normal;
    };
    if value.eq_ignore_ascii_case("normal") {
        return normal;
    }
    // "<number>: The used value of the property is this number multiplied by
    // the element's font size."
    if let Some(factor) = parse_number(value) {
        return (factor * font_size).max(0.0);
    }
    match LengthValue::parse(value) {
        LengthValue::Px(px) => px.max(0.0),
        LengthValue::Percent(pct) => (pct / 100.0 * font_size).max(0.0),
        LengthValue::Auto => normal,
    }
}
