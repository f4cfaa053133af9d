//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use boxwood_common::warning::warn_once;
use boxwood_css::{FontMetrics, FontStyle, TextSize};
use fontdue::{Font, FontSettings};

use crate::error::{EngineError, Result};

/// Common system locations of a regular sans-serif face.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Line height ratio used when the face carries no horizontal line metrics.
///
/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "We recommend a used value for 'normal' between 1.0 and 1.2."
const FALLBACK_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// A regular face is required. Bold and italic faces are optional; a style
/// without its own face is measured with the closest one loaded, falling
/// back to the regular face.
///
/// Measurement uses `Font::metrics()` rather than `Font::rasterize()`, so no
/// glyph bitmaps are ever generated.
pub struct FontdueFontMetrics {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontdueFontMetrics {
    /// Build a provider from the bytes of a TrueType or OpenType font.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] if fontdue cannot parse the bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            regular: parse_font(bytes)?,
            bold: None,
            italic: None,
            bold_italic: None,
        })
    }

    /// Load the first regular face found under [`FONT_SEARCH_PATHS`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] naming every path searched if none
    /// of them holds a readable font.
    pub fn from_system() -> Result<Self> {
        Self::from_paths(FONT_SEARCH_PATHS)
    }

    /// Load the first readable font in `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] if no path yields a font.
    pub fn from_paths(paths: &[&str]) -> Result<Self> {
        for path in paths {
            if let Ok(data) = std::fs::read(path)
                && let Ok(metrics) = Self::from_bytes(&data)
            {
                return Ok(metrics);
            }
        }
        Err(EngineError::FontLoad(format!(
            "no usable font found, searched: {}",
            paths.join(", ")
        )))
    }

    /// Add a bold face.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] if the bytes are not a font.
    pub fn with_bold(mut self, bytes: &[u8]) -> Result<Self> {
        self.bold = Some(parse_font(bytes)?);
        Ok(self)
    }

    /// Add an italic face.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] if the bytes are not a font.
    pub fn with_italic(mut self, bytes: &[u8]) -> Result<Self> {
        self.italic = Some(parse_font(bytes)?);
        Ok(self)
    }

    /// Add a bold italic face.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FontLoad`] if the bytes are not a font.
    pub fn with_bold_italic(mut self, bytes: &[u8]) -> Result<Self> {
        self.bold_italic = Some(parse_font(bytes)?);
        Ok(self)
    }

    /// Pick the face for a style.
    fn face(&self, style: &FontStyle) -> &Font {
        let preferred = match (style.is_bold(), style.italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        preferred.unwrap_or(&self.regular)
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> TextSize {
        let font = self.face(style);
        let size = style.size.max(0.0);

        let width = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| font.metrics(ch, size).advance_width)
            .sum();

        let height = font
            .horizontal_line_metrics(size)
            .map_or(size * FALLBACK_LINE_HEIGHT_RATIO, |m| m.new_line_size);

        TextSize { width, height }
    }
}

impl std::fmt::Debug for FontdueFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFontMetrics")
            .field("bold", &self.bold.is_some())
            .field("italic", &self.italic.is_some())
            .field("bold_italic", &self.bold_italic.is_some())
            .finish_non_exhaustive()
    }
}

fn parse_font(bytes: &[u8]) -> Result<Font> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
        warn_once("Font", reason);
        EngineError::FontLoad(reason.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_metrics() -> Option<FontdueFontMetrics> {
        FontdueFontMetrics::from_system().ok()
    }

    #[test]
    fn test_garbage_bytes_are_a_font_load_error() {
        let err = FontdueFontMetrics::from_bytes(b"definitely not a font").unwrap_err();
        assert!(matches!(err, EngineError::FontLoad(_)));
    }

    #[test]
    fn test_missing_paths_name_every_candidate() {
        let err = FontdueFontMetrics::from_paths(&["/nonexistent/a.ttf", "/nonexistent/b.ttf"])
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/nonexistent/a.ttf"));
        assert!(message.contains("/nonexistent/b.ttf"));
    }

    #[test]
    fn test_measurement_scales_with_size() {
        // Machines without any of the searched fonts have nothing to measure.
        let Some(metrics) = system_metrics() else {
            return;
        };
        let small = metrics.measure("Hello", &FontStyle::regular(10.0));
        let large = metrics.measure("Hello", &FontStyle::regular(20.0));
        assert!(small.width > 0.0);
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn test_control_characters_have_no_advance() {
        let Some(metrics) = system_metrics() else {
            return;
        };
        let style = FontStyle::regular(16.0);
        let plain = metrics.measure("ab", &style);
        let with_control = metrics.measure("a\u{7}b", &style);
        assert!((plain.width - with_control.width).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_style_faces_fall_back_to_regular() {
        let Some(metrics) = system_metrics() else {
            return;
        };
        let regular = FontStyle::regular(16.0);
        let bold = FontStyle {
            weight: FontStyle::BOLD_WEIGHT,
            italic: true,
            ..regular
        };
        assert_eq!(metrics.measure("abc", &regular), metrics.measure("abc", &bold));
    }
}
