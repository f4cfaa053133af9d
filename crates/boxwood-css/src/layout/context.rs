//! Per-pass layout configuration.

use serde::{Deserialize, Serialize};

use super::font::{ApproximateFontMetrics, FontCache, FontMetrics};
use crate::values::DEFAULT_FONT_SIZE_PX;

/// Tunables for one layout pass. Every field has a default, so a partial
/// JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Content width of the root box when the caller gives none.
    pub viewport_width: f32,
    /// Font size that text measurements are scaled from.
    pub base_font_size: f32,
    /// Glyph advance at the base font size, for the approximate metrics.
    pub glyph_advance: f32,
    /// Line height at the base font size, for the approximate metrics.
    pub line_height: f32,
    /// Upper bound on a cell's `colspan`.
    pub max_colspan: usize,
    /// Upper bound on a content-estimated table column width.
    pub max_column_width: f32,
    /// Horizontal padding added to a column estimate for cells that
    /// declare none.
    pub cell_padding_estimate: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            base_font_size: DEFAULT_FONT_SIZE_PX,
            glyph_advance: DEFAULT_FONT_SIZE_PX * ApproximateFontMetrics::ADVANCE_RATIO,
            line_height: DEFAULT_FONT_SIZE_PX * ApproximateFontMetrics::LINE_HEIGHT_RATIO,
            max_colspan: 1000,
            max_column_width: 1200.0,
            cell_padding_estimate: 0.0,
        }
    }
}

impl LayoutConfig {
    /// Monospaced metrics matching this configuration.
    #[must_use]
    pub const fn approximate_metrics(&self) -> ApproximateFontMetrics {
        ApproximateFontMetrics {
            advance: self.glyph_advance,
            line_height: self.line_height,
            base_font_size: self.base_font_size,
        }
    }
}

/// Everything a layout pass threads through its recursion.
#[derive(Debug)]
pub struct LayoutContext<'m> {
    /// The pass configuration.
    pub config: LayoutConfig,
    /// Measurement memo for this pass.
    pub fonts: FontCache<'m>,
}

impl<'m> LayoutContext<'m> {
    /// A fresh context with an empty font cache.
    #[must_use]
    pub fn new(config: LayoutConfig, metrics: &'m dyn FontMetrics) -> Self {
        Self {
            config,
            fonts: FontCache::new(metrics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_base_ratios() {
        let config = LayoutConfig::default();
        assert_eq!(config.viewport_width, 800.0);
        assert!((config.glyph_advance - 9.6).abs() < 1e-4);
        assert!((config.line_height - 19.2).abs() < 1e-4);
        assert_eq!(config.max_colspan, 1000);
        assert_eq!(config.approximate_metrics(), ApproximateFontMetrics::default());
    }
}
