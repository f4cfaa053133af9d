//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! ```text
//!  margin ─┐
//!  border ─┼─┐
//! padding ─┼─┼─┐
//!          │ │ │ ┌─────────┐
//!          │ │ │ │ content │  content is the only stored Rect; every other
//!          │ │ │ └─────────┘  box is derived by growing it outward.
//! ```

use serde::{Deserialize, Serialize};

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    /// Content area, positioned on the page.
    pub content: Rect,
    /// Padding thickness per side.
    pub padding: EdgeSizes,
    /// Border thickness per side.
    pub border: EdgeSizes,
    /// Margin thickness per side.
    pub margin: EdgeSizes,
}

/// A rectangle positioned in 2D space. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, never negative after layout.
    pub width: f32,
    /// Height, never negative after layout.
    pub height: f32,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Grow the rectangle outward by `edge` on every side.
    #[must_use]
    pub fn expanded_by(self, edge: EdgeSizes) -> Self {
        Self {
            x: self.x - edge.left,
            y: self.y - edge.top,
            width: self.width + edge.horizontal(),
            height: self.height + edge.vertical(),
        }
    }

    /// True if the two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Edge sizes for padding, border, or margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// No thickness on any side.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// `left + right`.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl BoxDimensions {
    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(self.padding)
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(self.border)
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(self.margin)
    }

    /// Padding + border + margin on the left and right.
    #[must_use]
    pub fn horizontal_extras(&self) -> f32 {
        self.padding.horizontal() + self.border.horizontal() + self.margin.horizontal()
    }

    /// Padding + border + margin on the top and bottom.
    #[must_use]
    pub fn vertical_extras(&self) -> f32 {
        self.padding.vertical() + self.border.vertical() + self.margin.vertical()
    }

    /// Move the whole box (all four areas) by the given offset.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.content.x += dx;
        self.content.y += dy;
    }
}
