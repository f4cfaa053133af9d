//! CSS Layout Engine
//!
//! This module implements the subset of the CSS Visual Formatting Model the
//! engine supports: block flow, text runs, and automatic table layout.
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`context`] - Per-pass configuration and font cache
//! - [`font`] - Font metrics provider trait, approximation, and cache
//! - [`layout_box`] - Box tree building and block/text layout
//! - [`table`] - Table layout algorithm
//!
//! # Known gaps
//!
//! `display: inline` is laid out with the block algorithm, so inline
//! siblings stack vertically. There are no floats, no positioning, no
//! flexbox or grid, no `rowspan`, and no `border-collapse`.

pub mod box_model;
pub mod context;
pub mod font;
pub mod layout_box;
pub mod table;

pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use context::{LayoutConfig, LayoutContext};
pub use font::{ApproximateFontMetrics, FontCache, FontMetrics, FontStyle, TextSize};
pub use layout_box::{BoxType, Descendants, LayoutBox, collapse_whitespace, layout_tree};
pub use table::fit_columns;
