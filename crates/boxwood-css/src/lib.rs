//! Cascade and box-model layout for the boxwood engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet model**: rules, descendant selectors and declarations,
//!   produced by an external parser ([`stylesheet`], [`selector`])
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Selector matching and specificity
//!   - Presentational hints, stylesheet rules, inline style
//!   - Inheritance and shorthand expansion
//! - **Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/)):
//!   the single length parser every layout step uses
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)):
//!   block flow, text measurement, and automatic table layout
//!
//! Parsing CSS text, painting, and fetching resources live elsewhere.
//!
//! ```text
//! DomTree + Stylesheet ──style_tree──► StyledNode ──layout_tree──► LayoutBox
//! ```

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box model and layout per [CSS 2.1 § 9–10, 17](https://www.w3.org/TR/CSS2/).
pub mod layout;
/// CSS selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Rules and declarations handed to the cascade.
pub mod stylesheet;
/// Length and font-size parsing per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

pub use cascade::{PropertyMap, StyledNode, style_tree};
pub use layout::{
    ApproximateFontMetrics, BoxDimensions, BoxType, EdgeSizes, FontCache, FontMetrics, FontStyle,
    LayoutBox, LayoutConfig, LayoutContext, Rect, TextSize, layout_tree,
};
pub use selector::{Selector, SimpleSelector, Specificity};
pub use stylesheet::{Declaration, Rule, Stylesheet, parse_declarations};
pub use values::{DEFAULT_FONT_SIZE_PX, LengthValue};
