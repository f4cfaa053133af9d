//! Render pipeline for the boxwood layout engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Rendering** - cascade, box construction and layout in one call
//! - **Snapshots** - an owned, serializable box tree for renderers and tooling
//! - **Configuration** - [`LayoutConfig`] loading from JSON
//! - **Font Metrics** - a fontdue-backed [`FontMetrics`] provider
//!
//! # Concurrency
//!
//! [`render`] owns every intermediate tree and its font cache, so passes on
//! separate threads may share a `&DomTree`, a `&Stylesheet` and a metrics
//! provider freely.

pub mod error;
pub mod font_metrics;

pub use boxwood_css as css;
pub use boxwood_dom as dom;

use std::collections::BTreeMap;

use boxwood_common::warning::clear_warnings;
use boxwood_css::{
    BoxType, EdgeSizes, FontMetrics, LayoutBox, LayoutConfig, LayoutContext, Rect, Stylesheet,
    layout_tree, style_tree,
};
use boxwood_dom::DomTree;
use serde::{Deserialize, Serialize};

pub use error::{EngineError, Result};
pub use font_metrics::FontdueFontMetrics;

/// An owned snapshot of one laid-out box and its subtree.
///
/// Unlike [`LayoutBox`], which borrows the styled tree it was built from, a
/// `RenderedBox` outlives the pass and serializes to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedBox {
    /// How the box was laid out.
    pub box_type: BoxType,
    /// Tag of the generating element; `None` for text and the document.
    pub tag: Option<String>,
    /// Collapsed text, for text boxes.
    pub text: Option<String>,
    /// [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
    /// "The content edge surrounds the rectangle given by the width and
    /// height of the box"
    pub content: Rect,
    /// Used padding widths.
    pub padding: EdgeSizes,
    /// Used border widths.
    pub border: EdgeSizes,
    /// Used margin widths.
    pub margin: EdgeSizes,
    /// The node's computed properties, ordered by name.
    pub style: BTreeMap<String, String>,
    /// Child boxes in document order.
    pub children: Vec<Self>,
}

impl RenderedBox {
    /// Snapshot a laid-out box tree.
    #[must_use]
    pub fn from_layout(layout: &LayoutBox<'_>) -> Self {
        let d = layout.dimensions;
        Self {
            box_type: layout.box_type,
            tag: layout.tag_name().map(str::to_string),
            text: layout.text().map(str::to_string),
            content: d.content,
            padding: d.padding,
            border: d.border,
            margin: d.margin,
            style: layout
                .style
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            children: layout.children.iter().map(Self::from_layout).collect(),
        }
    }

    /// The border box, the area a renderer fills with the background.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.content
            .expanded_by(self.padding)
            .expanded_by(self.border)
    }

    /// The margin box, the area the box occupies in flow.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(self.margin)
    }

    /// This box and every descendant, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &Self> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Every box in the subtree with the given tag, in document order.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Self> {
        self.descendants()
            .filter(|b| b.tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }
}

/// Run one full render pass: cascade, box construction, layout.
///
/// The pass allocates its own styled tree, layout tree and font cache, and
/// returns an owned snapshot. Layout never fails; malformed CSS degrades to
/// defaults with a warning. The calling thread's warning history is reset
/// first, so a repeated degradation is reported again on every pass.
#[must_use]
pub fn render(
    tree: &DomTree,
    stylesheet: &Stylesheet,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> RenderedBox {
    // STEP 0: Each pass reports its own diagnostics.
    clear_warnings();

    // STEP 1: Resolve the cascade into a styled tree.
    let styled = style_tree(tree, stylesheet);

    // STEP 2: Build and lay out the box tree with a fresh font cache.
    let ctx = LayoutContext::new(config.clone(), metrics);
    let root = layout_tree(&styled, &ctx);

    // STEP 3: Detach the result from the borrowed trees.
    RenderedBox::from_layout(&root)
}

/// Render with the monospaced metrics described by `config`.
#[must_use]
pub fn render_approximate(
    tree: &DomTree,
    stylesheet: &Stylesheet,
    config: &LayoutConfig,
) -> RenderedBox {
    let metrics = config.approximate_metrics();
    render(tree, stylesheet, config, &metrics)
}

/// Serialize a rendered tree as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`EngineError::Serialize`] if serde_json rejects the tree.
pub fn to_json(rendered: &RenderedBox) -> Result<String> {
    serde_json::to_string_pretty(rendered).map_err(EngineError::Serialize)
}

/// Parse a [`LayoutConfig`] from JSON. Missing fields keep their defaults.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for malformed JSON or mistyped fields.
pub fn load_config(json: &str) -> Result<LayoutConfig> {
    serde_json::from_str(json).map_err(EngineError::Config)
}
