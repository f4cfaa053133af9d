//! Layout box types and layout algorithms.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! A [`LayoutBox`] tree is built from the styled tree by [`LayoutBox::build`],
//! then laid out top-down by [`LayoutBox::layout`]. Widths flow down from the
//! containing block; heights flow back up from the children.

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use boxwood_common::warning::warn_once;
use serde::{Deserialize, Serialize};

use crate::cascade::StyledNode;
use crate::values::{is_auto_keyword, resolve_border_width, resolve_edge, resolve_length};

use super::box_model::{BoxDimensions, EdgeSizes, Rect};
use super::context::{LayoutConfig, LayoutContext};
use super::font::{FontStyle, resolve_line_height};
use super::table;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// "A box's type affects, in part, its behavior in the visual formatting model."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxType {
    /// Block-level box. Also used for row groups and anything we do not model.
    Block,
    /// `display: inline`. Laid out with the block algorithm.
    Inline,
    /// [§ 9.2.1.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
    ///
    /// A run of text.
    Anonymous,
    /// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display) `display: table`.
    Table,
    /// `display: table-row`.
    TableRow,
    /// `display: table-cell`.
    TableCell,
}

impl BoxType {
    /// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
    ///
    /// Box type for a declared `display` value. `None` means the element
    /// generates no box.
    #[must_use]
    pub fn from_display(display: &str) -> Option<Self> {
        let display = display.trim().to_ascii_lowercase();
        let box_type = match display.as_str() {
            "none" => return None,
            "inline" => Self::Inline,
            "table" | "inline-table" => Self::Table,
            "table-row" => Self::TableRow,
            "table-cell" => Self::TableCell,
            "block" | "list-item" | "flow-root" | "flex" | "grid" | "inline-block"
            | "table-row-group" | "table-header-group" | "table-footer-group" => Self::Block,
            other => {
                warn_once("Layout", &format!("unsupported display '{other}', using block"));
                Self::Block
            }
        };
        Some(box_type)
    }

    /// Box type implied by the tag when no `display` was declared.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "table" => Self::Table,
            "tr" => Self::TableRow,
            "td" | "th" => Self::TableCell,
            _ => Self::Block,
        }
    }
}

/// A node in the layout tree.
///
/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// "Each box is associated with its generating element."
#[derive(Debug, Clone)]
pub struct LayoutBox<'a> {
    /// The type of box.
    pub box_type: BoxType,
    /// The styled node that generated this box.
    pub style: &'a StyledNode<'a>,
    /// Used geometry. All zero until [`LayoutBox::layout`] runs.
    pub dimensions: BoxDimensions,
    /// Child boxes in document order.
    pub children: Vec<LayoutBox<'a>>,
    /// Whitespace-collapsed text, for [`BoxType::Anonymous`] boxes.
    pub text: Option<String>,
    /// Columns spanned by a table cell. 1 for everything else.
    pub colspan: usize,
}

/// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Runs of spaces, tabs, CR and LF become one space; both ends are trimmed.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

impl<'a> LayoutBox<'a> {
    /// A box with no children and zero geometry.
    #[must_use]
    pub const fn empty(style: &'a StyledNode<'a>) -> Self {
        Self {
            box_type: BoxType::Block,
            style,
            dimensions: BoxDimensions {
                content: Rect::ZERO,
                padding: EdgeSizes::ZERO,
                border: EdgeSizes::ZERO,
                margin: EdgeSizes::ZERO,
            },
            children: Vec::new(),
            text: None,
            colspan: 1,
        }
    }

    /// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
    ///
    /// Build the box subtree for a styled node. Returns `None` for
    /// `display: none` and for text that is only whitespace.
    #[must_use]
    pub fn build(style: &'a StyledNode<'a>, config: &LayoutConfig) -> Option<Self> {
        if let Some(raw) = style.text() {
            let text = collapse_whitespace(raw);
            if text.is_empty() {
                return None;
            }
            return Some(Self {
                box_type: BoxType::Anonymous,
                text: Some(text),
                ..Self::empty(style)
            });
        }

        // Explicit display wins; otherwise infer from the tag. The Document
        // node has no tag and is a block.
        let box_type = match style.display() {
            Some(display) => BoxType::from_display(display)?,
            None => style.tag_name().map_or(BoxType::Block, BoxType::from_tag),
        };

        let colspan = if box_type == BoxType::TableCell {
            read_colspan(style, config.max_colspan)
        } else {
            1
        };

        let children = style
            .children
            .iter()
            .filter_map(|child| Self::build(child, config))
            .collect();

        Some(Self {
            box_type,
            children,
            colspan,
            ..Self::empty(style)
        })
    }

    /// Lay out this box and its subtree inside `containing_block`.
    ///
    /// `containing_block.height` is the running height of the siblings laid out
    /// before this box; a block is placed right beneath them.
    pub fn layout(&mut self, containing_block: Rect, ctx: &LayoutContext<'_>) {
        #[cfg(feature = "layout-trace")]
        let _depth = {
            let depth = LAYOUT_DEPTH.with(|d| {
                let current = d.get();
                d.set(current + 1);
                current
            });
            eprintln!(
                "[layout] {:indent$}{:?} <{}> cb={containing_block:?}",
                "",
                self.box_type,
                self.tag_name().unwrap_or("#text"),
                indent = depth * 2
            );
            struct DepthGuard;
            impl Drop for DepthGuard {
                fn drop(&mut self) {
                    LAYOUT_DEPTH.with(|d| d.set(d.get() - 1));
                }
            }
            DepthGuard
        };

        match self.box_type {
            BoxType::Anonymous => self.layout_text(containing_block, ctx),
            // Inline boxes reuse the block algorithm: they stack vertically.
            BoxType::Block | BoxType::Inline => self.layout_block(containing_block, ctx),
            BoxType::Table => table::layout_table(self, containing_block, ctx),
            BoxType::TableRow => table::layout_standalone_row(self, containing_block, ctx),
            BoxType::TableCell => {
                table::layout_cell(self, containing_block, containing_block.width, ctx);
            }
        }
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    fn layout_block(&mut self, containing_block: Rect, ctx: &LayoutContext<'_>) {
        // STEP 1: Width and horizontal edges, from the containing block.
        self.calculate_block_width(containing_block);

        // STEP 2: Position beneath the previous siblings.
        self.calculate_block_position(containing_block);

        // STEP 3: Children, which grow our content height.
        self.layout_block_children(ctx);

        // STEP 4: An explicit height wins over the accumulated one.
        self.calculate_block_height();

        // STEP 5: <center> shifts its children into the middle.
        if self.tag_name() == Some("center") {
            self.center_children();
        }
    }

    /// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right'
    /// = width of containing block"
    pub(crate) fn calculate_block_width(&mut self, containing_block: Rect) {
        let style = self.style;
        let reference = containing_block.width;

        let padding_left = resolve_edge(style.value("padding-left"), reference);
        let padding_right = resolve_edge(style.value("padding-right"), reference);
        let border_left = side_border(style, "left", reference);
        let border_right = side_border(style, "right", reference);
        let mut margin_left = resolve_edge(style.value("margin-left"), reference);
        let mut margin_right = resolve_edge(style.value("margin-right"), reference);

        let width = match resolve_length(style.value("width"), Some(reference)) {
            Some(width) => {
                let inner = border_left + padding_left + width + padding_right + border_right;

                if is_auto_keyword(style.value("margin-left"))
                    && is_auto_keyword(style.value("margin-right"))
                {
                    // "If both 'margin-left' and 'margin-right' are 'auto',
                    // their used values are equal. This horizontally centers
                    // the element with respect to the edges of the
                    // containing block."
                    let spare = (reference - inner).max(0.0);
                    margin_left = spare / 2.0;
                    margin_right = spare / 2.0;
                } else {
                    // "If all of the above have a computed value other than
                    // 'auto', the values are said to be 'over-constrained'
                    // and ... the used value of 'margin-right' is ignored
                    // and the value is calculated so as to make the
                    // equality true."
                    let excess = inner + margin_left + margin_right - reference;
                    if excess > 0.0 {
                        margin_right = (margin_right - excess).max(0.0);
                    }
                }
                width
            }
            // "If 'width' is set to 'auto', any other 'auto' values become
            // '0' and 'width' follows from the resulting equality."
            None => (reference
                - margin_left
                - border_left
                - padding_left
                - padding_right
                - border_right
                - margin_right)
                .max(0.0),
        };

        let d = &mut self.dimensions;
        d.content.width = width;
        d.padding.left = padding_left;
        d.padding.right = padding_right;
        d.border.left = border_left;
        d.border.right = border_right;
        d.margin.left = margin_left;
        d.margin.right = margin_right;
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// Vertical edges and the content origin. Vertical percentages refer to the
    /// containing block's width, like horizontal ones.
    pub(crate) fn calculate_block_position(&mut self, containing_block: Rect) {
        let style = self.style;
        let reference = containing_block.width;
        let d = &mut self.dimensions;

        d.margin.top = resolve_edge(style.value("margin-top"), reference);
        d.margin.bottom = resolve_edge(style.value("margin-bottom"), reference);
        d.border.top = side_border(style, "top", reference);
        d.border.bottom = side_border(style, "bottom", reference);
        d.padding.top = resolve_edge(style.value("padding-top"), reference);
        d.padding.bottom = resolve_edge(style.value("padding-bottom"), reference);

        d.content.x = containing_block.x + d.margin.left + d.border.left + d.padding.left;
        d.content.y = containing_block.y
            + containing_block.height
            + d.margin.top
            + d.border.top
            + d.padding.top;
        d.content.height = 0.0;
    }

    /// Stack children vertically; each one's margin box adds to our height.
    pub(crate) fn layout_block_children(&mut self, ctx: &LayoutContext<'_>) {
        let d = &mut self.dimensions;
        for child in &mut self.children {
            child.layout(d.content, ctx);
            d.content.height += child.dimensions.margin_box().height;
        }
    }

    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    ///
    /// "<percentage> ... If the height of the containing block is not specified
    /// explicitly ... the value computes to 'auto'." Containing heights are
    /// always content-driven here, so percentages stay auto.
    pub(crate) fn calculate_block_height(&mut self) {
        if let Some(height) = resolve_length(self.style.value("height"), None) {
            self.dimensions.content.height = height;
        }
    }

    /// [§ 10.6.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
    ///
    /// A text run sits at the containing block's cursor, sized by the font
    /// metrics provider.
    fn layout_text(&mut self, containing_block: Rect, ctx: &LayoutContext<'_>) {
        let font = FontStyle::from_styled(self.style, ctx.config.base_font_size);
        let measured = ctx.fonts.measure(self.text.as_deref().unwrap_or_default(), &font);
        let height = resolve_line_height(self.style.value("line-height"), font.size, measured.height);

        self.dimensions = BoxDimensions {
            content: Rect {
                x: containing_block.x,
                y: containing_block.y + containing_block.height,
                width: measured.width,
                height,
            },
            ..BoxDimensions::default()
        };
    }

    /// Shift every child by half the space left beside the widest one.
    ///
    /// The offset is `(available - widest child margin box) / 2`, floored at
    /// 0, rather than `(available - total child width) / 2`. Children here
    /// stack vertically, so summing their widths would over-count and push
    /// a stack of several blocks left of center.
    fn center_children(&mut self) {
        let available = self.dimensions.content.width;
        let widest = self
            .children
            .iter()
            .map(|child| child.dimensions.margin_box().width)
            .fold(0.0, f32::max);
        let dx = ((available - widest) / 2.0).max(0.0);
        if dx > 0.0 {
            for child in &mut self.children {
                child.translate(dx, 0.0);
            }
        }
    }

    /// Move this box and its whole subtree.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.dimensions.translate(dx, dy);
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// Content + padding.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.dimensions.padding_box()
    }

    /// Content + padding + border.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.dimensions.border_box()
    }

    /// Content + padding + border + margin.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.dimensions.margin_box()
    }

    /// True for text runs.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.box_type, BoxType::Anonymous)
    }

    /// The collapsed text of a text run.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Tag name of the generating element.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.style.tag_name()
    }

    /// Every box below this one, in document (pre-)order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_, 'a> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Every descendant matching `predicate`, in document order.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<&Self>
    where
        P: FnMut(&Self) -> bool,
    {
        self.descendants().filter(|b| predicate(b)).collect()
    }
}

/// Pre-order iterator over a box's descendants.
#[derive(Debug)]
pub struct Descendants<'b, 'a> {
    stack: Vec<&'b LayoutBox<'a>>,
}

impl<'b, 'a> Iterator for Descendants<'b, 'a> {
    type Item = &'b LayoutBox<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Used border width of one side, honoring `border-<side>-style: none`.
pub(crate) fn side_border(style: &StyledNode<'_>, side: &str, reference: f32) -> f32 {
    resolve_border_width(
        style.value(&format!("border-{side}-width")),
        style.value(&format!("border-{side}-style")),
        reference,
    )
}

/// [HTML § 4.9.11 colspan](https://html.spec.whatwg.org/multipage/tables.html#attr-tdth-colspan)
///
/// "If parsing that value failed, or returned zero, or if the attribute is
/// absent, then let colspan be 1, instead. If colspan is greater than 1000,
/// let it be 1000 instead."
fn read_colspan(style: &StyledNode<'_>, max_colspan: usize) -> usize {
    let Some(parsed) = style
        .attr("colspan")
        .and_then(|value| value.trim().parse::<usize>().ok())
    else {
        return 1;
    };
    let max = max_colspan.max(1);
    if parsed > max {
        warn_once("Layout", &format!("colspan {parsed} clamped to {max}"));
    }
    parsed.clamp(1, max)
}

/// [§ 9.1.2 Containing blocks](https://www.w3.org/TR/CSS2/visuren.html#containing-block)
///
/// Build and lay out the whole tree. The root's containing block is the
/// viewport width with zero height; the root grows from its content. A
/// document that produces no boxes yields an empty zero-size root.
#[must_use]
pub fn layout_tree<'a>(root: &'a StyledNode<'a>, ctx: &LayoutContext<'_>) -> LayoutBox<'a> {
    let Some(mut root_box) = LayoutBox::build(root, &ctx.config) else {
        return LayoutBox::empty(root);
    };
    if root_box.children.is_empty() && root.tag_name().is_none() {
        return LayoutBox::empty(root);
    }

    let viewport = Rect {
        x: 0.0,
        y: 0.0,
        width: ctx.config.viewport_width.max(0.0),
        height: 0.0,
    };
    root_box.layout(viewport, ctx);
    root_box
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t\n b  "), "a b");
        assert_eq!(collapse_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_display_mapping() {
        assert_eq!(BoxType::from_display("none"), None);
        assert_eq!(BoxType::from_display("inline"), Some(BoxType::Inline));
        assert_eq!(BoxType::from_display("inline-table"), Some(BoxType::Table));
        assert_eq!(BoxType::from_display("TABLE-CELL"), Some(BoxType::TableCell));
        assert_eq!(BoxType::from_display("table-row-group"), Some(BoxType::Block));
        assert_eq!(BoxType::from_display("flex"), Some(BoxType::Block));
        assert_eq!(BoxType::from_display("ruby"), Some(BoxType::Block));
    }

    #[test]
    fn test_tag_fallback() {
        assert_eq!(BoxType::from_tag("table"), BoxType::Table);
        assert_eq!(BoxType::from_tag("tr"), BoxType::TableRow);
        assert_eq!(BoxType::from_tag("th"), BoxType::TableCell);
        assert_eq!(BoxType::from_tag("span"), BoxType::Block);
    }
}
