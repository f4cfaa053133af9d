//! CSS Table Layout.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! An automatic layout in the spirit of § 17.5.2, simplified:
//! - `<table>`, `<tr>`, `<td>`, `<th>`, and row groups holding rows
//! - `colspan`, capped by [`LayoutConfig::max_colspan`](super::LayoutConfig)
//! - column widths from explicit cell widths, else estimated from text
//! - cells stretched to their row's height, then aligned
//!
//! Not implemented: `rowspan`, `border-collapse`, `border-spacing`,
//! `table-layout: fixed`.

use boxwood_common::warning::warn_once;

use crate::values::{resolve_edge, resolve_length};

use super::box_model::Rect;
use super::context::LayoutContext;
use super::font::FontStyle;
use super::layout_box::{BoxType, LayoutBox, side_border};

/// Main entry point for table layout.
///
/// [§ 17.5.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
pub(crate) fn layout_table(table: &mut LayoutBox<'_>, containing_block: Rect, ctx: &LayoutContext<'_>) {
    // STEP 1: The table is block-level; its own width and position follow
    // the block rules.
    table.calculate_block_width(containing_block);
    table.calculate_block_position(containing_block);

    // STEP 2 (§ 17.5.2.1): Count columns.
    //
    // "the number of columns is ... the row with the most cells", where a
    // cell counts as many columns as it spans.
    let num_cols = column_count(table, ctx.config.max_colspan);

    // STEP 3 (§ 17.5.2.2): Column widths.
    let columns = if num_cols == 0 {
        Vec::new()
    } else {
        column_widths(table, num_cols, table.dimensions.content.width, ctx)
    };

    // STEP 4: Rows, row groups and anything else, stacked in flow.
    let table_width = table.dimensions.content.width;
    let d = &mut table.dimensions;
    for child in &mut table.children {
        if child.box_type == BoxType::TableRow {
            layout_row(child, d.content, &columns, table_width, ctx);
        } else if is_row_group(child) {
            layout_row_group(child, d.content, &columns, table_width, ctx);
        } else {
            child.layout(d.content, ctx);
        }
        d.content.height += child.dimensions.margin_box().height;
    }

    // STEP 5 (§ 17.5.3): "The height of a table is given by the 'height'
    // property", else the sum of its rows.
    table.calculate_block_height();
}

/// A row laid out without a parent table: its cells share its width equally,
/// per column spanned.
pub(crate) fn layout_standalone_row(
    row: &mut LayoutBox<'_>,
    containing_block: Rect,
    ctx: &LayoutContext<'_>,
) {
    row.calculate_block_width(containing_block);
    let slots: usize = row.children.iter().map(|cell| cell.colspan.max(1)).sum();
    let columns = if slots == 0 {
        Vec::new()
    } else {
        vec![row.dimensions.content.width / slots as f32; slots]
    };
    let width = row.dimensions.content.width;
    layout_row(row, containing_block, &columns, width, ctx);
}

/// A row group (`<tbody>` and friends): stacked like a block, with its rows
/// using the table's columns.
fn layout_row_group(
    group: &mut LayoutBox<'_>,
    containing_block: Rect,
    columns: &[f32],
    table_width: f32,
    ctx: &LayoutContext<'_>,
) {
    group.calculate_block_width(containing_block);
    group.calculate_block_position(containing_block);

    let d = &mut group.dimensions;
    for child in &mut group.children {
        if child.box_type == BoxType::TableRow {
            layout_row(child, d.content, columns, table_width, ctx);
        } else {
            child.layout(d.content, ctx);
        }
        d.content.height += child.dimensions.margin_box().height;
    }

    group.calculate_block_height();
}

/// [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
///
/// Place cells left to right on the given columns. "The height of a 'table-row'
/// element's box is calculated once the user agent has all the cells in the
/// row available: it is the maximum of the row's computed 'height' and the
/// minimum height (MIN) required by the cells."
fn layout_row(
    row: &mut LayoutBox<'_>,
    containing_block: Rect,
    columns: &[f32],
    table_width: f32,
    ctx: &LayoutContext<'_>,
) {
    row.calculate_block_width(containing_block);
    row.calculate_block_position(containing_block);

    let content = row.dimensions.content;
    let mut x = content.x;
    let mut column = 0;
    let mut tallest: f32 = 0.0;

    for cell in &mut row.children {
        let span = cell.colspan.max(1);
        let slot_width: f32 = columns.iter().skip(column).take(span).sum();
        column += span;

        let slot = Rect {
            x,
            y: content.y,
            width: slot_width,
            height: 0.0,
        };
        if cell.box_type == BoxType::TableCell {
            layout_cell(cell, slot, table_width, ctx);
        } else {
            cell.layout(slot, ctx);
        }

        let margin_box = cell.dimensions.margin_box();
        x += margin_box.width;
        tallest = tallest.max(margin_box.height);
    }

    row.dimensions.content.height = tallest;
    row.calculate_block_height();
    let row_height = row.dimensions.content.height;

    stretch_and_align_cells(row, row_height);
}

/// [§ 17.5.3](https://www.w3.org/TR/CSS2/tables.html#height-layout)
///
/// Lay out one cell in a slot. `slot.height` is the running cursor, so a cell
/// used outside a row stacks like a block. `percent_reference` is the width
/// percentages on the cell resolve against.
pub(crate) fn layout_cell(
    cell: &mut LayoutBox<'_>,
    slot: Rect,
    percent_reference: f32,
    ctx: &LayoutContext<'_>,
) {
    let style = cell.style;
    let d = &mut cell.dimensions;

    d.padding.left = resolve_edge(style.value("padding-left"), percent_reference);
    d.padding.right = resolve_edge(style.value("padding-right"), percent_reference);
    d.padding.top = resolve_edge(style.value("padding-top"), percent_reference);
    d.padding.bottom = resolve_edge(style.value("padding-bottom"), percent_reference);
    d.border.left = side_border(style, "left", percent_reference);
    d.border.right = side_border(style, "right", percent_reference);
    d.border.top = side_border(style, "top", percent_reference);
    d.border.bottom = side_border(style, "bottom", percent_reference);
    d.margin.left = resolve_edge(style.value("margin-left"), percent_reference);
    d.margin.right = resolve_edge(style.value("margin-right"), percent_reference);
    d.margin.top = resolve_edge(style.value("margin-top"), percent_reference);
    d.margin.bottom = resolve_edge(style.value("margin-bottom"), percent_reference);

    let extras = d.horizontal_extras();
    d.content.width = resolve_length(style.value("width"), Some(percent_reference))
        .unwrap_or((slot.width - extras).max(0.0));

    d.content.x = slot.x + d.margin.left + d.border.left + d.padding.left;
    d.content.y = slot.y + slot.height + d.margin.top + d.border.top + d.padding.top;
    d.content.height = 0.0;

    cell.layout_block_children(ctx);
    cell.calculate_block_height();
}

/// Grow every cell to the row's height, then apply its alignment.
fn stretch_and_align_cells(row: &mut LayoutBox<'_>, row_height: f32) {
    let row_align = row.style.attr("align");
    let row_valign = row.style.attr("valign");

    for cell in &mut row.children {
        if cell.box_type != BoxType::TableCell {
            continue;
        }
        let d = &mut cell.dimensions;
        let stretched = (row_height - d.vertical_extras()).max(0.0);
        if stretched > d.content.height {
            d.content.height = stretched;
        }

        // Attribute on the cell, then on the row, then the cell's CSS.
        let style = cell.style;
        let horizontal = style
            .attr("align")
            .or(row_align)
            .or_else(|| style.value("text-align"));
        let vertical = style
            .attr("valign")
            .or(row_valign)
            .or_else(|| style.value("vertical-align"));
        align_cell_children(cell, horizontal, vertical);
    }
}

/// [HTML § 15.3.8 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2)
///
/// Shift a cell's children within its leftover space. Horizontal alignment is
/// per child; vertical alignment moves the whole stack. Children that already
/// fill the cell do not move.
fn align_cell_children(cell: &mut LayoutBox<'_>, horizontal: Option<&str>, vertical: Option<&str>) {
    let content = cell.dimensions.content;
    let h_factor = horizontal.map_or(0.0, |value| {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" | "middle" | "-webkit-center" => 0.5,
            "right" | "end" | "-webkit-right" => 1.0,
            _ => 0.0,
        }
    });
    let v_factor = vertical.map_or(0.0, |value| {
        match value.trim().to_ascii_lowercase().as_str() {
            "middle" | "center" => 0.5,
            "bottom" => 1.0,
            _ => 0.0,
        }
    });

    let stack_height: f32 = cell
        .children
        .iter()
        .map(|child| child.dimensions.margin_box().height)
        .sum();
    let dy = ((content.height - stack_height) * v_factor).max(0.0);

    for child in &mut cell.children {
        let dx = ((content.width - child.dimensions.margin_box().width) * h_factor).max(0.0);
        if dx > 0.0 || dy > 0.0 {
            child.translate(dx, dy);
        }
    }
}

/// True for a non-row box that directly holds rows (`<tbody>` and friends).
fn is_row_group(child: &LayoutBox<'_>) -> bool {
    !matches!(child.box_type, BoxType::TableRow | BoxType::TableCell | BoxType::Anonymous)
        && child
            .children
            .iter()
            .any(|grandchild| grandchild.box_type == BoxType::TableRow)
}

/// Rows of a table: direct rows, and rows inside row groups, in order.
fn table_rows<'t, 'a>(table: &'t LayoutBox<'a>) -> impl Iterator<Item = &'t LayoutBox<'a>> {
    table.children.iter().flat_map(|child| {
        let rows: Vec<&'t LayoutBox<'a>> = if child.box_type == BoxType::TableRow {
            vec![child]
        } else if is_row_group(child) {
            child
                .children
                .iter()
                .filter(|row| row.box_type == BoxType::TableRow)
                .collect()
        } else {
            Vec::new()
        };
        rows
    })
}

/// [§ 17.5.2.1](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
fn column_count(table: &LayoutBox<'_>, max_colspan: usize) -> usize {
    let count = table_rows(table)
        .map(|row| row.children.iter().map(|cell| cell.colspan.max(1)).sum::<usize>())
        .max()
        .unwrap_or(0);
    let cap = max_colspan.max(1);
    if count > cap {
        warn_once("Layout", &format!("table with {count} columns clamped to {cap}"));
    }
    count.min(cap)
}

/// [§ 17.5.2.2](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
///
/// "Calculate the minimum content width (MCW) of each cell ... For each
/// column, determine a maximum and minimum column width from the cells that
/// span only that column."
fn column_widths(
    table: &LayoutBox<'_>,
    num_cols: usize,
    available: f32,
    ctx: &LayoutContext<'_>,
) -> Vec<f32> {
    let max_column = ctx.config.max_column_width.max(0.0);
    let mut explicit: Vec<Option<f32>> = vec![None; num_cols];
    let mut estimated = vec![0.0_f32; num_cols];

    for row in table_rows(table) {
        let mut column = 0;
        for cell in &row.children {
            if column >= num_cols {
                break;
            }
            let span = cell.colspan.max(1).min(num_cols - column);
            let extras = cell_horizontal_extras(cell, available, ctx.config.cell_padding_estimate);

            // An explicit width (plus the cell's padding and border) wins for
            // its column. Multi-span cells split theirs evenly.
            if let Some(width) = resolve_length(cell.style.value("width"), Some(available)) {
                let share = (width + extras) / span as f32;
                for slot in &mut explicit[column..column + span] {
                    *slot = Some(slot.map_or(share, |current| current.max(share)));
                }
            } else {
                let share = ((content_extent(cell, ctx) + extras) / span as f32).min(max_column);
                for slot in &mut estimated[column..column + span] {
                    *slot = slot.max(share);
                }
            }
            column += span;
        }
    }

    let widths: Vec<f32> = explicit
        .iter()
        .zip(&estimated)
        .map(|(explicit, estimate)| explicit.unwrap_or(*estimate))
        .collect();
    let is_explicit: Vec<bool> = explicit.iter().map(Option::is_some).collect();
    fit_columns(&widths, &is_explicit, available)
}

/// Fit raw column widths to the available width.
///
/// - No content signal at all: equal split.
/// - Narrower than available: scale up to fill it exactly. Content-estimated
///   columns absorb the space; explicit ones are scaled only when every
///   column is explicit.
/// - Wider than available: keep the raw widths and let the table overflow.
#[must_use]
pub fn fit_columns(widths: &[f32], is_explicit: &[bool], available: f32) -> Vec<f32> {
    if widths.is_empty() {
        return Vec::new();
    }
    let available = available.max(0.0);
    let total: f32 = widths.iter().sum();
    if total <= 0.0 {
        return vec![available / widths.len() as f32; widths.len()];
    }
    if total >= available {
        return widths.to_vec();
    }

    let explicit_total: f32 = widths
        .iter()
        .zip(is_explicit)
        .filter(|(_, explicit)| **explicit)
        .map(|(width, _)| width)
        .sum();
    let estimated_total = total - explicit_total;

    if estimated_total > 0.0 {
        let scale = (available - explicit_total) / estimated_total;
        widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                if is_explicit.get(i).copied().unwrap_or(false) {
                    *width
                } else {
                    width * scale
                }
            })
            .collect()
    } else {
        let scale = available / total;
        widths.iter().map(|width| width * scale).collect()
    }
}

/// Padding + border on a cell's left and right, for column estimation.
fn cell_horizontal_extras(cell: &LayoutBox<'_>, reference: f32, padding_fallback: f32) -> f32 {
    let style = cell.style;
    let mut padding = resolve_edge(style.value("padding-left"), reference)
        + resolve_edge(style.value("padding-right"), reference);
    if padding <= 0.0 {
        padding = padding_fallback.max(0.0) * 2.0;
    }
    padding + side_border(style, "left", reference) + side_border(style, "right", reference)
}

/// Widest text line anywhere under `node`, plus the horizontal edges of the
/// boxes it sits in.
fn content_extent(node: &LayoutBox<'_>, ctx: &LayoutContext<'_>) -> f32 {
    node.children
        .iter()
        .map(|child| {
            if let Some(text) = child.text() {
                let font = FontStyle::from_styled(child.style, ctx.config.base_font_size);
                ctx.fonts.measure(text, &font).width
            } else {
                let style = child.style;
                let edges = resolve_edge(style.value("padding-left"), 0.0)
                    + resolve_edge(style.value("padding-right"), 0.0)
                    + resolve_edge(style.value("margin-left"), 0.0)
                    + resolve_edge(style.value("margin-right"), 0.0)
                    + side_border(style, "left", 0.0)
                    + side_border(style, "right", 0.0);
                let own = resolve_length(style.value("width"), None).unwrap_or(0.0);
                own.max(content_extent(child, ctx)) + edges
            }
        })
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_columns_scales_estimates_to_fill() {
        let fitted = fit_columns(&[50.0, 150.0], &[false, false], 400.0);
        assert!((fitted[0] - 100.0).abs() < 1e-3);
        assert!((fitted[1] - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_columns_keeps_explicit_width() {
        let fitted = fit_columns(&[100.0, 50.0], &[true, false], 400.0);
        assert_eq!(fitted[0], 100.0);
        assert!((fitted[1] - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_columns_overflow_and_empty() {
        assert_eq!(fit_columns(&[300.0, 300.0], &[false, false], 400.0), vec![300.0, 300.0]);
        assert_eq!(fit_columns(&[0.0, 0.0], &[false, false], 400.0), vec![200.0, 200.0]);
        assert!(fit_columns(&[], &[], 400.0).is_empty());
    }
}
