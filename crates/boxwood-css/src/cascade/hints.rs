//! Presentational hints from HTML attributes and tags.
//!
//! [HTML § 15.2 The CSS user agent style sheet and presentational hints](https://html.spec.whatwg.org/multipage/rendering.html#presentational-hints)
//!
//! "Some elements are presentational hints ... these are treated as author
//! level rules with a specificity of zero that are placed at the start of the
//! author style sheet."
//!
//! Hints are the lowest-priority declarations an element gets. Any matching
//! stylesheet rule or inline style overrides them.

use boxwood_dom::{DomTree, ElementData, NodeId};

use crate::stylesheet::Declaration;
use crate::values::{format_px, parse_number};

/// Elements that never render.
///
/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
const HIDDEN_ELEMENTS: [&str; 7] = ["head", "script", "style", "title", "meta", "link", "template"];

/// Collect the presentational hints for an element, in application order.
#[must_use]
pub fn presentational_hints(tree: &DomTree, id: NodeId, element: &ElementData) -> Vec<Declaration> {
    let mut hints = Vec::new();
    let tag = element.tag_name.as_str();

    // [§ 15.3.1 Hidden elements]
    if HIDDEN_ELEMENTS.contains(&tag) || element.attr("hidden").is_some() {
        hints.push(Declaration::new("display", "none"));
    }

    // [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
    match tag {
        "b" | "strong" => hints.push(Declaration::new("font-weight", "bold")),
        "i" | "em" | "cite" | "var" => hints.push(Declaration::new("font-style", "italic")),
        "u" | "ins" => hints.push(Declaration::new("text-decoration", "underline")),
        "s" | "strike" | "del" => hints.push(Declaration::new("text-decoration", "line-through")),
        _ => {}
    }

    // [§ 15.3.10 The font element](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
    if tag == "font" {
        if let Some(color) = element.attr("color") {
            hints.push(Declaration::new("color", color));
        }
        if let Some(face) = element.attr("face") {
            hints.push(Declaration::new("font-family", face));
        }
        if let Some(size) = element.attr("size").and_then(legacy_font_size) {
            hints.push(Declaration::new("font-size", size));
        }
    }

    // [§ 15.3.2 The page](https://html.spec.whatwg.org/multipage/rendering.html#the-page)
    if tag == "body" {
        if let Some(text) = element.attr("text") {
            hints.push(Declaration::new("color", text));
        }
    }

    // [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
    if let Some(bgcolor) = element.attr("bgcolor") {
        hints.push(Declaration::new("background-color", bgcolor));
    }

    if matches!(tag, "div" | "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
        if let Some(align) = element.attr("align") {
            hints.push(Declaration::new("text-align", align));
        }
    }

    // "A table element whose align attribute's value is an ASCII
    // case-insensitive match for the string "center" or "middle" is expected
    // to have its 'margin-left' and 'margin-right' properties set to 'auto'."
    if tag == "table"
        && let Some(align) = element.attr("align").map(str::trim)
        && (align.eq_ignore_ascii_case("center") || align.eq_ignore_ascii_case("middle"))
    {
        hints.push(Declaration::new("margin-left", "auto"));
        hints.push(Declaration::new("margin-right", "auto"));
    }

    if matches!(tag, "td" | "th" | "tr" | "tbody" | "thead" | "tfoot") {
        if let Some(valign) = element.attr("valign") {
            hints.push(Declaration::new("vertical-align", valign));
        }
    }

    // [§ 15.3.8 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2)
    //
    // "maps to the dimension property ... width / height"
    if matches!(tag, "table" | "td" | "th" | "img" | "col" | "hr" | "iframe") {
        for property in ["width", "height"] {
            if let Some(value) = element.attr(property).and_then(dimension_hint) {
                hints.push(Declaration::new(property, &value));
            }
        }
    }

    if tag == "table" {
        if let Some(border) = element.attr("border") {
            // "border: if the attribute is present but its value cannot be
            // parsed, a value of 1 is used."
            let width = parse_number(border).filter(|n| *n >= 0.0).unwrap_or(1.0);
            if width > 0.0 {
                for side in ["top", "right", "bottom", "left"] {
                    hints.push(Declaration::new(&format!("border-{side}-width"), &format_px(width)));
                    hints.push(Declaration::new(&format!("border-{side}-style"), "solid"));
                }
            }
        }
    }

    // "cellpadding ... maps to padding on each td and th of the table"
    if matches!(tag, "td" | "th") {
        if let Some(padding) = enclosing_table(tree, id)
            .and_then(|table| table.attr("cellpadding"))
            .and_then(parse_number)
            .filter(|n| *n >= 0.0)
        {
            for side in ["top", "right", "bottom", "left"] {
                hints.push(Declaration::new(&format!("padding-{side}"), &format_px(padding)));
            }
        }
    }

    hints
}

/// Nearest `<table>` ancestor.
fn enclosing_table(tree: &DomTree, id: NodeId) -> Option<&ElementData> {
    tree.ancestors(id)
        .filter_map(|ancestor| tree.as_element(ancestor))
        .find(|data| data.is("table"))
}

/// "rules for parsing dimension values": a bare number is pixels, a trailing
/// `%` keeps the percentage.
fn dimension_hint(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        return parse_number(pct).filter(|n| *n >= 0.0).map(|n| format!("{n}%"));
    }
    let number = value.strip_suffix("px").unwrap_or(value);
    parse_number(number).filter(|n| *n >= 0.0).map(format_px)
}

/// [§ 15.3.4](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
///
/// "rules for parsing a legacy font size": `1`–`7`, or `+n`/`-n` relative to 3.
fn legacy_font_size(value: &str) -> Option<&'static str> {
    let value = value.trim();
    let relative = value.starts_with('+') || value.starts_with('-');
    let number: i32 = value.parse().ok()?;
    let size = if relative { number.saturating_add(3) } else { number };
    Some(match size.clamp(1, 7) {
        1 => "x-small",
        2 => "small",
        3 => "medium",
        4 => "large",
        5 => "x-large",
        6 => "xx-large",
        _ => "xxx-large",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints_for(tag: &str, attrs: &[(&str, &str)]) -> Vec<Declaration> {
        let mut tree = DomTree::new();
        let id = tree.alloc_element(tag, attrs.iter().copied());
        tree.append_child(NodeId::ROOT, id);
        let element = tree.as_element(id).cloned().unwrap();
        presentational_hints(&tree, id, &element)
    }

    fn value_of<'a>(hints: &'a [Declaration], property: &str) -> Option<&'a str> {
        hints
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    #[test]
    fn test_font_element_hints() {
        let hints = hints_for("font", &[("color", "red"), ("face", "Arial"), ("size", "+2")]);
        assert_eq!(value_of(&hints, "color"), Some("red"));
        assert_eq!(value_of(&hints, "font-family"), Some("Arial"));
        assert_eq!(value_of(&hints, "font-size"), Some("x-large"));
    }

    #[test]
    fn test_bgcolor_and_dimensions() {
        let hints = hints_for("td", &[("bgcolor", "#eee"), ("width", "120"), ("height", "50%")]);
        assert_eq!(value_of(&hints, "background-color"), Some("#eee"));
        assert_eq!(value_of(&hints, "width"), Some("120px"));
        assert_eq!(value_of(&hints, "height"), Some("50%"));
    }

    #[test]
    fn test_hidden_elements() {
        assert_eq!(value_of(&hints_for("script", &[]), "display"), Some("none"));
        assert_eq!(value_of(&hints_for("div", &[("hidden", "")]), "display"), Some("none"));
        assert_eq!(value_of(&hints_for("div", &[]), "display"), None);
    }

    #[test]
    fn test_table_border_attribute() {
        let hints = hints_for("table", &[("border", "2")]);
        assert_eq!(value_of(&hints, "border-left-width"), Some("2px"));
        assert_eq!(value_of(&hints, "border-left-style"), Some("solid"));
    }

    #[test]
    fn test_cellpadding_reaches_cells() {
        let mut tree = DomTree::new();
        let table = tree.alloc_element("table", [("cellpadding", "4")]);
        let tr = tree.alloc_tag("tr");
        let td = tree.alloc_tag("td");
        tree.append_child(NodeId::ROOT, table);
        tree.append_child(table, tr);
        tree.append_child(tr, td);

        let element = tree.as_element(td).cloned().unwrap();
        let hints = presentational_hints(&tree, td, &element);
        assert_eq!(value_of(&hints, "padding-top"), Some("4px"));
        assert_eq!(value_of(&hints, "padding-left"), Some("4px"));
    }

    #[test]
    fn test_legacy_font_size_clamps() {
        assert_eq!(legacy_font_size("9"), Some("xxx-large"));
        assert_eq!(legacy_font_size("-5"), Some("x-small"));
        assert_eq!(legacy_font_size("3"), Some("medium"));
        assert_eq!(legacy_font_size("big"), None);
    }

    #[test]
    fn test_legacy_font_size_extremes_saturate() {
        assert_eq!(legacy_font_size("+2147483647"), Some("xxx-large"));
        assert_eq!(legacy_font_size("-2147483648"), Some("x-small"));
        assert_eq!(legacy_font_size("99999999999"), None);
    }

    #[test]
    fn test_table_align_center_uses_auto_margins() {
        let hints = hints_for("table", &[("align", "Center")]);
        assert_eq!(value_of(&hints, "margin-left"), Some("auto"));
        assert_eq!(value_of(&hints, "margin-right"), Some("auto"));
        assert_eq!(value_of(&hints, "text-align"), None);

        let hints = hints_for("table", &[("align", "left")]);
        assert_eq!(value_of(&hints, "margin-left"), None);
        assert_eq!(value_of(&hints, "text-align"), None);

        let hints = hints_for("div", &[("align", "center")]);
        assert_eq!(value_of(&hints, "text-align"), Some("center"));
    }
}
