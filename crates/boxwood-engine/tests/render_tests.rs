//! End-to-end tests for the render pipeline.

use boxwood_common::warning::was_warned;
use boxwood_css::{
    ApproximateFontMetrics, BoxType, FontMetrics, FontStyle, LayoutConfig, Rule, Selector,
    SimpleSelector, Stylesheet, TextSize,
};
use boxwood_dom::{DomTree, NodeId};
use boxwood_engine::{RenderedBox, load_config, render, render_approximate, to_json};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = tree.alloc_element(tag, attrs.iter().copied());
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, content: &str) {
    let id = tree.alloc_text(content);
    tree.append_child(parent, id);
}

/// `<div class="card">hello</div><p>world</p>` with a card rule.
fn sample() -> (DomTree, Stylesheet) {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", &[("class", "card")]);
    text(&mut tree, div, "  hello  ");
    let p = element(&mut tree, NodeId::ROOT, "p", &[]);
    text(&mut tree, p, "world");

    let sheet = Stylesheet::new(vec![Rule::with_block(
        vec![Selector::simple(SimpleSelector::universal().with_class("card"))],
        "width: 400px; padding: 10px; border: 2px solid black; color: navy",
    )]);
    (tree, sheet)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn test_render_snapshots_geometry_and_style() {
    let (tree, sheet) = sample();
    let rendered = render_approximate(&tree, &sheet, &LayoutConfig::default());

    assert_eq!(rendered.tag, None);
    assert!(approx(rendered.content.width, 800.0));

    let card = rendered.find_by_tag("div")[0];
    assert!(approx(card.content.width, 400.0));
    assert!(approx(card.border_box().width, 424.0));
    assert_eq!(card.style.get("width").map(String::as_str), Some("400px"));
    assert_eq!(card.style.get("color").map(String::as_str), Some("navy"));

    let label = &card.children[0];
    assert_eq!(label.box_type, BoxType::Anonymous);
    assert_eq!(label.text.as_deref(), Some("hello"));
    assert!(approx(label.content.width, 5.0 * 9.6));
    // Text inherits color from its element.
    assert_eq!(label.style.get("color").map(String::as_str), Some("navy"));

    let para = rendered.find_by_tag("p")[0];
    assert!(approx(para.margin_box().y, card.margin_box().y + card.margin_box().height));
}

#[test]
fn test_descendants_are_in_document_order() {
    let (tree, sheet) = sample();
    let rendered = render_approximate(&tree, &sheet, &LayoutConfig::default());
    let order: Vec<_> = rendered
        .descendants()
        .map(|b| b.tag.clone().or_else(|| b.text.clone()).unwrap_or_default())
        .collect();
    assert_eq!(order, ["", "div", "hello", "p", "world"]);
}

#[test]
fn test_empty_document_renders_degenerate_root() {
    let rendered = render_approximate(&DomTree::new(), &Stylesheet::empty(), &LayoutConfig::default());
    assert!(rendered.children.is_empty());
    assert!(approx(rendered.content.width, 0.0));
    assert!(approx(rendered.content.height, 0.0));
}

#[test]
fn test_json_output_names_fields() {
    let (tree, sheet) = sample();
    let rendered = render_approximate(&tree, &sheet, &LayoutConfig::default());
    let json = to_json(&rendered).unwrap();

    assert!(json.contains("\"box_type\": \"Anonymous\""));
    assert!(json.contains("\"text\": \"hello\""));
    assert!(json.contains("\"width\": \"400px\""));

    let parsed: RenderedBox = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, rendered);
}

#[test]
fn test_loaded_config_sets_viewport() {
    let (tree, sheet) = sample();
    let config = load_config(r#"{ "viewport_width": 500 }"#).unwrap();
    let rendered = render_approximate(&tree, &sheet, &config);
    let para = rendered.find_by_tag("p")[0];
    assert!(approx(para.content.width, 500.0));
}

/// A provider that is not monospaced in the usual sense.
struct WideMetrics;

impl FontMetrics for WideMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> TextSize {
        TextSize {
            width: text.chars().count() as f32 * style.size,
            height: style.size * 2.0,
        }
    }
}

#[test]
fn test_metrics_provider_is_swappable() {
    let (tree, sheet) = sample();
    let config = LayoutConfig::default();
    let rendered = render(&tree, &sheet, &config, &WideMetrics);

    let label = &rendered.find_by_tag("div")[0].children[0];
    assert!(approx(label.content.width, 5.0 * 16.0));
    assert!(approx(label.content.height, 32.0));
    // Geometry that does not depend on text is unchanged.
    assert!(approx(rendered.find_by_tag("div")[0].content.width, 400.0));
}

#[test]
fn test_concurrent_passes_share_inputs() {
    let (tree, sheet) = sample();
    let config = LayoutConfig::default();
    let metrics = ApproximateFontMetrics::default();
    let expected = render(&tree, &sheet, &config, &metrics);

    let results: Vec<RenderedBox> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| render(&tree, &sheet, &config, &metrics)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("render thread panicked"))
            .collect()
    });

    assert_eq!(results.len(), 4);
    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_each_pass_reports_its_own_warnings() {
    const UNIT_WARNING: &str = "unsupported length unit in '3vw', treating as auto";

    let mut tree = DomTree::new();
    let _ = element(&mut tree, NodeId::ROOT, "div", &[("style", "width: 3vw")]);
    let config = LayoutConfig::default();

    let _ = render_approximate(&tree, &Stylesheet::empty(), &config);
    assert!(was_warned("CSS", UNIT_WARNING));

    // An unrelated pass on the same thread starts from a clean slate.
    let _ = render_approximate(&DomTree::new(), &Stylesheet::empty(), &config);
    assert!(!was_warned("CSS", UNIT_WARNING));

    // The same degradation is reported again by a later pass.
    let _ = render_approximate(&tree, &Stylesheet::empty(), &config);
    assert!(was_warned("CSS", UNIT_WARNING));
}

#[test]
fn test_extreme_legacy_font_size_does_not_panic() {
    let mut tree = DomTree::new();
    let font = element(&mut tree, NodeId::ROOT, "font", &[("size", "+2147483647")]);
    text(&mut tree, font, "x");

    let rendered = render_approximate(&tree, &Stylesheet::empty(), &LayoutConfig::default());
    let font_box = rendered.find_by_tag("font")[0];
    assert_eq!(font_box.style.get("font-size").map(String::as_str), Some("48px"));
    assert!(approx(font_box.children[0].content.width, 9.6 * 3.0));
}
