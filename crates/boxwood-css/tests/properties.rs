//! Property tests for the numeric policy, shorthands and column fitting.

use boxwood_css::cascade::shorthand::{Expansion, expand};
use boxwood_css::layout::fit_columns;
use boxwood_css::values::{resolve_edge, resolve_length};
use boxwood_css::{
    ApproximateFontMetrics, LayoutConfig, LayoutContext, LengthValue, Stylesheet, layout_tree,
    style_tree,
};
use boxwood_dom::{DomTree, NodeId};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn length_parsing_never_goes_negative(input: String, reference: u16) -> bool {
    let reference = f32::from(reference);
    let edge = resolve_edge(Some(&input), reference);
    let width = resolve_length(Some(&input), Some(reference));
    let _ = LengthValue::parse(&input);
    edge >= 0.0 && width.is_none_or(|w| w >= 0.0)
}

#[quickcheck]
fn single_value_margin_sets_every_side(px: u16) -> bool {
    let value = format!("{px}px");
    match expand("margin", &value) {
        Expansion::Longhands(longhands) => {
            longhands.len() == 4 && longhands.iter().all(|(_, v)| *v == value)
        }
        _ => false,
    }
}

#[quickcheck]
fn fitted_columns_fill_available_width(raw: Vec<u16>, available: u16) -> TestResult {
    let widths: Vec<f32> = raw.iter().take(50).map(|w| f32::from(*w % 500)).collect();
    let available = f32::from(available);
    let total: f32 = widths.iter().sum();
    if widths.is_empty() || total <= 0.0 || total >= available {
        return TestResult::discard();
    }

    let flags = vec![false; widths.len()];
    let fitted = fit_columns(&widths, &flags, available);
    let sum: f32 = fitted.iter().sum();
    TestResult::from_bool((sum - available).abs() <= available * 1e-3)
}

#[quickcheck]
fn auto_width_is_never_negative(margin_left: u16, margin_right: u16, padding: u16) -> bool {
    let mut tree = DomTree::new();
    let style = format!(
        "margin-left: {margin_left}px; margin-right: {margin_right}px; padding: {padding}px"
    );
    let div = tree.alloc_element("div", [("style", style.as_str())]);
    tree.append_child(NodeId::ROOT, div);

    let styled = style_tree(&tree, &Stylesheet::empty());
    let metrics = ApproximateFontMetrics::default();
    let ctx = LayoutContext::new(LayoutConfig::default(), &metrics);
    let root = layout_tree(&styled, &ctx);

    root.descendants().all(|b| {
        let d = b.dimensions;
        d.content.width >= 0.0 && d.content.height >= 0.0
    })
}
