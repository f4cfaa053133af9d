//! CSS Cascading and Style Computation
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//!
//! [`style_tree`] walks the document once and produces a [`StyledNode`] per
//! node. Each element's map is built in increasing priority:
//!
//! 1. inherited values copied from the parent's resolved map
//! 2. presentational hints ([`hints`])
//! 3. matching stylesheet rules, ascending by (specificity, source order)
//! 4. the element's `style` attribute
//!
//! Shorthands are expanded ([`shorthand`]) before anything is stored, so a map
//! never holds a shorthand key.

pub mod hints;
pub mod shorthand;

use std::collections::HashMap;

use boxwood_common::warning::warn_once;
use boxwood_dom::{DomTree, ElementData, Node, NodeId, NodeType};

use crate::selector::{Selector, Specificity};
use crate::stylesheet::{Declaration, Stylesheet, parse_declarations};
use crate::values::{DEFAULT_FONT_SIZE_PX, LengthValue, compute_font_size, format_px};
use hints::presentational_hints;
use shorthand::Expansion;

/// Canonical longhand property name → raw or computed value.
pub type PropertyMap = HashMap<String, String>;

/// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
///
/// Properties an element inherits from its parent element.
pub const INHERITED_PROPERTIES: [&str; 13] = [
    "color",
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "text-decoration",
    "line-height",
    "text-align",
    "visibility",
    "white-space",
    "letter-spacing",
    "word-spacing",
    "list-style-type",
];

/// Properties a text node copies from its parent. Text never matches
/// selectors, so this is all the style it ever has.
pub const TEXT_INHERITED_PROPERTIES: [&str; 7] = [
    "color",
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "text-decoration",
    "line-height",
];

/// A document node annotated with its resolved property map.
///
/// The styled tree borrows the document; it is built once per render pass and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StyledNode<'a> {
    /// The node this style belongs to.
    pub id: NodeId,
    /// The document node itself.
    pub node: &'a Node,
    /// Resolved longhand properties.
    pub values: PropertyMap,
    /// Styled children in document order.
    pub children: Vec<StyledNode<'a>>,
}

impl<'a> StyledNode<'a> {
    /// The resolved value of a property, if any.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// `name`, else `fallback_name`, else `default`.
    #[must_use]
    pub fn lookup<'s>(&'s self, name: &str, fallback_name: &str, default: &'s str) -> &'s str {
        self.value(name)
            .or_else(|| self.value(fallback_name))
            .unwrap_or(default)
    }

    /// The declared `display` value, if one was set.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.value("display")
    }

    /// Element data for element nodes.
    #[must_use]
    pub fn element(&self) -> Option<&'a ElementData> {
        self.node.as_element()
    }

    /// Lowercased tag name for element nodes.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.element().map(|data| data.tag_name.as_str())
    }

    /// An HTML attribute of the element, ignoring case.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element().and_then(|data| data.attr(name))
    }

    /// True for text nodes.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        self.node.is_text()
    }

    /// The literal text of a text node.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        self.node.as_text()
    }
}

/// A stylesheet rule prepared for matching: malformed selectors removed.
struct MatchableRule<'s> {
    selectors: Vec<&'s Selector>,
    declarations: &'s [Declaration],
    order: usize,
}

impl MatchableRule<'_> {
    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// "If the selector is a selector list, this number is calculated for each
    /// selector in the list. For a given matching process against the list,
    /// the specificity in effect is that of the most specific selector in the
    /// list that matches."
    fn matched_specificity(&self, tree: &DomTree, id: NodeId) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|selector| selector.matches_in_tree(tree, id))
            .map(|selector| selector.specificity())
            .max()
    }
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given property
/// on a given element, sorts them by their declaration's precedence..."
///
/// Resolve the cascade for the whole document.
#[must_use]
pub fn style_tree<'a>(tree: &'a DomTree, stylesheet: &Stylesheet) -> StyledNode<'a> {
    let rules = matchable_rules(stylesheet);
    style_node(tree, NodeId::ROOT, tree.document(), &rules, &PropertyMap::new())
}

fn matchable_rules(stylesheet: &Stylesheet) -> Vec<MatchableRule<'_>> {
    stylesheet
        .rules
        .iter()
        .enumerate()
        .filter_map(|(order, rule)| {
            let selectors: Vec<&Selector> = rule
                .selectors
                .iter()
                .filter(|selector| {
                    let malformed = selector.is_malformed();
                    if malformed {
                        warn_once("CSS", &format!("ignoring malformed selector {selector:?}"));
                    }
                    !malformed
                })
                .collect();
            (!selectors.is_empty()).then(|| MatchableRule {
                selectors,
                declarations: &rule.declarations,
                order,
            })
        })
        .collect()
}

/// Recursively resolve a node and its subtree. `parent` is the parent's
/// just-resolved map.
fn style_node<'a>(
    tree: &'a DomTree,
    id: NodeId,
    node: &'a Node,
    rules: &[MatchableRule<'_>],
    parent: &PropertyMap,
) -> StyledNode<'a> {
    let values = match &node.node_type {
        NodeType::Document => PropertyMap::new(),
        NodeType::Text(_) => copy_properties(parent, &TEXT_INHERITED_PROPERTIES),
        NodeType::Element(element) => cascade_element(tree, id, element, rules, parent),
    };

    let children = node
        .children
        .iter()
        .filter_map(|&child| {
            tree.get(child)
                .map(|child_node| style_node(tree, child, child_node, rules, &values))
        })
        .collect();

    StyledNode {
        id,
        node,
        values,
        children,
    }
}

fn copy_properties(parent: &PropertyMap, properties: &[&str]) -> PropertyMap {
    properties
        .iter()
        .filter_map(|&property| {
            parent
                .get(property)
                .map(|value| (property.to_string(), value.clone()))
        })
        .collect()
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
fn cascade_element(
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
    rules: &[MatchableRule<'_>],
    parent: &PropertyMap,
) -> PropertyMap {
    // STEP 1: Inherit.
    //
    // [§ 7.2](https://www.w3.org/TR/css-cascade-4/#inheriting)
    // "the inherited value of a property on an element is the computed value
    // of the property on the element's parent element"
    let mut values = copy_properties(parent, &INHERITED_PROPERTIES);

    // STEP 2: Presentational hints, the lowest author-level priority.
    for declaration in presentational_hints(tree, id, element) {
        apply_declaration(&mut values, parent, &declaration);
    }

    // STEP 3: Collect matching rules and the inline style.
    //
    // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
    // [§ 6.4.4 Order of Appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
    // "The last declaration in document order wins."
    let inline = element
        .attr("style")
        .map(parse_declarations)
        .unwrap_or_default();

    let mut matched: Vec<(Specificity, usize, &[Declaration])> = rules
        .iter()
        .filter_map(|rule| {
            rule.matched_specificity(tree, id)
                .map(|specificity| (specificity, rule.order, rule.declarations))
        })
        .collect();
    matched.push((Specificity::INLINE, usize::MAX, inline.as_slice()));

    // Stable sort: ties keep source order, so later rules are applied last.
    matched.sort_by_key(|&(specificity, order, _)| (specificity, order));

    // STEP 4: Apply in ascending priority; each declaration overwrites.
    for (_, _, declarations) in matched {
        for declaration in declarations {
            apply_declaration(&mut values, parent, declaration);
        }
    }

    // STEP 5: Compute font-size so children inherit an absolute value.
    //
    // [§ 2.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    // "Computed value: an absolute length"
    let parent_px = parent
        .get("font-size")
        .and_then(|value| match LengthValue::parse(value) {
            LengthValue::Px(px) => Some(px),
            _ => None,
        })
        .unwrap_or(DEFAULT_FONT_SIZE_PX);
    if let Some(px) = values
        .get("font-size")
        .and_then(|declared| compute_font_size(declared, parent_px))
    {
        let _ = values.insert("font-size".to_string(), format_px(px));
    }

    values
}

/// Apply one declaration, expanding shorthands and CSS-wide keywords.
fn apply_declaration(values: &mut PropertyMap, parent: &PropertyMap, declaration: &Declaration) {
    let property = declaration.property.as_str();
    let value = strip_important(&declaration.value);

    // [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
    // A CSS-wide keyword on a shorthand applies to each of its longhands.
    if is_css_wide_keyword(value) && shorthand::is_shorthand(property) {
        for longhand in shorthand::longhands(property) {
            apply_longhand(values, parent, &longhand, value);
        }
        return;
    }

    match shorthand::expand(property, value) {
        Expansion::Longhand => apply_longhand(values, parent, property, value),
        Expansion::Longhands(longhands) => {
            for (longhand, longhand_value) in longhands {
                apply_longhand(values, parent, &longhand, &longhand_value);
            }
        }
        Expansion::Invalid => {
            warn_once(
                "CSS",
                &format!("dropping invalid shorthand '{property}: {value}'"),
            );
        }
    }
}

fn is_css_wide_keyword(value: &str) -> bool {
    ["inherit", "initial", "unset"]
        .iter()
        .any(|keyword| value.eq_ignore_ascii_case(keyword))
}

fn apply_longhand(values: &mut PropertyMap, parent: &PropertyMap, property: &str, value: &str) {
    let inherit = if value.eq_ignore_ascii_case("inherit") {
        true
    } else if value.eq_ignore_ascii_case("unset") {
        // "if the property is an inherited property, this is treated as
        // inherit, and if it is not, this is treated as initial"
        INHERITED_PROPERTIES.contains(&property)
    } else if value.eq_ignore_ascii_case("initial") {
        false
    } else {
        let _ = values.insert(property.to_string(), value.to_string());
        return;
    };

    match parent.get(property).filter(|_| inherit) {
        Some(inherited) => {
            let _ = values.insert(property.to_string(), inherited.clone());
        }
        // No stored value means "use the engine default".
        None => {
            let _ = values.remove(property);
        }
    }
}

/// [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// Strip a trailing `!important`. There is no separate importance layer.
fn strip_important(value: &str) -> &str {
    let value = value.trim();
    if let Some(bang) = value.rfind('!') {
        let (head, tail) = value.split_at(bang);
        if tail[1..].trim().eq_ignore_ascii_case("important") {
            return head.trim_end();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_strip_important() {
        assert_eq!(strip_important("red !important"), "red");
        assert_eq!(strip_important("red ! IMPORTANT "), "red");
        assert_eq!(strip_important("red"), "red");
        assert_eq!(strip_important("a!b"), "a!b");
    }

    #[test]
    fn test_inherit_keyword_copies_or_removes() {
        let parent = map(&[("color", "green")]);
        let mut values = map(&[("color", "red"), ("margin-top", "4px")]);

        apply_declaration(&mut values, &parent, &Declaration::new("color", "inherit"));
        assert_eq!(values.get("color").map(String::as_str), Some("green"));

        apply_declaration(&mut values, &parent, &Declaration::new("margin-top", "inherit"));
        assert!(!values.contains_key("margin-top"));
    }

    #[test]
    fn test_unset_and_initial() {
        let parent = map(&[("color", "green"), ("width", "10px")]);
        let mut values = map(&[("color", "red"), ("width", "5px")]);

        apply_declaration(&mut values, &parent, &Declaration::new("width", "unset"));
        assert!(!values.contains_key("width"));

        apply_declaration(&mut values, &parent, &Declaration::new("color", "unset"));
        assert_eq!(values.get("color").map(String::as_str), Some("green"));

        apply_declaration(&mut values, &parent, &Declaration::new("color", "initial"));
        assert!(!values.contains_key("color"));
    }

    #[test]
    fn test_keyword_on_shorthand_reaches_longhands() {
        let parent = map(&[("padding-left", "3px")]);
        let mut values = map(&[("padding-top", "9px")]);
        apply_declaration(&mut values, &parent, &Declaration::new("padding", "inherit"));
        assert!(!values.contains_key("padding-top"));
        assert_eq!(values.get("padding-left").map(String::as_str), Some("3px"));
    }

    #[test]
    fn test_invalid_shorthand_is_dropped() {
        let mut values = PropertyMap::new();
        apply_declaration(
            &mut values,
            &PropertyMap::new(),
            &Declaration::new("margin", "1px 2px 3px 4px 5px"),
        );
        assert!(values.is_empty());
    }
}
