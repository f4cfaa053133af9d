//! Tests for document tree construction and upward traversal.

use boxwood_dom::{DomTree, NodeId, NodeType};

// ========== append_child ==========

#[test]
fn test_append_child_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let body = tree.alloc_tag("body");
    tree.append_child(NodeId::ROOT, body);

    let a = tree.alloc_tag("p");
    let b = tree.alloc_text("hello");
    tree.append_child(body, a);
    tree.append_child(body, b);

    assert_eq!(tree.children(body), &[a, b]);
    assert_eq!(tree.parent(a), Some(body));
    assert_eq!(tree.parent(b), Some(body));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_append_child_reparents_instead_of_sharing() {
    let mut tree = DomTree::new();
    let first = tree.alloc_tag("div");
    let second = tree.alloc_tag("div");
    let child = tree.alloc_tag("span");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);
    tree.append_child(first, child);

    tree.append_child(second, child);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

#[test]
fn test_append_child_refuses_cycles() {
    let mut tree = DomTree::new();
    let outer = tree.alloc_tag("div");
    let inner = tree.alloc_tag("div");
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, inner);

    // Would make outer its own ancestor.
    tree.append_child(inner, outer);
    tree.append_child(inner, inner);

    assert_eq!(tree.parent(outer), Some(NodeId::ROOT));
    assert!(tree.children(inner).is_empty());
}

// ========== ancestors ==========

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let html = tree.alloc_tag("html");
    let body = tree.alloc_tag("body");
    let p = tree.alloc_tag("p");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, p);

    let chain: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(chain, vec![body, html, NodeId::ROOT]);
    assert!(tree.is_descendant_of(p, html));
    assert!(!tree.is_descendant_of(html, p));
}

// ========== element data ==========

#[test]
fn test_attribute_keys_are_lowercased() {
    let mut tree = DomTree::new();
    let td = tree.alloc_element("TD", [("COLSPAN", "2"), ("Class", "a  b")]);

    let data = tree.as_element(td).unwrap();
    assert_eq!(data.tag_name, "td");
    assert_eq!(data.attr("colspan"), Some("2"));
    assert_eq!(data.attr("ColSpan"), Some("2"));
    let classes = data.classes();
    assert_eq!(classes.len(), 2);
    assert!(classes.contains("a"));
    assert!(classes.contains("b"));
}

#[test]
fn test_text_and_document_nodes() {
    let mut tree = DomTree::new();
    let text = tree.alloc_text("  words  ");
    tree.append_child(NodeId::ROOT, text);

    assert_eq!(tree.as_text(text), Some("  words  "));
    assert!(tree.as_element(text).is_none());
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert_eq!(tree.len(), 2);
}
