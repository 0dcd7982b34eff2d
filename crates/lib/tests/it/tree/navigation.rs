//! Path, siblings and context lookup tests

use domtree::DomTree;

use crate::helpers::*;

#[test]
fn test_root_path_is_its_name() {
    let (tree, a, b) = tree_a_b();
    assert_eq!(tree.path(a).unwrap(), "a");
    assert_eq!(tree.path(b).unwrap(), "a.b");
}

#[test]
fn test_default_root_name() {
    let tree = DomTree::new();
    assert_eq!(tree.path(tree.root()).unwrap(), "root");
}

#[test]
fn test_namespace_path_is_its_name_at_any_depth() {
    let (mut tree, _, b) = tree_a_b();
    let c = tree.new_child(b, "c").unwrap();
    let ns = tree.new_namespace(c, "ns").unwrap();
    let inner = tree.new_child(ns, "inner").unwrap();

    assert_eq!(tree.path(c).unwrap(), "a.b.c");
    assert_eq!(tree.path(ns).unwrap(), "ns");
    assert_eq!(tree.path(inner).unwrap(), "ns.inner");
}

#[test]
fn test_siblings_are_sorted_and_exclude_self() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_child_bulk(root, ["z", "y", "x"]).unwrap();
    let y = tree.get_child(root, "y").unwrap();

    assert_eq!(tree.siblings(y).unwrap(), ["x", "z"]);
}

#[test]
fn test_siblings_of_boundaries() {
    let (mut tree, root) = tree_with_children();
    let ns = tree.new_namespace(root, "ns").unwrap();

    assert_eq!(tree.siblings(ns).unwrap(), ["ns"]);
    assert_eq!(tree.siblings(root).unwrap(), ["root"]);
    let x = tree.get_child(root, "x").unwrap();
    assert_eq!(tree.siblings(x).unwrap(), ["ns", "y", "z"]);
}

#[test]
fn test_get_context_walks_dotted_paths() {
    let (mut tree, a, b) = tree_a_b();
    let c = tree.new_child(b, "c").unwrap();

    assert_eq!(tree.get_context(a, "b.c").unwrap(), c);
    assert_eq!(tree.get_context(b, "c").unwrap(), c);
}

#[test]
fn test_get_context_rejects_empty_segments() {
    let (mut tree, a, b) = tree_a_b();
    tree.new_child(b, "c").unwrap();

    for context in ["", ".", "b..c", ".b.c", "b.c."] {
        let err = tree.get_context(a, context).unwrap_err();
        assert!(err.is_not_found(), "{context:?} resolved: {err:?}");
    }
}

#[test]
fn test_get_context_fails_at_first_missing_segment() {
    let (tree, a, _) = tree_a_b();
    let err = tree.get_context(a, "b.missing.deeper").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("'missing'"));
    assert!(err.to_string().contains("'b'"));
}

#[test]
fn test_paths_follow_moves() {
    let (mut tree, a, b) = tree_a_b();
    let c = tree.new_child(b, "c").unwrap();
    let other = tree.new_child(a, "other").unwrap();

    tree.attach(other, "renamed", c).unwrap();
    assert_eq!(tree.path(c).unwrap(), "a.other.renamed");
    assert!(!tree.has_child(b, "c").unwrap());
}
