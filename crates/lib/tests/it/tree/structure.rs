//! Attach/detach, child creation and protection tests

use domtree::{DomTree, Flags, Item, Value, constants::SELF, tree::TreeError};

use crate::helpers::*;

#[test]
fn test_attach_then_detach_then_reuse_name() {
    let mut tree = DomTree::new();
    let root = tree.root();

    let first = tree.create_node("first").unwrap();
    tree.attach(root, "slot", first).unwrap();
    assert!(tree.has_child(root, "slot").unwrap());

    tree.detach(root, "slot").unwrap();
    assert!(!tree.has_child(root, "slot").unwrap());

    let second = tree.create_node("second").unwrap();
    tree.attach(root, "slot", second).unwrap();
    assert!(tree.has_child(root, "slot").unwrap());
    assert_eq!(tree.get_child(root, "slot").unwrap(), second);
}

#[test]
fn test_attach_fails_on_taken_name() {
    let (mut tree, root) = tree_with_children();
    tree.new_property(root, "title", "demo").unwrap();

    let err = tree.attach(root, "y", Value::Null).unwrap_err();
    assert!(err.is_already_exists());
    let err = tree.attach(root, "title", Value::Null).unwrap_err();
    assert!(err.is_already_exists());
    let err = tree.new_property(root, "x", 1i64).unwrap_err();
    assert!(err.is_already_exists());
}

#[test]
fn test_protection_blocks_structural_mutation() {
    let (mut tree, root) = tree_with_children();
    tree.new_property(root, "title", "demo").unwrap();
    protect(&mut tree, root);
    let before = snapshot(&tree, root);
    let loose = tree.create_node("loose").unwrap();

    assert!(tree.attach(root, "new", loose).unwrap_err().is_locked());
    assert!(tree.detach(root, "x").unwrap_err().is_locked());
    assert!(tree.new_property(root, "p", 1i64).unwrap_err().is_locked());
    assert!(tree.del_property(root, "title").unwrap_err().is_locked());
    assert!(tree.new_child(root, "c").unwrap_err().is_locked());
    assert!(tree.del_child(root, "x").unwrap_err().is_locked());
    assert!(
        tree.flags_mut(root)
            .unwrap()
            .set_flag("extra", Flags::DEFAULT)
            .unwrap_err()
            .is_locked()
    );

    assert_eq!(snapshot(&tree, root), before);
    assert_listings(&tree, root, &["x", "y", "z"], &["title"]);
    assert_eq!(tree.parent(loose).unwrap(), None);
}

#[test]
fn test_detach_missing_name() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let err = tree.detach(root, "nothing").unwrap_err();
    assert!(matches!(
        err,
        domtree::Error::Tree(TreeError::NotFound { ref name, .. }) if name == "nothing"
    ));
}

#[test]
fn test_detach_destroys_subtree() {
    let (mut tree, root) = tree_with_children();
    let x = tree.get_child(root, "x").unwrap();
    let deep = tree.new_child(x, "deep").unwrap();
    let before = tree.len();

    tree.detach(root, "x").unwrap();
    assert!(!tree.contains(x));
    assert!(!tree.contains(deep));
    assert_eq!(tree.len(), before - 2);
    assert!(tree.name(deep).unwrap_err().is_not_found());
}

#[test]
fn test_moving_node_requires_unprotected_previous_owner() {
    let (mut tree, root) = tree_with_children();
    let x = tree.get_child(root, "x").unwrap();
    let y = tree.get_child(root, "y").unwrap();
    protect(&mut tree, root);

    let err = tree.attach(y, "x", x).unwrap_err();
    assert!(err.is_locked());
    assert_eq!(tree.parent(x).unwrap(), Some(root));
    assert!(!tree.has_child(y, "x").unwrap());
}

#[test]
fn test_attached_values_are_children() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.attach(root, "count", 3i64).unwrap();

    assert_listings(&tree, root, &["count"], &[]);
    assert_eq!(tree.get_item(root, "count").unwrap(), Item::Value(Value::Int(3)));
    assert!(tree.get_property(root, "count").unwrap_err().is_not_found());
}

#[test]
fn test_invalid_names_are_rejected() {
    let mut tree = DomTree::new();
    let root = tree.root();
    for name in ["", "a.b", SELF, "parent"] {
        let err = tree.new_child(root, name).unwrap_err();
        assert!(err.is_invalid_argument(), "name {name:?}");
    }
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_new_child_bulk_keeps_partial_result() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_child(root, "b").unwrap();

    let err = tree.new_child_bulk(root, ["a", "b", "c"]).unwrap_err();
    assert!(err.is_already_exists());
    assert_listings(&tree, root, &["b", "a"], &[]);
}

#[test]
fn test_del_child_rejects_values() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.attach(root, "v", "text").unwrap();
    tree.new_property(root, "p", 1i64).unwrap();

    assert!(matches!(
        tree.del_child(root, "v").unwrap_err(),
        domtree::Error::Tree(TreeError::NotANode { .. })
    ));
    assert!(tree.del_child(root, "p").unwrap_err().is_invalid_argument());
    assert!(tree.del_child(root, "none").unwrap_err().is_not_found());
}

#[test]
fn test_replace_child_swaps_node() {
    let (mut tree, root) = tree_with_children();
    let old = tree.get_child(root, "y").unwrap();
    let new = tree.create_node("fresh").unwrap();

    tree.replace_child(root, "y", new).unwrap();
    assert!(!tree.contains(old));
    assert_eq!(tree.get_child(root, "y").unwrap(), new);
    assert_eq!(tree.name(new).unwrap(), "y");
    // the replacement is appended to the listing
    assert_listings(&tree, root, &["x", "z", "y"], &[]);
}

#[test]
fn test_replace_child_is_not_rolled_back() {
    let (mut tree, root) = tree_with_children();
    let x = tree.get_child(root, "x").unwrap();
    let grandchild = tree.new_child(x, "inner").unwrap();

    // attaching an ancestor under its own descendant fails after the detach
    let err = tree.replace_child(x, "inner", root).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(!tree.has_child(x, "inner").unwrap());
    assert!(!tree.contains(grandchild));
    assert_listings(&tree, x, &[], &[]);
    assert_listings(&tree, root, &["x", "y", "z"], &[]);
}

#[test]
fn test_release_only_loose_nodes() {
    let (mut tree, root) = tree_with_children();
    let x = tree.get_child(root, "x").unwrap();
    assert!(tree.release(x).unwrap_err().is_invalid_argument());

    let loose = tree.create_map_node("loose").unwrap();
    assert!(tree.is_map_node(loose).unwrap());
    tree.release(loose).unwrap();
    assert!(!tree.contains(loose));
}

#[test]
fn test_handles_from_another_tree_are_rejected() {
    let (mut other, other_root, other_child) = tree_a_b();
    let (mut tree, root, b) = tree_a_b();
    let c = tree.new_child(root, "c").unwrap();
    assert_eq!(tree.children(root).unwrap(), ["b", "c"]);

    let err = tree.attach(c, "moved", other_child).unwrap_err();
    assert!(matches!(
        err,
        domtree::Error::Tree(TreeError::StaleHandle { .. })
    ));
    assert_eq!(tree.children(root).unwrap(), ["b", "c"]);
    assert_eq!(tree.name(b).unwrap(), "b");
    assert_eq!(tree.parent(b).unwrap(), Some(root));
    assert!(tree.children(c).unwrap().is_empty());

    assert!(!tree.contains(other_root));
    assert!(tree.get_property(other_root, "anything").is_err());
    assert_eq!(other.path(other_child).unwrap(), "a.b");
    other.new_child(other_child, "still_usable").unwrap();
}
