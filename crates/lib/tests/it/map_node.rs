//! Map node integration tests
//!
//! Map nodes share attach/detach and the permission rules with plain nodes;
//! these tests cover the keystore operations and the children mirror.

use domtree::{DomTree, Flags, Item, Value, constants::PARENT};

use crate::helpers::*;

fn tree_with_map() -> (DomTree, domtree::NodeId) {
    let mut tree = DomTree::new();
    let root = tree.root();
    let map = tree.new_dictgroup(root, "map").expect("Failed to create dictgroup");
    (tree, map)
}

#[test]
fn test_attach_node_into_map_reparents_it() {
    let (mut tree, map) = tree_with_map();
    let node = tree.create_node("loose").unwrap();

    tree.attach(map, "entry", node).unwrap();
    assert_eq!(tree.parent(node).unwrap(), Some(map));
    assert!(!tree.flags(node).unwrap().is_writeable(PARENT).unwrap());
    assert!(tree.map_contains_key(map, "entry").unwrap());
    assert!(tree.has_child(map, "entry").unwrap());
    assert_eq!(tree.map_get(map, "entry").unwrap(), Item::Node(node));

    tree.detach(map, "entry").unwrap();
    assert!(!tree.map_contains_key(map, "entry").unwrap());
    assert!(!tree.has_child(map, "entry").unwrap());
    assert_eq!(tree.map_len(map).unwrap(), 0);
}

#[test]
fn test_children_mirror_keystore_keys() {
    let (mut tree, map) = tree_with_map();
    tree.map_insert(map, "b", 1i64).unwrap();
    tree.map_insert(map, "a", 2i64).unwrap();
    tree.new_property(map, "label", "devices").unwrap();

    assert_eq!(tree.map_keys(map).unwrap(), ["b", "a"]);
    assert_listings(&tree, map, &["b", "a"], &["label"]);
    assert_eq!(tree.map_len(map).unwrap(), 2);
    assert!(!tree.map_contains_key(map, "label").unwrap());
}

#[test]
fn test_update_merges_pairs_and_nodes() {
    let (mut tree, map) = tree_with_map();
    let node = tree.create_node("n").unwrap();
    tree.update(map, [("x", Item::from(1i64)), ("y", Item::from("two"))])
        .unwrap();
    tree.update(map, [("y", Item::from(2i64)), ("z", Item::Node(node))])
        .unwrap();

    let entries = tree.map_entries(map).unwrap();
    assert_eq!(
        entries,
        [
            ("x", Item::Value(Value::Int(1))),
            ("y", Item::Value(Value::Int(2))),
            ("z", Item::Node(node)),
        ]
    );
    assert_eq!(tree.name(node).unwrap(), "z");
}

#[test]
fn test_update_single_pair() {
    let (mut tree, map) = tree_with_map();
    tree.update(map, std::iter::once(("only", "value"))).unwrap();
    assert_eq!(tree.map_get(map, "only").unwrap(), Item::from("value"));
}

#[test]
fn test_update_stops_at_first_failure() {
    let (mut tree, map) = tree_with_map();
    tree.map_insert(map, "fixed", 1i64).unwrap();
    tree.flags_mut(map).unwrap().lock("fixed").unwrap();

    let err = tree
        .update(map, [("a", 1i64), ("fixed", 2i64), ("b", 3i64)])
        .unwrap_err();
    assert!(err.is_locked());
    assert_eq!(tree.map_keys(map).unwrap(), ["fixed", "a"]);
    assert_eq!(tree.map_get(map, "fixed").unwrap(), Item::from(1i64));
}

#[test]
fn test_map_node_protection_matches_plain_nodes() {
    let (mut tree, map) = tree_with_map();
    tree.map_insert(map, "k", 1i64).unwrap();
    protect(&mut tree, map);
    let loose = tree.create_node("loose").unwrap();

    assert!(tree.attach(map, "n", loose).unwrap_err().is_locked());
    assert!(tree.detach(map, "k").unwrap_err().is_locked());
    assert!(tree.map_remove(map, "k").unwrap_err().is_locked());
    assert!(tree.map_insert(map, "other", 1i64).unwrap_err().is_locked());
    assert_eq!(tree.map_keys(map).unwrap(), ["k"]);
}

#[test]
fn test_map_key_collisions() {
    let (mut tree, map) = tree_with_map();
    tree.map_insert(map, "k", 1i64).unwrap();
    tree.new_property(map, "p", 1i64).unwrap();

    assert!(tree.attach(map, "k", 2i64).unwrap_err().is_already_exists());
    assert!(tree.map_insert(map, "p", 2i64).unwrap_err().is_already_exists());
    assert!(tree.map_get(map, "p").unwrap_err().is_not_found());
}

#[test]
fn test_unreadable_keys() {
    let (mut tree, map) = tree_with_map();
    tree.attach_with_flags(map, "hidden", 1i64, Flags::WRITE).unwrap();
    tree.map_insert(map, "shown", 2i64).unwrap();

    assert!(tree.map_get(map, "hidden").unwrap_err().is_unreadable());
    let keys: Vec<&str> = tree
        .map_entries(map)
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(keys, ["shown"]);
}

#[test]
fn test_moving_node_between_keys() {
    let (mut tree, map) = tree_with_map();
    let node = tree.create_node("n").unwrap();
    tree.map_insert(map, "first", node).unwrap();
    tree.map_insert(map, "second", node).unwrap();

    assert_eq!(tree.map_keys(map).unwrap(), ["second"]);
    assert_eq!(tree.name(node).unwrap(), "second");
    assert!(tree.contains(node));
}

#[test]
fn test_map_nodes_have_paths_and_children() {
    let (mut tree, map) = tree_with_map();
    let child = tree.new_child(map, "inner").unwrap();
    assert_eq!(tree.path(child).unwrap(), "root.map.inner");
    assert_eq!(tree.get_context(tree.root(), "map.inner").unwrap(), child);
    assert_eq!(tree.map_get(map, "inner").unwrap(), Item::Node(child));
}
