use domtree::{
    DomTree, NodeId, Schema,
    constants::SELF,
    schema::{Cast, PropSpec},
};

// ==========================
// TREE FACTORIES
// ==========================

/// Creates a tree with a root and three children `x`, `y`, `z`.
pub fn tree_with_children() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_child_bulk(root, ["x", "y", "z"])
        .expect("Failed to create children");
    (tree, root)
}

/// Creates a tree with a root named `a` and a child `b`.
pub fn tree_a_b() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::with_root("a").expect("Failed to create tree");
    let a = tree.root();
    let b = tree.new_child(a, "b").expect("Failed to create child");
    (tree, a, b)
}

/// The settings schema: `settings.app.lang = "en_US"`.
pub fn settings_schema() -> Schema {
    Schema::new().child(
        "settings",
        Schema::new().child(
            "app",
            Schema::new().prop("lang", PropSpec::new(Cast::Text).with_default("en_US")),
        ),
    )
}

/// The settings schema in its JSON form.
pub fn settings_schema_json() -> serde_json::Value {
    serde_json::json!({
        "children": {
            "settings": {
                "children": {
                    "app": {
                        "props": {
                            "lang": {"cast": "text", "default": "en_US"}
                        }
                    }
                }
            }
        }
    })
}

// ==========================
// ASSERTION HELPERS
// ==========================

/// Protects a node by clearing its `"self"` WRITE bit.
pub fn protect(tree: &mut DomTree, id: NodeId) {
    tree.flags_mut(id)
        .expect("Failed to get flags")
        .lock(SELF)
        .expect("Failed to lock node");
}

/// Snapshot of a subtree used to assert that a failed operation changed nothing.
pub fn snapshot(tree: &DomTree, id: NodeId) -> serde_json::Map<String, serde_json::Value> {
    tree.to_mapping(id, None, false)
        .expect("Failed to export mapping")
}

/// Asserts the listings of a node.
pub fn assert_listings(tree: &DomTree, id: NodeId, children: &[&str], properties: &[&str]) {
    assert_eq!(
        tree.children(id).expect("Failed to list children"),
        children,
        "children of {}",
        tree.name(id).unwrap_or("<stale>")
    );
    assert_eq!(
        tree.properties(id).expect("Failed to list properties"),
        properties,
        "properties of {}",
        tree.name(id).unwrap_or("<stale>")
    );
}
