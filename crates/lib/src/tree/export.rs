//! Export of a subtree as an ordered JSON mapping, and reconstruction from one.
//!
//! The mapping holds the node's properties first, then its children, each in
//! listing order. Child nodes become nested objects; properties and attached
//! values become their JSON form, with methods invoked.

use serde_json::{Map, Value as Json};

use super::{
    DomTree, NodeId, Value,
    node::{Entry, Node},
    ops::ensure_readable,
};
use crate::Result;

impl DomTree {
    /// Exports the subtree rooted at `id`.
    ///
    /// With `props`, only the named properties are exported, in the order
    /// given; a name that is not a property fails. Without it, every readable
    /// property is exported. `props_only` leaves out children. Entries whose
    /// READ bit is clear are skipped unless explicitly requested, which fails.
    ///
    /// # Errors
    /// [`TreeError::NotFound`](super::TreeError::NotFound) for a requested name that is not a property,
    /// [`TreeError::Unreadable`](super::TreeError::Unreadable) for a requested property that cannot be read.
    pub fn to_mapping(
        &self,
        id: NodeId,
        props: Option<&[&str]>,
        props_only: bool,
    ) -> Result<Map<String, Json>> {
        let node = self.node(id)?;
        let mut mapping = Map::new();

        match props {
            Some(requested) => {
                for name in requested {
                    let Some(Entry::Property(value)) = node.entry(name) else {
                        return Err(node.not_found(name).into());
                    };
                    ensure_readable(node, name)?;
                    mapping.insert(name.to_string(), value.to_json());
                }
            }
            None => {
                for name in readable(node, &node.properties) {
                    if let Some(Entry::Property(value)) = node.entry(name) {
                        mapping.insert(name.clone(), value.to_json());
                    }
                }
            }
        }

        if !props_only {
            for name in readable(node, &node.children) {
                let json = match node.entry(name) {
                    Some(Entry::Child(child)) => Json::Object(self.to_mapping(*child, None, false)?),
                    Some(Entry::Item(value)) => value.to_json(),
                    _ => continue,
                };
                mapping.insert(name.clone(), json);
            }
        }
        Ok(mapping)
    }

    /// Compact JSON text of [`to_mapping`](DomTree::to_mapping).
    pub fn to_json(&self, id: NodeId, props: Option<&[&str]>, props_only: bool) -> Result<String> {
        let mapping = self.to_mapping(id, props, props_only)?;
        Ok(serde_json::to_string(&mapping)?)
    }

    /// Indented JSON text of [`to_mapping`](DomTree::to_mapping).
    pub fn to_json_pretty(
        &self,
        id: NodeId,
        props: Option<&[&str]>,
        props_only: bool,
    ) -> Result<String> {
        let mapping = self.to_mapping(id, props, props_only)?;
        Ok(serde_json::to_string_pretty(&mapping)?)
    }

    /// Recreates entries from an exported mapping: objects become child
    /// nodes, everything else a property.
    ///
    /// Stops at the first failure, keeping what was created.
    ///
    /// # Errors
    /// Any error of [`new_child`](DomTree::new_child) or
    /// [`new_property`](DomTree::new_property), typically
    /// [`TreeError::AlreadyExists`](super::TreeError::AlreadyExists).
    pub fn load_mapping(&mut self, id: NodeId, mapping: &Map<String, Json>) -> Result<()> {
        for (name, value) in mapping {
            match value {
                Json::Object(nested) => {
                    let child = self.new_child(id, name)?;
                    self.load_mapping(child, nested)?;
                }
                other => self.new_property(id, name, Value::from(other.clone()))?,
            }
        }
        Ok(())
    }

    /// Builds a tree whose root, named `root_name`, holds `mapping`.
    ///
    /// ```
    /// # use domtree::tree::DomTree;
    /// let mapping = serde_json::json!({"title": "demo", "settings": {"lang": "en_US"}});
    /// let mapping = mapping.as_object().unwrap();
    ///
    /// let tree = DomTree::from_mapping("root", mapping)?;
    /// assert_eq!(&tree.to_mapping(tree.root(), None, false)?, mapping);
    /// # Ok::<(), domtree::Error>(())
    /// ```
    pub fn from_mapping(root_name: &str, mapping: &Map<String, Json>) -> Result<Self> {
        let mut tree = DomTree::with_root(root_name)?;
        let root = tree.root();
        tree.load_mapping(root, mapping)?;
        Ok(tree)
    }
}

fn readable<'a>(node: &'a Node, names: &'a [String]) -> impl Iterator<Item = &'a String> {
    names
        .iter()
        .filter(|name| node.flags.is_readable(name).unwrap_or(false))
}
