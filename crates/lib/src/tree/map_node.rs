//! Mapping operations for map nodes.
//!
//! A map node keeps its children in a keystore and mirrors the keys in its
//! children listing, so generic traversal sees the same entries. Keys obey
//! the same permission rules as attach: inserting a new key or removing one
//! needs the node unprotected, while overwriting an existing key only needs
//! that key's WRITE bit.

use super::{
    DomTree, Item, NodeId, NodeKind, TreeError, Value,
    node::{Entry, Node},
    ops::ensure_readable,
};
use crate::Result;

impl DomTree {
    /// Returns the item stored under `key`.
    ///
    /// # Errors
    /// [`TreeError::NotAMapNode`] on plain nodes, [`TreeError::NotFound`] if
    /// the key is absent, [`TreeError::Unreadable`] if its READ bit is clear.
    pub fn map_get(&self, id: NodeId, key: &str) -> Result<Item> {
        let node = self.map_node(id)?;
        let item = match node.entry(key) {
            Some(Entry::Child(child)) => Item::Node(*child),
            Some(Entry::Item(value)) => Item::Value(value.clone()),
            _ => return Err(node.not_found(key).into()),
        };
        ensure_readable(node, key)?;
        Ok(item)
    }

    /// Stores `item` under `key`, reparenting node items.
    ///
    /// A new key is attached with default flags. An existing key keeps its
    /// flags and position; a node it held is destroyed.
    ///
    /// # Errors
    /// - [`TreeError::NotAMapNode`] on plain nodes
    /// - [`TreeError::Locked`] for a new key on a protected node, or an
    ///   existing key whose WRITE bit is clear
    /// - [`TreeError::AlreadyExists`] if `key` names a property
    pub fn map_insert(&mut self, id: NodeId, key: &str, item: impl Into<Item>) -> Result<()> {
        let item = item.into();
        let node = self.map_node(id)?;
        let previous = match node.entry(key) {
            None => return self.attach(id, key, item),
            Some(Entry::Property(_)) => {
                return Err(TreeError::AlreadyExists {
                    node: node.name.clone(),
                    name: key.to_string(),
                }
                .into());
            }
            Some(Entry::Child(child)) => Some(*child),
            Some(Entry::Item(_)) => None,
        };
        if !node.flags.is_writeable(key)? {
            return Err(TreeError::Locked {
                node: node.name.clone(),
                name: key.to_string(),
            }
            .into());
        }

        let entry = match item {
            Item::Node(child) if Some(child) == previous => return Ok(()),
            Item::Node(child) => {
                self.adopt(id, child, key)?;
                Entry::Child(child)
            }
            Item::Value(value) => Entry::Item(value),
        };

        let node = self.node_mut(id)?;
        if let Some(slot) = node.entry_mut(key) {
            *slot = entry;
        }
        tracing::debug!(node = %node.name, key, "Replaced map entry");
        if let Some(child) = previous {
            self.free_subtree(child);
        }
        Ok(())
    }

    /// Removes `key`, returning the value it held. Node entries are destroyed
    /// and yield `None`.
    ///
    /// # Errors
    /// [`TreeError::NotAMapNode`] on plain nodes, [`TreeError::Locked`] if the
    /// node is protected, [`TreeError::NotFound`] if the key is absent.
    pub fn map_remove(&mut self, id: NodeId, key: &str) -> Result<Option<Value>> {
        let node = self.map_node(id)?;
        node.ensure_unprotected()?;
        if !matches!(node.entry(key), Some(Entry::Child(_) | Entry::Item(_))) {
            return Err(node.not_found(key).into());
        }

        let node = self.node_mut(id)?;
        let removed = node.unlink(key);
        tracing::debug!(node = %node.name, key, "Removed map entry");
        match removed {
            Some(Entry::Child(child)) => {
                self.free_subtree(child);
                Ok(None)
            }
            Some(Entry::Item(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Keys in insertion order.
    pub fn map_keys(&self, id: NodeId) -> Result<&[String]> {
        Ok(&self.map_node(id)?.children)
    }

    /// Key/item pairs in insertion order, skipping unreadable keys.
    pub fn map_entries(&self, id: NodeId) -> Result<Vec<(&str, Item)>> {
        let node = self.map_node(id)?;
        Ok(node
            .children
            .iter()
            .filter(|key| node.flags.is_readable(key).unwrap_or(false))
            .filter_map(|key| {
                let item = match node.entry(key)? {
                    Entry::Child(child) => Item::Node(*child),
                    Entry::Item(value) => Item::Value(value.clone()),
                    Entry::Property(_) => return None,
                };
                Some((key.as_str(), item))
            })
            .collect())
    }

    /// Number of keys.
    pub fn map_len(&self, id: NodeId) -> Result<usize> {
        Ok(self.map_node(id)?.children.len())
    }

    /// Returns true if `key` is present in the keystore.
    pub fn map_contains_key(&self, id: NodeId, key: &str) -> Result<bool> {
        let node = self.map_node(id)?;
        Ok(matches!(
            node.entry(key),
            Some(Entry::Child(_) | Entry::Item(_))
        ))
    }

    /// Inserts every pair in order, as [`map_insert`](DomTree::map_insert)
    /// does. Merges into the existing keys; pairs applied before a failure
    /// are kept.
    ///
    /// ```
    /// # use domtree::tree::{DomTree, Item};
    /// let mut tree = DomTree::new();
    /// let root = tree.root();
    /// let group = tree.new_dictgroup(root, "env")?;
    /// tree.update(group, [("HOME", "/root"), ("SHELL", "/bin/sh")])?;
    /// tree.update(group, [("HOME", "/home/user")])?;
    /// assert_eq!(tree.map_keys(group)?, ["HOME", "SHELL"]);
    /// assert_eq!(tree.map_get(group, "HOME")?, Item::from("/home/user"));
    /// # Ok::<(), domtree::Error>(())
    /// ```
    pub fn update<K, V>(&mut self, id: NodeId, pairs: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Item>,
    {
        self.map_node(id)?;
        for (key, item) in pairs {
            self.map_insert(id, key.as_ref(), item)?;
        }
        Ok(())
    }

    fn map_node(&self, id: NodeId) -> Result<&Node> {
        let node = self.node(id)?;
        if node.kind() != NodeKind::Map {
            return Err(TreeError::NotAMapNode {
                node: node.name.clone(),
            }
            .into());
        }
        Ok(node)
    }
}
