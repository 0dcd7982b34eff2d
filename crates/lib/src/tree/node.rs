//! Per-node storage.
//!
//! Both node kinds share identity, flags and the ordered name listings. They
//! differ only in where child entries live: a plain node keeps everything in
//! `storage`, a map node keeps its children in a separate keystore and uses
//! the children listing as the keystore's ordered key mirror.

use std::collections::HashMap;

use super::{NodeId, TreeError, Value};
use crate::{
    constants::SELF,
    flags::{FlagBit, FlagSet},
};

/// Which storage strategy a node uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Attribute-tree node: children and properties share one storage
    Node,
    /// Map-backed node: children live in a keystore with mapping operations
    Map,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Node => "node",
            NodeKind::Map => "map",
        }
    }
}

/// What a name resolves to inside a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    /// Leaf value listed under properties
    Property(Value),
    /// Owned child node listed under children
    Child(NodeId),
    /// Plain value listed under children (attached value or keystore value)
    Item(Value),
}

#[derive(Debug)]
enum Store {
    Attributes,
    Keyed(HashMap<String, Entry>),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) flags: FlagSet,
    pub(crate) children: Vec<String>,
    pub(crate) properties: Vec<String>,
    storage: HashMap<String, Entry>,
    store: Store,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            parent: None,
            flags: FlagSet::for_node(),
            children: Vec::new(),
            properties: Vec::new(),
            storage: HashMap::new(),
            store: match kind {
                NodeKind::Node => Store::Attributes,
                NodeKind::Map => Store::Keyed(HashMap::new()),
            },
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        match self.store {
            Store::Attributes => NodeKind::Node,
            Store::Keyed(_) => NodeKind::Map,
        }
    }

    pub(crate) fn is_namespace(&self) -> bool {
        self.flags
            .get_flag(SELF)
            .map(|flags| flags.test(FlagBit::Namespace))
            .unwrap_or(false)
    }

    pub(crate) fn ensure_unprotected(&self) -> Result<(), TreeError> {
        if self.flags.is_protected() {
            return Err(TreeError::Locked {
                node: self.name.clone(),
                name: SELF.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&Entry> {
        self.storage.get(name).or_else(|| match &self.store {
            Store::Keyed(keystore) => keystore.get(name),
            Store::Attributes => None,
        })
    }

    pub(crate) fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        if self.storage.contains_key(name) {
            return self.storage.get_mut(name);
        }
        match &mut self.store {
            Store::Keyed(keystore) => keystore.get_mut(name),
            Store::Attributes => None,
        }
    }

    pub(crate) fn link_property(&mut self, name: String, value: Value) {
        self.properties.push(name.clone());
        self.storage.insert(name, Entry::Property(value));
    }

    /// Lists `name` under children; map nodes route the entry to the keystore.
    pub(crate) fn link_child(&mut self, name: String, entry: Entry) {
        self.children.push(name.clone());
        match &mut self.store {
            Store::Keyed(keystore) => keystore.insert(name, entry),
            Store::Attributes => self.storage.insert(name, entry),
        };
    }

    /// Removes an entry from storage, its listing and the flag table.
    pub(crate) fn unlink(&mut self, name: &str) -> Option<Entry> {
        let entry = match self.storage.remove(name) {
            Some(entry) => entry,
            None => match &mut self.store {
                Store::Keyed(keystore) => keystore.remove(name)?,
                Store::Attributes => return None,
            },
        };
        match entry {
            Entry::Property(_) => self.properties.retain(|n| n != name),
            Entry::Child(_) | Entry::Item(_) => self.children.retain(|n| n != name),
        }
        self.flags.forget(name);
        Some(entry)
    }

    /// Handles of all child nodes this node owns.
    pub(crate) fn child_ids(&self) -> Vec<NodeId> {
        self.children
            .iter()
            .filter_map(|name| match self.entry(name) {
                Some(Entry::Child(id)) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn not_found(&self, name: &str) -> TreeError {
        TreeError::NotFound {
            node: self.name.clone(),
            name: name.to_string(),
        }
    }
}
