//! Permission-gated trees of named children and properties.
//!
//! All nodes of a tree live in one [`DomTree`] arena and are addressed by
//! [`NodeId`] handles. A node owns the children attached to it; its parent
//! link is a plain handle that is never used to infer ownership.
//!
//! # Core Operations
//!
//! - **Structure**: [`attach`](DomTree::attach), [`detach`](DomTree::detach),
//!   [`new_child`](DomTree::new_child), [`new_namespace`](DomTree::new_namespace),
//!   [`new_dictgroup`](DomTree::new_dictgroup), [`replace_child`](DomTree::replace_child)
//! - **Properties**: [`new_property`](DomTree::new_property),
//!   [`get_property`](DomTree::get_property), [`set_property`](DomTree::set_property),
//!   [`del_property`](DomTree::del_property)
//! - **Navigation**: [`get_context`](DomTree::get_context), [`path`](DomTree::path),
//!   [`siblings`](DomTree::siblings)
//! - **Mapping** (map nodes only): [`map_get`](DomTree::map_get),
//!   [`map_insert`](DomTree::map_insert), [`map_remove`](DomTree::map_remove),
//!   [`update`](DomTree::update)
//! - **Export**: [`to_mapping`](DomTree::to_mapping), [`to_json`](DomTree::to_json),
//!   [`load_mapping`](DomTree::load_mapping)
//!
//! Every structural mutation consults the owning node's [`FlagSet`]: while
//! its `"self"` entry is locked the node is *protected* and attach, detach,
//! and property creation or deletion all fail with [`TreeError::Locked`].
//!
//! # Example
//!
//! ```
//! use domtree::tree::DomTree;
//!
//! let mut tree = DomTree::new();
//! let root = tree.root();
//! let settings = tree.new_child(root, "settings")?;
//! let app = tree.new_child(settings, "app")?;
//! tree.new_property(app, "lang", "en_US")?;
//!
//! assert_eq!(tree.path(app)?, "root.settings.app");
//! let found = tree.get_context(root, "settings.app")?;
//! assert_eq!(tree.get_property(found, "lang")?, &"en_US");
//! # Ok::<(), domtree::Error>(())
//! ```

use std::{
    fmt,
    ops::Deref,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    Result,
    constants::{PARENT, ROOT},
    flags::{FlagError, FlagSet, Flags},
};

pub mod errors;
mod export;
mod map_node;
mod node;
mod ops;
pub mod path;
pub mod value;

pub use errors::TreeError;
pub use node::NodeKind;
pub use value::{Item, Method, PropertyInit, Value};

use node::Node;

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(1);

/// Handle to a node in a [`DomTree`].
///
/// Handles are generational: once a node is destroyed its handle stays
/// invalid even after the slot is reused. A handle is only valid in the tree
/// that issued it; any other tree rejects it as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u32,
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct ArenaSlot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning every node of one tree.
///
/// A tree always has a root, which can never be attached elsewhere or
/// released. Nodes created with [`create_node`](DomTree::create_node) start
/// out parentless and join the tree when attached.
#[derive(Debug)]
pub struct DomTree {
    id: u32,
    slots: Vec<ArenaSlot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Creates a tree whose root is named `"root"`.
    pub fn new() -> Self {
        Self::bootstrap(ROOT.to_string())
    }

    /// Creates a tree with an explicitly named root.
    ///
    /// # Errors
    /// [`TreeError::InvalidName`] if the name could not be used as an entry
    /// name.
    pub fn with_root(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        path::validate_name(&name)?;
        Ok(Self::bootstrap(name))
    }

    fn bootstrap(name: String) -> Self {
        let id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        let root = NodeId {
            tree: id,
            index: 0,
            generation: 0,
        };
        Self {
            id,
            slots: vec![ArenaSlot {
                generation: 0,
                node: Some(Node::new(name, NodeKind::Node)),
            }],
            free: Vec::new(),
            root,
        }
    }

    /// Handle of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Always false: the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Allocates a parentless node that can later be attached.
    ///
    /// # Errors
    /// [`TreeError::InvalidName`] for unusable names.
    pub fn create_node(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.create(name.into(), NodeKind::Node)
    }

    /// Allocates a parentless map node that can later be attached.
    ///
    /// # Errors
    /// [`TreeError::InvalidName`] for unusable names.
    pub fn create_map_node(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.create(name.into(), NodeKind::Map)
    }

    fn create(&mut self, name: String, kind: NodeKind) -> Result<NodeId> {
        path::validate_name(&name)?;
        self.alloc(Node::new(name, kind))
    }

    /// Destroys a parentless node and everything it owns.
    ///
    /// # Errors
    /// [`TreeError::InvalidArgument`] for the root or an attached node.
    pub fn release(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(TreeError::InvalidArgument {
                reason: "the root node cannot be released".to_string(),
            }
            .into());
        }
        if self.node(id)?.parent.is_some() {
            return Err(TreeError::InvalidArgument {
                reason: format!("node {id} is attached; detach it from its owner instead"),
            }
            .into());
        }
        self.free_subtree(id);
        Ok(())
    }

    /// The node's own name.
    pub fn name(&self, id: NodeId) -> Result<&str> {
        Ok(&self.node(id)?.name)
    }

    /// The node's owner, if attached.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Which storage strategy the node uses.
    pub fn kind(&self, id: NodeId) -> Result<NodeKind> {
        Ok(self.node(id)?.kind())
    }

    /// Returns true for map nodes.
    pub fn is_map_node(&self, id: NodeId) -> Result<bool> {
        Ok(self.kind(id)? == NodeKind::Map)
    }

    /// Names listed as children, in attach order.
    pub fn children(&self, id: NodeId) -> Result<&[String]> {
        Ok(&self.node(id)?.children)
    }

    /// Names listed as properties, in creation order.
    pub fn properties(&self, id: NodeId) -> Result<&[String]> {
        Ok(&self.node(id)?.properties)
    }

    /// The node's flag table.
    pub fn flags(&self, id: NodeId) -> Result<&FlagSet> {
        Ok(&self.node(id)?.flags)
    }

    /// Mutable access to the node's flag table, for lock/unlock and
    /// per-entry permission changes.
    pub fn flags_mut(&mut self, id: NodeId) -> Result<FlagsMut<'_>> {
        Ok(FlagsMut {
            node: self.node_mut(id)?,
        })
    }

    /// True when the node's `"self"` WRITE bit is clear.
    pub fn is_protected(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.flags.is_protected())
    }

    /// True when the node's `"self"` NAMESPACE bit is set.
    pub fn is_namespace(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.is_namespace())
    }

    pub(crate) fn node(&self, id: NodeId) -> std::result::Result<&Node, TreeError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| id.tree == self.id && slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(TreeError::StaleHandle { id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> std::result::Result<&mut Node, TreeError> {
        let tree = self.id;
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| id.tree == tree && slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TreeError::StaleHandle { id })
    }

    fn alloc(&mut self, node: Node) -> Result<NodeId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return Ok(NodeId {
                tree: self.id,
                index,
                generation: slot.generation,
            });
        }
        let index = slot_index(self.slots.len())?;
        self.slots.push(ArenaSlot {
            generation: 0,
            node: Some(node),
        });
        Ok(NodeId {
            tree: self.id,
            index,
            generation: 0,
        })
    }

    /// Destroys a node and all nodes it owns, invalidating their handles.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                pending.extend(node.child_ids());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
    }

    /// Checks that `child` may be moved under `owner` without mutating
    /// anything.
    pub(crate) fn check_adoptable(&self, owner: NodeId, child: NodeId) -> Result<()> {
        if child == self.root {
            return Err(TreeError::InvalidArgument {
                reason: "the root node cannot be attached".to_string(),
            }
            .into());
        }
        let node = self.node(child)?;

        let mut cursor = Some(owner);
        while let Some(current) = cursor {
            if current == child {
                return Err(TreeError::InvalidArgument {
                    reason: format!(
                        "attaching '{}' under '{}' would create a cycle",
                        node.name,
                        self.node(owner)?.name
                    ),
                }
                .into());
            }
            cursor = self.node(current)?.parent;
        }

        if let Some(previous) = node.parent {
            self.node(previous)?.ensure_unprotected()?;
        }
        Ok(())
    }

    /// Moves `child` under `owner` as `name`.
    ///
    /// Unlinks the child from any previous owner, then runs the reparent
    /// transaction on the child's `"parent"` flag: unlock, point the parent
    /// link at the new owner, lock again. The caller links the child into
    /// the owner's storage afterwards.
    pub(crate) fn adopt(&mut self, owner: NodeId, child: NodeId, name: &str) -> Result<()> {
        self.check_adoptable(owner, child)?;

        if let Some(previous) = self.node(child)?.parent {
            let old_name = self.node(child)?.name.clone();
            self.node_mut(previous)?.unlink(&old_name);
            tracing::debug!(node = %old_name, "Unlinked node from previous owner");
        }

        let node = self.node_mut(child)?;
        node.flags.unlock(PARENT)?;
        node.parent = Some(owner);
        node.name = name.to_string();
        node.flags.lock(PARENT)?;
        tracing::debug!(node = name, "Reparented node");
        Ok(())
    }
}

fn slot_index(len: usize) -> std::result::Result<u32, TreeError> {
    u32::try_from(len).map_err(|_| TreeError::InvalidArgument {
        reason: format!("tree is full: {len} node slots in use"),
    })
}

/// Mutable view of one node's flag table, returned by
/// [`DomTree::flags_mut`].
///
/// Reads go straight to the [`FlagSet`]. The entry of a listed child or
/// property can be changed but not removed, so every listed name keeps its
/// flag.
#[derive(Debug)]
pub struct FlagsMut<'a> {
    node: &'a mut Node,
}

impl Deref for FlagsMut<'_> {
    type Target = FlagSet;

    fn deref(&self) -> &FlagSet {
        &self.node.flags
    }
}

impl FlagsMut<'_> {
    /// See [`FlagSet::lock`].
    pub fn lock(&mut self, name: &str) -> std::result::Result<(), FlagError> {
        self.node.flags.lock(name)
    }

    /// See [`FlagSet::unlock`].
    pub fn unlock(&mut self, name: &str) -> std::result::Result<(), FlagError> {
        self.node.flags.unlock(name)
    }

    /// See [`FlagSet::set_flag`].
    pub fn set_flag(
        &mut self,
        name: impl Into<String>,
        flags: Flags,
    ) -> std::result::Result<(), FlagError> {
        self.node.flags.set_flag(name, flags)
    }

    /// See [`FlagSet::set_flag_raw`].
    pub fn set_flag_raw(
        &mut self,
        name: impl Into<String>,
        raw: i32,
    ) -> std::result::Result<(), FlagError> {
        self.node.flags.set_flag_raw(name, raw)
    }

    /// See [`FlagSet::update_flag`].
    pub fn update_flag(&mut self, name: &str, flags: Flags) -> std::result::Result<(), FlagError> {
        self.node.flags.update_flag(name, flags)
    }

    /// Removes an entry that no child or property owns.
    ///
    /// # Errors
    /// [`FlagError::InvalidArgument`] if `name` is a listed child or
    /// property, otherwise as [`FlagSet::del_flag`].
    pub fn del_flag(&mut self, name: &str) -> std::result::Result<(), FlagError> {
        if self.node.contains(name) {
            return Err(FlagError::InvalidArgument {
                reason: format!(
                    "flag '{name}' belongs to an entry of node '{}'",
                    self.node.name
                ),
            });
        }
        self.node.flags.del_flag(name)
    }
}
