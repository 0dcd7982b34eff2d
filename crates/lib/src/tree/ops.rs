//! Structural operations on nodes: attach/detach, properties, navigation.

use super::{
    DomTree, Item, Method, NodeId, NodeKind, PropertyInit, TreeError, Value,
    node::{Entry, Node},
    path,
};
use crate::{
    Result,
    constants::SELF,
    flags::{FlagBit, Flags},
};

impl DomTree {
    /// Attaches a node or value under `name` with default flags.
    ///
    /// See [`attach_with_flags`](DomTree::attach_with_flags).
    pub fn attach(&mut self, id: NodeId, name: &str, item: impl Into<Item>) -> Result<()> {
        self.attach_with_flags(id, name, item, Flags::DEFAULT)
    }

    /// Attaches a node or value under `name`, recording `flags` for it.
    ///
    /// A node item is reparented: it leaves its previous owner (which must be
    /// unprotected), takes `name` as its own name, and its `"parent"` flag is
    /// locked again once the parent link points here. Values are listed as
    /// children alongside nodes.
    ///
    /// # Errors
    /// - [`TreeError::Locked`] if the node is protected
    /// - [`TreeError::AlreadyExists`] if `name` is taken
    /// - [`TreeError::InvalidName`] for unusable names
    /// - [`TreeError::InvalidArgument`] when attaching the root, or a node
    ///   under its own descendant
    pub fn attach_with_flags(
        &mut self,
        id: NodeId,
        name: &str,
        item: impl Into<Item>,
        flags: Flags,
    ) -> Result<()> {
        self.check_vacant(id, name)?;
        let entry = match item.into() {
            Item::Node(child) => {
                self.adopt(id, child, name)?;
                Entry::Child(child)
            }
            Item::Value(value) => Entry::Item(value),
        };

        let node = self.node_mut(id)?;
        node.link_child(name.to_string(), entry);
        node.flags.set_flag(name, flags)?;
        tracing::debug!(node = %node.name, child = name, "Attached entry");
        Ok(())
    }

    /// Removes a child or property. A removed child node is destroyed along
    /// with everything it owns.
    ///
    /// # Errors
    /// [`TreeError::Locked`] if the node is protected, [`TreeError::NotFound`]
    /// if `name` is absent.
    pub fn detach(&mut self, id: NodeId, name: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        node.ensure_unprotected()?;
        let entry = node.unlink(name).ok_or_else(|| node.not_found(name))?;
        tracing::debug!(node = %node.name, entry = name, "Detached entry");

        if let Entry::Child(child) = entry {
            self.free_subtree(child);
        }
        Ok(())
    }

    /// Creates a property with default flags.
    pub fn new_property(&mut self, id: NodeId, name: &str, value: impl Into<Value>) -> Result<()> {
        self.new_property_with_flags(id, name, value, Flags::DEFAULT)
    }

    /// Creates a property, recording `flags` for it.
    ///
    /// # Errors
    /// [`TreeError::Locked`] if the node is protected,
    /// [`TreeError::AlreadyExists`] if `name` is taken,
    /// [`TreeError::InvalidName`] for unusable names.
    pub fn new_property_with_flags(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<Value>,
        flags: Flags,
    ) -> Result<()> {
        self.check_vacant(id, name)?;
        let node = self.node_mut(id)?;
        node.link_property(name.to_string(), value.into());
        node.flags.set_flag(name, flags)?;
        tracing::debug!(node = %node.name, property = name, "Created property");
        Ok(())
    }

    /// Creates several properties with default flags, stopping at the first
    /// failure. Properties created before the failure are kept.
    ///
    /// ```
    /// # use domtree::tree::DomTree;
    /// let mut tree = DomTree::new();
    /// let root = tree.root();
    /// tree.new_property_bulk(root, ["title", "subtitle"])?;
    /// tree.new_property_bulk(root, [("count", 3)])?;
    /// assert_eq!(tree.properties(root)?, ["title", "subtitle", "count"]);
    /// # Ok::<(), domtree::Error>(())
    /// ```
    pub fn new_property_bulk<I>(&mut self, id: NodeId, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<PropertyInit>,
    {
        for item in items {
            let PropertyInit { name, value } = item.into();
            self.new_property(id, &name, value)?;
        }
        Ok(())
    }

    /// Removes a property.
    ///
    /// # Errors
    /// [`TreeError::Locked`] if the node is protected, [`TreeError::NotFound`]
    /// if no property `name` exists.
    pub fn del_property(&mut self, id: NodeId, name: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        node.ensure_unprotected()?;
        if !matches!(node.entry(name), Some(Entry::Property(_))) {
            return Err(node.not_found(name).into());
        }
        node.unlink(name);
        tracing::debug!(node = %node.name, property = name, "Deleted property");
        Ok(())
    }

    /// Replaces the value of an existing property.
    ///
    /// Missing properties are never created here. Node protection does not
    /// apply; only the property's own WRITE bit is checked.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if no property `name` exists,
    /// [`TreeError::Locked`] if its WRITE bit is clear.
    pub fn set_property(&mut self, id: NodeId, name: &str, value: impl Into<Value>) -> Result<()> {
        let node = self.node_mut(id)?;
        if !matches!(node.entry(name), Some(Entry::Property(_))) {
            return Err(node.not_found(name).into());
        }
        if !node.flags.is_writeable(name)? {
            return Err(TreeError::Locked {
                node: node.name.clone(),
                name: name.to_string(),
            }
            .into());
        }
        if let Some(Entry::Property(slot)) = node.entry_mut(name) {
            *slot = value.into();
        }
        Ok(())
    }

    /// Returns a property's value. Methods are returned uninvoked.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if no property `name` exists,
    /// [`TreeError::Unreadable`] if its READ bit is clear.
    pub fn get_property(&self, id: NodeId, name: &str) -> Result<&Value> {
        let node = self.node(id)?;
        let Some(Entry::Property(value)) = node.entry(name) else {
            return Err(node.not_found(name).into());
        };
        ensure_readable(node, name)?;
        Ok(value)
    }

    /// Creates a property holding a zero-argument callable.
    pub fn new_method(
        &mut self,
        id: NodeId,
        name: &str,
        f: impl Fn() -> Value + 'static,
        flags: Flags,
    ) -> Result<()> {
        self.new_property_with_flags(id, name, Method::new(f), flags)
    }

    /// Replaces an existing property with a zero-argument callable.
    pub fn set_method(&mut self, id: NodeId, name: &str, f: impl Fn() -> Value + 'static) -> Result<()> {
        self.set_property(id, name, Method::new(f))
    }

    /// Returns true if `name` is listed among the node's children.
    pub fn has_child(&self, id: NodeId, name: &str) -> Result<bool> {
        Ok(self.node(id)?.children.iter().any(|child| child == name))
    }

    /// Returns true if `name` is listed among the node's properties.
    pub fn has_property(&self, id: NodeId, name: &str) -> Result<bool> {
        Ok(self.node(id)?.properties.iter().any(|prop| prop == name))
    }

    /// Returns the child node attached as `name`.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if `name` is absent, [`TreeError::NotANode`]
    /// if it holds a value.
    pub fn get_child(&self, id: NodeId, name: &str) -> Result<NodeId> {
        let node = self.node(id)?;
        match node.entry(name) {
            Some(Entry::Child(child)) => Ok(*child),
            Some(_) => Err(TreeError::NotANode {
                node: node.name.clone(),
                name: name.to_string(),
            }
            .into()),
            None => Err(node.not_found(name).into()),
        }
    }

    /// Returns whatever is attached as `name`: a child node or a value.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if no child `name` exists.
    pub fn get_item(&self, id: NodeId, name: &str) -> Result<Item> {
        let node = self.node(id)?;
        match node.entry(name) {
            Some(Entry::Child(child)) => Ok(Item::Node(*child)),
            Some(Entry::Item(value)) => Ok(Item::Value(value.clone())),
            _ => Err(node.not_found(name).into()),
        }
    }

    /// Creates an empty child node and attaches it.
    pub fn new_child(&mut self, id: NodeId, name: &str) -> Result<NodeId> {
        self.spawn(id, name, NodeKind::Node)
    }

    /// Creates an empty child node marked as a namespace.
    ///
    /// A namespace node is a boundary for [`path`](DomTree::path) and
    /// [`siblings`](DomTree::siblings).
    pub fn new_namespace(&mut self, id: NodeId, name: &str) -> Result<NodeId> {
        let child = self.spawn(id, name, NodeKind::Node)?;
        self.node_mut(child)?
            .flags
            .write_bit(SELF, FlagBit::Namespace, true)?;
        Ok(child)
    }

    /// Creates an empty map node child.
    pub fn new_dictgroup(&mut self, id: NodeId, name: &str) -> Result<NodeId> {
        self.spawn(id, name, NodeKind::Map)
    }

    /// Creates several child nodes in order, stopping at the first failure.
    /// Children created before the failure are kept.
    pub fn new_child_bulk<'a>(
        &mut self,
        id: NodeId,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<NodeId>> {
        names
            .into_iter()
            .map(|name| self.new_child(id, name))
            .collect()
    }

    /// Creates several map node children in order, stopping at the first
    /// failure. Children created before the failure are kept.
    pub fn new_dictgroup_bulk<'a>(
        &mut self,
        id: NodeId,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<NodeId>> {
        names
            .into_iter()
            .map(|name| self.new_dictgroup(id, name))
            .collect()
    }

    /// Destroys the child node attached as `name`.
    ///
    /// Unlike [`detach`](DomTree::detach), the child itself must also be
    /// unprotected.
    ///
    /// # Errors
    /// [`TreeError::Locked`] if either node is protected,
    /// [`TreeError::NotFound`] if `name` is absent, [`TreeError::NotANode`]
    /// if it holds a value.
    pub fn del_child(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.node(id)?.ensure_unprotected()?;
        let child = self.get_child(id, name)?;
        self.node(child)?.ensure_unprotected()?;
        self.detach(id, name)
    }

    /// Detaches `name` and attaches `item` in its place.
    ///
    /// Not rolled back: if the attach fails, `name` stays absent.
    pub fn replace_child(&mut self, id: NodeId, name: &str, item: impl Into<Item>) -> Result<()> {
        self.detach(id, name)?;
        self.attach(id, name, item)
    }

    /// Resolves a dotted path of child names starting from `id`.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] at the first missing or empty segment (so an
    /// empty path fails too), [`TreeError::NotANode`] if a segment names a
    /// value.
    pub fn get_context(&self, id: NodeId, context: &str) -> Result<NodeId> {
        path::segments(context).try_fold(id, |current, segment| {
            if segment.is_empty() {
                return Err(self.node(current)?.not_found(context).into());
            }
            self.get_child(current, segment)
        })
    }

    /// Dotted path from the nearest boundary down to this node.
    ///
    /// Walks up through parents, stopping at the root or at the first node
    /// marked as a namespace, whose own name starts the path.
    pub fn path(&self, id: NodeId) -> Result<String> {
        let mut names = Vec::new();
        let mut current = id;
        loop {
            let node = self.node(current)?;
            names.push(node.name.as_str());
            match node.parent {
                Some(parent) if !node.is_namespace() => current = parent,
                _ => break,
            }
        }
        names.reverse();
        Ok(names.join("."))
    }

    /// Names of the other children of this node's parent, sorted.
    ///
    /// A node without a parent, or marked as a namespace, has only itself as
    /// a sibling.
    pub fn siblings(&self, id: NodeId) -> Result<Vec<String>> {
        let node = self.node(id)?;
        let parent = match node.parent {
            Some(parent) if !node.is_namespace() => parent,
            _ => return Ok(vec![node.name.clone()]),
        };
        let mut names: Vec<String> = self
            .node(parent)?
            .children
            .iter()
            .filter(|name| **name != node.name)
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    /// Checks that `name` can be added to the node.
    pub(crate) fn check_vacant(&self, id: NodeId, name: &str) -> Result<()> {
        let node = self.node(id)?;
        node.ensure_unprotected()?;
        path::validate_name(name)?;
        if node.contains(name) {
            return Err(TreeError::AlreadyExists {
                node: node.name.clone(),
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn spawn(&mut self, id: NodeId, name: &str, kind: NodeKind) -> Result<NodeId> {
        self.check_vacant(id, name)?;
        let child = self.alloc(Node::new(name.to_string(), kind))?;
        self.attach(id, name, child)?;
        Ok(child)
    }
}

pub(crate) fn ensure_readable(node: &Node, name: &str) -> Result<()> {
    if !node.flags.is_readable(name)? {
        return Err(TreeError::Unreadable {
            node: node.name.clone(),
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}
