//! Recursive materialization of a [`Schema`] into a tree.

use super::{PropSpec, Schema};
use crate::{
    Result,
    tree::{DomTree, NodeId},
};

/// Materializes schemas into a [`DomTree`].
///
/// At each target node the builder creates every entry of the `children`
/// section bare, then recurses into each new child; then does the same for
/// `dictgroups`; then creates the `props`. Nothing is checked up front and
/// nothing is undone: a failure leaves whatever was built before it, and
/// applying a schema whose names already exist fails with
/// [`TreeError::AlreadyExists`](crate::tree::TreeError::AlreadyExists).
pub struct SchemaBuilder<'a> {
    tree: &'a mut DomTree,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(tree: &'a mut DomTree) -> Self {
        Self { tree }
    }

    /// Applies `schema` at `target`.
    pub fn apply(&mut self, target: NodeId, schema: &Schema) -> Result<()> {
        let children = self
            .tree
            .new_child_bulk(target, schema.children().iter().map(|(name, _)| name.as_str()))?;
        tracing::debug!(count = children.len(), "Created schema children");
        for (child, (_, nested)) in children.into_iter().zip(schema.children()) {
            self.apply(child, nested)?;
        }

        let groups = self.tree.new_dictgroup_bulk(
            target,
            schema.dictgroups().iter().map(|(name, _)| name.as_str()),
        )?;
        tracing::debug!(count = groups.len(), "Created schema dictgroups");
        for (group, (_, nested)) in groups.into_iter().zip(schema.dictgroups()) {
            self.apply(group, nested)?;
        }

        self.apply_props(target, schema.props())
    }

    /// Creates a property for each entry that has a cast; others are skipped.
    pub fn apply_props(&mut self, target: NodeId, props: &[(String, PropSpec)]) -> Result<()> {
        for (name, spec) in props {
            match spec.initial_value() {
                Some(value) => self.tree.new_property(target, name, value)?,
                None => tracing::debug!(property = %name, "Property has no cast, skipping"),
            }
        }
        Ok(())
    }
}

impl DomTree {
    /// Materializes `schema` at `target`. See [`SchemaBuilder`].
    pub fn build_schema(&mut self, target: NodeId, schema: &Schema) -> Result<()> {
        SchemaBuilder::new(self).apply(target, schema)
    }

    /// Creates properties from a list of property sections.
    ///
    /// A section paired with a name is created in a new child of that name;
    /// a section without one is created at `target` itself.
    ///
    /// ```
    /// # use domtree::{schema::{Cast, PropSpec}, tree::{DomTree, Value}};
    /// let mut tree = DomTree::new();
    /// let root = tree.root();
    /// let audio = vec![("volume".to_string(), PropSpec::new(Cast::Int).with_default(7))];
    /// let general = vec![("title".to_string(), PropSpec::new(Cast::Text))];
    ///
    /// tree.build_prop_map(root, &[(audio.as_slice(), Some("audio")), (general.as_slice(), None)])?;
    /// let audio = tree.get_context(root, "audio")?;
    /// assert_eq!(tree.get_property(audio, "volume")?, &Value::Int(7));
    /// assert_eq!(tree.get_property(root, "title")?, &"");
    /// # Ok::<(), domtree::Error>(())
    /// ```
    pub fn build_prop_map(
        &mut self,
        target: NodeId,
        sections: &[(&[(String, PropSpec)], Option<&str>)],
    ) -> Result<()> {
        let mut builder = SchemaBuilder::new(self);
        for (props, section) in sections {
            let context = match section {
                Some(name) => builder.tree.new_child(target, name)?,
                None => target,
            };
            builder.apply_props(context, props)?;
        }
        Ok(())
    }
}
