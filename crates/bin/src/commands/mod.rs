//! Subcommand implementations.

use std::path::Path;

use domtree::{DomTree, Schema};

pub mod build;
pub mod paths;

/// Reads a schema file and materializes it under a fresh root.
pub fn load_tree(schema_path: &Path, root: &str) -> domtree::Result<DomTree> {
    let text = std::fs::read_to_string(schema_path)?;
    let schema: Schema = text.parse()?;
    tracing::debug!(path = %schema_path.display(), keys = schema.keys().len(), "Loaded schema");

    let mut tree = DomTree::with_root(root)?;
    let root = tree.root();
    tree.build_schema(root, &schema)?;
    tracing::info!(nodes = tree.len(), "Materialized schema");
    Ok(tree)
}
