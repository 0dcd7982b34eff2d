//! Constants used throughout the domtree library.
//!
//! This module provides central definitions for reserved flag owner names and
//! other fixed vocabulary shared by the flag, tree and schema modules.

/// Flag owner name for a node's own permissions.
///
/// The WRITE bit of this entry decides whether the node is protected.
pub const SELF: &str = "self";

/// Flag owner name guarding a node's parent back-reference.
pub const PARENT: &str = "parent";

/// Name given to the root node of a tree created with `DomTree::new`.
pub const ROOT: &str = "root";

/// Separator between node names in a context path.
pub const PATH_SEPARATOR: char = '.';

/// Returns true if `name` is one of the pseudo-names reserved by the flag table.
pub fn is_reserved(name: &str) -> bool {
    name == SELF || name == PARENT
}
