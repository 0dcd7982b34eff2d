//! Error types for tree operations.
//!
//! Node names in these errors are the node's own name rather than its full
//! path, since computing a path requires walking parents that may already be
//! gone when the error is built.

use thiserror::Error;

use super::NodeId;

/// Structured error types for [`DomTree`](super::DomTree) operations.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// No child or property with this name exists on the node
    #[error("'{name}' not found on node '{node}'")]
    NotFound { node: String, name: String },

    /// The name is already taken by a child or property of the node
    #[error("'{name}' already exists on node '{node}'")]
    AlreadyExists { node: String, name: String },

    /// The node is protected, or the entry's WRITE bit is clear
    #[error("'{name}' on node '{node}' is locked")]
    Locked { node: String, name: String },

    /// The entry's READ bit is clear
    #[error("'{name}' on node '{node}' is not readable")]
    Unreadable { node: String, name: String },

    /// The name cannot be used for an entry
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The requested structural change is not allowed
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The handle refers to a destroyed node or was issued by another tree
    #[error("Node handle {id} no longer refers to a live node")]
    StaleHandle { id: NodeId },

    /// The entry exists but holds a value rather than a node
    #[error("'{name}' on node '{node}' is not a node")]
    NotANode { node: String, name: String },

    /// A mapping operation was used on a node without a keystore
    #[error("Node '{node}' is not a map node")]
    NotAMapNode { node: String },

    /// A value could not be converted to the requested type
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl TreeError {
    /// Check if this error indicates a missing entry or node
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TreeError::NotFound { .. } | TreeError::StaleHandle { .. }
        )
    }

    /// Check if this error indicates a name collision
    pub fn is_already_exists(&self) -> bool {
        matches!(self, TreeError::AlreadyExists { .. })
    }

    /// Check if this error was caused by protection or a cleared WRITE bit
    pub fn is_locked(&self) -> bool {
        matches!(self, TreeError::Locked { .. })
    }

    /// Check if this error was caused by a cleared READ bit
    pub fn is_unreadable(&self) -> bool {
        matches!(self, TreeError::Unreadable { .. })
    }

    /// Check if this error was caused by a bad name or argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TreeError::InvalidName { .. }
                | TreeError::InvalidArgument { .. }
                | TreeError::NotANode { .. }
                | TreeError::NotAMapNode { .. }
        )
    }

    /// Check if this error is a failed value conversion
    pub fn is_type_error(&self) -> bool {
        matches!(self, TreeError::TypeMismatch { .. })
    }

    /// Get the entry name this error refers to, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            TreeError::NotFound { name, .. }
            | TreeError::AlreadyExists { name, .. }
            | TreeError::Locked { name, .. }
            | TreeError::Unreadable { name, .. }
            | TreeError::InvalidName { name, .. }
            | TreeError::NotANode { name, .. } => Some(name),
            _ => None,
        }
    }
}

// Conversion from TreeError to the main Error type
impl From<TreeError> for crate::Error {
    fn from(err: TreeError) -> Self {
        crate::Error::Tree(err)
    }
}
