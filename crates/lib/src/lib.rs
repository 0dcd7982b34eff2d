//!
//! domtree: permission-gated trees of named children and properties.
//! This library provides in-memory hierarchical trees whose every structural
//! mutation is governed by per-name permission flags, plus a declarative
//! schema interpreter that builds whole subtrees in one call.
//!
//! ## Core Concepts
//!
//! * **Flags (`flags::FlagSet`)**: Per-node table mapping an owner name to an 8-bit permission value (READ, WRITE, NAMESPACE). Clearing the WRITE bit of a node's `"self"` entry *protects* it against structural change.
//! * **Trees (`tree::DomTree`)**: An arena owning every node of one tree, addressed by generational `tree::NodeId` handles. A node owns its attached children; its parent link is a non-owning handle.
//! * **Nodes**: Tree elements with ordered child and property listings. Reparenting always passes through an unlock, relink, relock transaction on the child's `"parent"` flag.
//! * **Map nodes**: A node variant whose children live in a keystore with mapping operations (`map_get`, `map_insert`, `update`, ...), sharing the same permission and parenting rules.
//! * **Schemas (`schema::Schema`)**: Declarative children/dictgroups/props descriptions materialized by `schema::SchemaBuilder`.
//! * **Export**: Any subtree can be exported as an ordered JSON mapping and rebuilt from one.

pub mod constants;
pub mod flags;
pub mod schema;
pub mod tree;

pub use flags::{FlagBit, FlagSet, Flags};
pub use schema::{Schema, SchemaBuilder};
pub use tree::{DomTree, Item, NodeId, Value};

/// Result type used throughout the domtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the domtree library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured flag errors from the flags module
    #[error(transparent)]
    Flag(flags::FlagError),

    /// Structured tree errors from the tree module
    #[error(transparent)]
    Tree(tree::TreeError),

    /// Structured schema errors from the schema module
    #[error(transparent)]
    Schema(schema::SchemaError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Flag(_) => "flags",
            Error::Tree(_) => "tree",
            Error::Schema(_) => "schema",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a missing name, path, or node.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Flag(flag_err) => flag_err.is_not_found(),
            Error::Tree(tree_err) => tree_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a name collision.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if this error was caused by protection or a cleared WRITE bit.
    pub fn is_locked(&self) -> bool {
        match self {
            Error::Flag(flag_err) => flag_err.is_locked(),
            Error::Tree(tree_err) => tree_err.is_locked(),
            _ => false,
        }
    }

    /// Check if this error was caused by a cleared READ bit.
    pub fn is_unreadable(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_unreadable(),
            _ => false,
        }
    }

    /// Check if this error was caused by an invalid name or argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Flag(flag_err) => flag_err.is_invalid_argument(),
            Error::Tree(tree_err) => tree_err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error is a failed value conversion.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error came from parsing a schema.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
