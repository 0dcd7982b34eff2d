//! Error types for schema parsing.

use thiserror::Error;

/// Structured error types for [`Schema`](super::Schema) parsing.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The description does not have the expected shape
    #[error("Invalid schema at '{at}': {reason}")]
    InvalidSchema { at: String, reason: String },

    /// A property names a cast this library does not know
    #[error("Unknown cast '{cast}' for property '{property}'")]
    UnknownCast { property: String, cast: String },
}

impl SchemaError {
    /// Check if this error is a structural problem with the description
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, SchemaError::InvalidSchema { .. })
    }

    /// Check if this error is an unrecognized cast name
    pub fn is_unknown_cast(&self) -> bool {
        matches!(self, SchemaError::UnknownCast { .. })
    }
}

// Conversion from SchemaError to the main Error type
impl From<SchemaError> for crate::Error {
    fn from(err: SchemaError) -> Self {
        crate::Error::Schema(err)
    }
}
