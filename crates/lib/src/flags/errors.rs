//! Error types for permission flag operations.

use thiserror::Error;

/// Structured error types for [`FlagSet`](super::FlagSet) operations.
///
/// Every failure is structural: a flag that does not exist, a flag table that
/// is protected against modification, or an argument outside the 8-bit
/// permission range.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    /// No flag entry exists for this owner name
    #[error("Flag not found: {name}")]
    NotFound { name: String },

    /// The flag table is protected, or the targeted entry's WRITE bit is clear
    #[error("Flag '{name}' is locked")]
    Locked { name: String },

    /// A lock/unlock/test operation referenced an undefined flag key
    #[error("Invalid flag name referenced: {name}")]
    InvalidFlagName { name: String },

    /// A bit index or raw value outside the permission range
    #[error("Invalid flag argument: {reason}")]
    InvalidArgument { reason: String },
}

impl FlagError {
    /// Check if this error indicates a missing flag entry
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FlagError::NotFound { .. } | FlagError::InvalidFlagName { .. }
        )
    }

    /// Check if this error was caused by protection
    pub fn is_locked(&self) -> bool {
        matches!(self, FlagError::Locked { .. })
    }

    /// Check if this error was caused by a bad argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, FlagError::InvalidArgument { .. })
    }

    /// Get the flag name this error refers to, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            FlagError::NotFound { name }
            | FlagError::Locked { name }
            | FlagError::InvalidFlagName { name } => Some(name),
            FlagError::InvalidArgument { .. } => None,
        }
    }
}

// Conversion from FlagError to the main Error type
impl From<FlagError> for crate::Error {
    fn from(err: FlagError) -> Self {
        crate::Error::Flag(err)
    }
}
