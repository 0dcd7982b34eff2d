//! Entry names and dotted context paths.
//!
//! A context path is a sequence of child names joined by `.`, resolved one
//! segment at a time from a starting node (see
//! [`DomTree::get_context`](super::DomTree::get_context)). Because `.` is the
//! separator, entry names may not contain it.
//!
//! # Usage
//!
//! ```rust
//! use domtree::tree::path::segments;
//!
//! assert_eq!(segments("settings.app").collect::<Vec<_>>(), ["settings", "app"]);
//! assert_eq!(segments("settings..app").collect::<Vec<_>>(), ["settings", "", "app"]);
//! ```

use super::TreeError;
use crate::constants::{PATH_SEPARATOR, is_reserved};

/// Iterates over the segments of a path.
///
/// Empty segments are kept, so `""` yields one empty segment and stray dots
/// show up as empty segments rather than disappearing.
pub fn segments(input: &str) -> impl Iterator<Item = &str> {
    input.split(PATH_SEPARATOR)
}

/// Checks that `name` can be used as a child or property name.
///
/// # Errors
/// [`TreeError::InvalidName`] if the name is empty, contains the path
/// separator, or is one of the reserved flag owner names.
pub fn validate_name(name: &str) -> Result<(), TreeError> {
    let reason = if name.is_empty() {
        "names cannot be empty"
    } else if name.contains(PATH_SEPARATOR) {
        "names cannot contain dots"
    } else if is_reserved(name) {
        "name is reserved for flags"
    } else {
        return Ok(());
    };

    Err(TreeError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
