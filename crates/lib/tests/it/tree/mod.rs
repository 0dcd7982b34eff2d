//! Node integration tests
//!
//! Tests are organized by concern: structural mutation under the permission
//! rules, property access, and path navigation.

mod navigation;
mod structure;
