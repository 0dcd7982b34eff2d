//! FlagSet integration tests
//!
//! These tests exercise the permission table through the tree: protection of
//! nodes, per-entry flags, the `"parent"` reparent lock and the sentinel
//! normalization.

use domtree::{
    DomTree, FlagBit, FlagSet, Flags,
    constants::{PARENT, SELF},
    flags::FlagError,
};

use crate::helpers::*;

#[test]
fn test_protected_iff_self_write_bit_clear() {
    let mut tree = DomTree::new();
    let root = tree.root();
    assert!(!tree.is_protected(root).unwrap());
    assert!(tree.flags(root).unwrap().test_bit(SELF, FlagBit::Write).unwrap());

    protect(&mut tree, root);
    assert!(tree.is_protected(root).unwrap());
    assert!(!tree.flags(root).unwrap().test_bit(SELF, FlagBit::Write).unwrap());

    tree.flags_mut(root).unwrap().unlock(SELF).unwrap();
    assert!(!tree.is_protected(root).unwrap());
}

#[test]
fn test_entries_get_flags_on_creation() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_property(root, "title", "demo").unwrap();
    tree.new_child(root, "child").unwrap();
    tree.attach_with_flags(root, "fixed", 1i64, Flags::READ).unwrap();

    let flags = tree.flags(root).unwrap();
    assert_eq!(flags.get_flag("title").unwrap(), Flags::DEFAULT);
    assert_eq!(flags.get_flag("child").unwrap(), Flags::DEFAULT);
    assert_eq!(flags.get_flag("fixed").unwrap(), Flags::READ);
}

#[test]
fn test_flag_entries_never_outlive_their_owner() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_property(root, "title", "demo").unwrap();
    tree.new_child(root, "child").unwrap();

    tree.del_property(root, "title").unwrap();
    tree.detach(root, "child").unwrap();

    let names: Vec<&str> = tree.flags(root).unwrap().iter().map(|(name, _)| name).collect();
    assert_eq!(names, [PARENT, SELF]);
}

#[test]
fn test_parent_flag_is_locked_after_reparenting() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let loose = tree.create_node("loose").unwrap();
    assert_eq!(tree.flags(loose).unwrap().get_flag(PARENT).unwrap(), Flags::DEFAULT);

    tree.attach(root, "loose", loose).unwrap();
    let flags = tree.flags(loose).unwrap();
    assert!(!flags.is_writeable(PARENT).unwrap());
    assert!(flags.is_readable(PARENT).unwrap());

    // moving it again goes through the same transaction
    let other = tree.new_child(root, "other").unwrap();
    tree.attach(other, "moved", loose).unwrap();
    assert!(!tree.flags(loose).unwrap().is_writeable(PARENT).unwrap());
    assert_eq!(tree.parent(loose).unwrap(), Some(other));
}

#[test]
fn test_namespace_bit_is_bit_two() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let ns = tree.new_namespace(root, "ns").unwrap();

    let flags = tree.flags(ns).unwrap();
    assert!(flags.test_bit_index(SELF, 2).unwrap());
    assert_eq!(
        flags.get_flag(SELF).unwrap(),
        Flags::READ | Flags::WRITE | Flags::NAMESPACE
    );
    assert!(tree.is_namespace(ns).unwrap());
}

#[test]
fn test_del_flag_blocked_while_protected() {
    let mut flags = FlagSet::new();
    flags.set_flag("entry", Flags::DEFAULT).unwrap();
    flags.lock(SELF).unwrap();

    assert_eq!(
        flags.del_flag("entry"),
        Err(FlagError::Locked {
            name: "entry".to_string()
        })
    );
    assert!(flags.has_flag("entry"));
}

#[test]
fn test_sentinel_reads_as_read_only() {
    let mut flags = FlagSet::new();
    flags.set_flag_raw("legacy", -1).unwrap();

    assert_eq!(flags.get_flag("legacy").unwrap(), Flags::READ_ONLY);
    assert!(flags.is_readable("legacy").unwrap());
    assert!(!flags.is_writeable("legacy").unwrap());
    let listed: Vec<(&str, Flags)> = flags.iter().filter(|(name, _)| *name == "legacy").collect();
    assert_eq!(listed, [("legacy", Flags::READ_ONLY)]);
}

#[test]
fn test_invalid_bit_index_and_flag_names() {
    let flags = FlagSet::new();
    let err = flags.test_bit_index(SELF, 9).unwrap_err();
    assert!(matches!(err, FlagError::InvalidArgument { .. }));

    let err = flags.test_bit("missing", FlagBit::Read).unwrap_err();
    assert!(matches!(err, FlagError::InvalidFlagName { .. }));
    assert_eq!(err.name(), Some("missing"));
}

#[test]
fn test_flag_errors_surface_through_tree_operations() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let err = tree.flags_mut(root).unwrap().lock("missing").unwrap_err();
    let err: domtree::Error = err.into();
    assert_eq!(err.module(), "flags");
    assert!(err.is_not_found());
}

#[test]
fn test_listed_entries_keep_their_flags() {
    let mut tree = DomTree::new();
    let root = tree.root();
    tree.new_property(root, "lang", "en").unwrap();
    tree.new_child(root, "settings").unwrap();

    for name in ["lang", "settings"] {
        let err = tree.flags_mut(root).unwrap().del_flag(name).unwrap_err();
        assert!(matches!(err, FlagError::InvalidArgument { .. }));
        assert!(tree.flags(root).unwrap().has_flag(name));
    }

    assert!(tree.has_property(root, "lang").unwrap());
    assert_eq!(tree.get_property(root, "lang").unwrap(), &"en");
    assert_eq!(
        tree.to_json(root, None, false).unwrap(),
        r#"{"lang":"en","settings":{}}"#
    );

    // Entries nothing owns can still be removed
    let mut flags = tree.flags_mut(root).unwrap();
    flags.set_flag("extra", Flags::DEFAULT).unwrap();
    flags.del_flag("extra").unwrap();
    assert!(!flags.has_flag("extra"));
}
