//! The per-node flag table and its lock/unlock state machine.

use std::collections::BTreeMap;

use super::{FlagBit, FlagError, Flags};
use crate::constants::{PARENT, SELF, is_reserved};

/// A stored flag value.
///
/// `Uninitialized` is the sentinel a raw `-1` turns into. It is never handed
/// out: every read normalizes it to [`Flags::READ_ONLY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagValue {
    Bits(Flags),
    Uninitialized,
}

/// Table mapping owner names to permission bytes.
///
/// The table always contains the `"self"` entry, created with
/// [`Flags::DEFAULT`]. Each entry is either *unlocked* (WRITE set) or
/// *locked* (WRITE clear); [`lock`](FlagSet::lock) and
/// [`unlock`](FlagSet::unlock) are the only transitions between the two and
/// are allowed even while the table is protected.
///
/// # Examples
///
/// ```
/// use domtree::flags::{FlagBit, FlagSet, Flags};
///
/// let mut flags = FlagSet::new();
/// assert!(!flags.is_protected());
///
/// flags.set_flag("title", Flags::READ).unwrap();
/// assert!(!flags.is_writeable("title").unwrap());
///
/// flags.lock("self").unwrap();
/// assert!(flags.is_protected());
/// assert!(flags.set_flag("other", Flags::DEFAULT).unwrap_err().is_locked());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    entries: BTreeMap<String, FlagValue>,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagSet {
    /// Creates a table holding only the `"self"` entry with default flags.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(SELF.to_string(), FlagValue::Bits(Flags::DEFAULT));
        Self { entries }
    }

    /// Creates the table a new node starts with: `"self"` and `"parent"`,
    /// both with default flags.
    pub(crate) fn for_node() -> Self {
        let mut set = Self::new();
        set.entries
            .insert(PARENT.to_string(), FlagValue::Bits(Flags::DEFAULT));
        set
    }

    /// Returns true if an entry exists for `name`.
    pub fn has_flag(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of entries, including `"self"`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the `"self"` entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in name order, with sentinels normalized.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Flags)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), normalize(name, *value)))
    }

    /// Returns the permission value of `name`.
    ///
    /// # Errors
    /// [`FlagError::NotFound`] if no entry exists.
    pub fn get_flag(&self, name: &str) -> Result<Flags, FlagError> {
        self.entries
            .get(name)
            .map(|value| normalize(name, *value))
            .ok_or_else(|| FlagError::NotFound {
                name: name.to_string(),
            })
    }

    /// Creates an entry, or updates it if it already exists.
    ///
    /// # Errors
    /// [`FlagError::Locked`] if the table is protected.
    pub fn set_flag(&mut self, name: impl Into<String>, flags: Flags) -> Result<(), FlagError> {
        let name = name.into();
        if self.has_flag(&name) {
            return self.update_flag(&name, flags);
        }
        if self.is_protected() {
            return Err(FlagError::Locked { name });
        }
        self.entries.insert(name, FlagValue::Bits(flags));
        Ok(())
    }

    /// Like [`set_flag`](FlagSet::set_flag), taking an untyped integer.
    ///
    /// `-1` is accepted and stored as the uninitialized sentinel, which reads
    /// back as [`Flags::READ_ONLY`].
    ///
    /// # Errors
    /// [`FlagError::InvalidArgument`] for any other value outside `0..=255`,
    /// otherwise as [`set_flag`](FlagSet::set_flag).
    pub fn set_flag_raw(&mut self, name: impl Into<String>, raw: i32) -> Result<(), FlagError> {
        let name = name.into();
        if raw != -1 {
            return self.set_flag(name, Flags::from_raw(raw)?);
        }
        if self.is_protected() {
            return Err(FlagError::Locked { name });
        }
        self.entries.insert(name, FlagValue::Uninitialized);
        Ok(())
    }

    /// Replaces the value of an existing entry.
    ///
    /// # Errors
    /// [`FlagError::NotFound`] if no entry exists, [`FlagError::Locked`] if
    /// the table is protected.
    pub fn update_flag(&mut self, name: &str, flags: Flags) -> Result<(), FlagError> {
        if self.is_protected() {
            return Err(FlagError::Locked {
                name: name.to_string(),
            });
        }
        let value = self
            .entries
            .get_mut(name)
            .ok_or_else(|| FlagError::NotFound {
                name: name.to_string(),
            })?;
        *value = FlagValue::Bits(flags);
        Ok(())
    }

    /// Removes an entry.
    ///
    /// # Errors
    /// [`FlagError::InvalidArgument`] for the reserved `"self"` and
    /// `"parent"` entries, [`FlagError::Locked`] if the table is protected,
    /// [`FlagError::NotFound`] if no entry exists.
    pub fn del_flag(&mut self, name: &str) -> Result<(), FlagError> {
        if is_reserved(name) {
            return Err(FlagError::InvalidArgument {
                reason: format!("reserved flag '{name}' cannot be deleted"),
            });
        }
        if self.is_protected() {
            return Err(FlagError::Locked {
                name: name.to_string(),
            });
        }
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| FlagError::NotFound {
                name: name.to_string(),
            })
    }

    /// Clears the WRITE bit of `name`.
    ///
    /// # Errors
    /// [`FlagError::InvalidFlagName`] if no entry exists.
    pub fn lock(&mut self, name: &str) -> Result<(), FlagError> {
        self.write_bit(name, FlagBit::Write, false)
    }

    /// Sets the WRITE bit of `name`.
    ///
    /// # Errors
    /// [`FlagError::InvalidFlagName`] if no entry exists.
    pub fn unlock(&mut self, name: &str) -> Result<(), FlagError> {
        self.write_bit(name, FlagBit::Write, true)
    }

    /// Returns true if `bit` is set on `name`.
    ///
    /// # Errors
    /// [`FlagError::InvalidFlagName`] if no entry exists.
    pub fn test_bit(&self, name: &str, bit: FlagBit) -> Result<bool, FlagError> {
        Ok(self.lookup(name)?.test(bit))
    }

    /// Like [`test_bit`](FlagSet::test_bit), taking an untyped bit index.
    ///
    /// # Errors
    /// [`FlagError::InvalidArgument`] if `index` is 8 or more, otherwise as
    /// [`test_bit`](FlagSet::test_bit).
    pub fn test_bit_index(&self, name: &str, index: u8) -> Result<bool, FlagError> {
        self.test_bit(name, FlagBit::try_from(index)?)
    }

    /// Returns true if the WRITE bit of `name` is set.
    ///
    /// # Errors
    /// [`FlagError::InvalidFlagName`] if no entry exists.
    pub fn is_writeable(&self, name: &str) -> Result<bool, FlagError> {
        self.test_bit(name, FlagBit::Write)
    }

    /// Returns true if the READ bit of `name` is set.
    ///
    /// # Errors
    /// [`FlagError::InvalidFlagName`] if no entry exists.
    pub fn is_readable(&self, name: &str) -> Result<bool, FlagError> {
        self.test_bit(name, FlagBit::Read)
    }

    /// True when the `"self"` entry's WRITE bit is clear.
    pub fn is_protected(&self) -> bool {
        !self
            .lookup(SELF)
            .map(|flags| flags.test(FlagBit::Write))
            .unwrap_or(false)
    }

    /// Sets or clears one bit of an existing entry, bypassing protection.
    ///
    /// Used for the lock/unlock transitions and by the tree when it marks a
    /// node as a namespace.
    pub(crate) fn write_bit(&mut self, name: &str, bit: FlagBit, on: bool) -> Result<(), FlagError> {
        let current = self.lookup(name)?;
        let next = current.with(bit, on);
        tracing::trace!(flag = name, from = current.bits(), to = next.bits(), "Flag transition");
        self.entries.insert(name.to_string(), FlagValue::Bits(next));
        Ok(())
    }

    /// Removes an entry without consulting protection.
    ///
    /// The tree calls this after it has already checked the owning node.
    pub(crate) fn forget(&mut self, name: &str) {
        self.entries.remove(name);
    }

    fn lookup(&self, name: &str) -> Result<Flags, FlagError> {
        self.entries
            .get(name)
            .map(|value| normalize(name, *value))
            .ok_or_else(|| FlagError::InvalidFlagName {
                name: name.to_string(),
            })
    }
}

fn normalize(name: &str, value: FlagValue) -> Flags {
    match value {
        FlagValue::Bits(flags) => flags,
        FlagValue::Uninitialized => {
            tracing::warn!(
                flag = name,
                "Uninitialized flag value read; normalizing to read-only"
            );
            Flags::READ_ONLY
        }
    }
}
