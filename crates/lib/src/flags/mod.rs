//! Permission flags for tree entries.
//!
//! Every node carries a [`FlagSet`]: a table mapping an owner name to an
//! 8-bit permission value. The owner is either one of the reserved
//! pseudo-names (`"self"`, `"parent"`) or the name of a child or property
//! held by the node.
//!
//! # Bit layout
//!
//! | bit | flag          | meaning                                         |
//! |-----|---------------|-------------------------------------------------|
//! | 0   | `READ`        | the entry may be read                           |
//! | 1   | `WRITE`       | the entry may be modified                       |
//! | 2   | `NAMESPACE`   | on `"self"`: the node is a path boundary        |
//! | 3-7 | `RESERVED_*`  | unused, preserved as given                      |
//!
//! A node is *protected* when the WRITE bit of its `"self"` entry is clear.

pub mod errors;
mod set;

pub use errors::FlagError;
pub use set::FlagSet;

bitflags::bitflags! {
    /// Permission bits for a single flag entry.
    ///
    /// Combine with bitwise OR: `Flags::READ | Flags::WRITE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const NAMESPACE = 1 << 2;
        const RESERVED_8 = 1 << 3;
        const RESERVED_16 = 1 << 4;
        const RESERVED_32 = 1 << 5;
        const RESERVED_64 = 1 << 6;
        const RESERVED_128 = 1 << 7;
    }
}

impl Flags {
    /// Flags given to new entries unless the caller asks otherwise.
    pub const DEFAULT: Flags = Flags::READ.union(Flags::WRITE);

    /// Read-only permissions, used when a stored value has to be normalized.
    pub const READ_ONLY: Flags = Flags::READ;

    /// Converts a raw integer into flags.
    ///
    /// # Errors
    /// Returns [`FlagError::InvalidArgument`] if `raw` is outside `0..=255`.
    pub fn from_raw(raw: i32) -> Result<Flags, FlagError> {
        u8::try_from(raw)
            .map(Flags::from_bits_retain)
            .map_err(|_| FlagError::InvalidArgument {
                reason: format!("flag value {raw} is outside 0..=255"),
            })
    }

    /// Returns true if the given bit is set.
    pub fn test(self, bit: FlagBit) -> bool {
        self.contains(bit.mask())
    }

    /// Returns a copy with the given bit set or cleared.
    pub fn with(self, bit: FlagBit, on: bool) -> Flags {
        let mut out = self;
        out.set(bit.mask(), on);
        out
    }
}

/// Index of a single permission bit.
///
/// Bit positions are 0-indexed: `Read` is bit 0, `Write` bit 1, `Namespace`
/// bit 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FlagBit {
    Read = 0,
    Write = 1,
    Namespace = 2,
    Reserved3 = 3,
    Reserved4 = 4,
    Reserved5 = 5,
    Reserved6 = 6,
    Reserved7 = 7,
}

impl FlagBit {
    /// Position of this bit within the byte.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this position.
    pub fn mask(self) -> Flags {
        Flags::from_bits_retain(1 << self.index())
    }
}

impl TryFrom<u8> for FlagBit {
    type Error = FlagError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Ok(match index {
            0 => FlagBit::Read,
            1 => FlagBit::Write,
            2 => FlagBit::Namespace,
            3 => FlagBit::Reserved3,
            4 => FlagBit::Reserved4,
            5 => FlagBit::Reserved5,
            6 => FlagBit::Reserved6,
            7 => FlagBit::Reserved7,
            _ => {
                return Err(FlagError::InvalidArgument {
                    reason: format!("bit index {index} is outside 0..8"),
                });
            }
        })
    }
}
