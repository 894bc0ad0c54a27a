//! Bit-flag permission values.
//!
//! One [`Access`] value per axis (read/write/execute), each an independent
//! bitmask over the three access classes. Pure value semantics: there is no
//! shared or global permission state, and the bits are stored faithfully but
//! never enforced by this crate.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Access classes for one permission axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u8 {
        const USER = 1;
        const GROUP = 2;
        const ALL = 4;
    }
}

/// File and directory access permissions, one bitmask per axis.
///
/// Persists as three 0–7 integers. New entries default to user and group
/// granted on every axis, world denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PermissionBits", into = "PermissionBits")]
pub struct PermissionSet {
    pub read: Access,
    pub write: Access,
    pub execute: Access,
}

impl Default for PermissionSet {
    fn default() -> Self {
        let granted = Access::USER | Access::GROUP;
        Self {
            read: granted,
            write: granted,
            execute: granted,
        }
    }
}

/// Wire shape of a [`PermissionSet`]: raw 0–7 bitmasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PermissionBits {
    read: u8,
    write: u8,
    execute: u8,
}

impl From<PermissionBits> for PermissionSet {
    fn from(bits: PermissionBits) -> Self {
        Self {
            read: Access::from_bits_truncate(bits.read),
            write: Access::from_bits_truncate(bits.write),
            execute: Access::from_bits_truncate(bits.execute),
        }
    }
}

impl From<PermissionSet> for PermissionBits {
    fn from(perms: PermissionSet) -> Self {
        Self {
            read: perms.read.bits(),
            write: perms.write.bits(),
            execute: perms.execute.bits(),
        }
    }
}
