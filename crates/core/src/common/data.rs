//! Memory access kinds.
//!
//! This module defines the classification of accesses fed to the cache. It is used for:
//! 1. **Dirty tracking:** Writes mark the touched block dirty.
//! 2. **Trace replay:** Each trace entry carries its kind.
//! 3. **Statistics:** Reads and writes are counted separately.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory access presented to the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Data read. Leaves the dirty bit untouched on a hit, loads clean on a miss.
    #[default]
    Read,

    /// Data write. Sets the dirty bit on a hit, loads dirty on a miss.
    Write,
}

impl AccessKind {
    /// Maps the boolean `is_write` flag used by the engine API.
    #[inline]
    pub const fn from_write_flag(is_write: bool) -> Self {
        if is_write { Self::Write } else { Self::Read }
    }

    /// Returns `true` for [`AccessKind::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "R"),
            Self::Write => write!(f, "W"),
        }
    }
}
