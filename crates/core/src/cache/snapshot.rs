//! Read-only views of cache state.
//!
//! Snapshots are plain owned data built from `&self` borrows of the engine;
//! taking one never touches replacement bookkeeping. They all serialize with
//! serde so a front end can render them directly.

use serde::Serialize;

use crate::common::addr::AddressParts;
use crate::common::data::AccessKind;
use crate::config::CacheGeometry;
use crate::stats::StatsSnapshot;

/// One way of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
    /// Way number within the set.
    pub way: usize,
    /// Holds a resident block.
    pub valid: bool,
    /// Written since loaded.
    pub dirty: bool,
    /// Stored tag (stale when `valid` is false).
    pub tag: u64,
    /// First byte address of the resident block, when valid.
    pub block_address: Option<u64>,
}

/// One set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSnapshot {
    /// Set number.
    pub index: usize,
    /// Ways in index order.
    pub blocks: Vec<BlockSnapshot>,
    /// Resident ways ordered from next victim to most protected.
    pub eviction_order: Vec<usize>,
}

impl SetSnapshot {
    /// Number of valid blocks.
    pub fn occupancy(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }

    /// Way that would be evicted by the next conflicting miss, if the set is full.
    pub fn next_victim(&self) -> Option<usize> {
        if self.occupancy() == self.blocks.len() {
            self.eviction_order.first().copied()
        } else {
            None
        }
    }
}

/// Whole-cache state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    /// Active geometry.
    pub geometry: CacheGeometry,
    /// Every set in index order.
    pub sets: Vec<SetSnapshot>,
}

impl CacheSnapshot {
    /// Number of valid blocks across all sets.
    pub fn resident_blocks(&self) -> usize {
        self.sets.iter().map(SetSnapshot::occupancy).sum()
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Block displaced by a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvictedBlock {
    /// Way it occupied (the way the new block was loaded into).
    pub way: usize,
    /// Its tag.
    pub tag: u64,
    /// Whether it had been written. Reported only; nothing is written back.
    pub dirty: bool,
    /// First byte address of the evicted block.
    pub block_address: u64,
}

/// Result of one cache access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessResult {
    /// Address as requested.
    pub address: u64,
    /// Read or write.
    pub kind: AccessKind,
    /// Tag, index and offset of `address`.
    pub parts: AddressParts,
    /// Tag was resident.
    pub hit: bool,
    /// Set the address maps to.
    pub set_index: usize,
    /// Way now holding the block.
    pub way: usize,
    /// Block displaced by this access.
    pub evicted: Option<EvictedBlock>,
    /// The touched set after the access.
    pub set: SetSnapshot,
    /// Session statistics after the access.
    pub stats: StatsSnapshot,
}

impl AccessResult {
    /// Serializes to compact JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
