//! Cache sets and blocks.
//!
//! A set is a fixed number of block slots (ways) plus one replacement policy
//! instance. All hit/miss/fill/evict decisions for an address happen here.

use super::policies::{self, ReplacementPolicy};
use super::snapshot::{BlockSnapshot, SetSnapshot};
use crate::common::addr::AddressLayout;
use crate::config::ReplacementPolicy as PolicyType;

/// Cache block metadata. No data bytes are modeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Block {
    /// Block holds a resident tag.
    pub valid: bool,
    /// Block was written since it was loaded.
    pub dirty: bool,
    /// Stored tag; meaningful only when `valid`.
    pub tag: u64,
}

/// What a single set access did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Tag was already resident.
    pub hit: bool,
    /// Way that now holds the requested tag.
    pub way: usize,
    /// Prior contents of `way` if a resident block had to be evicted.
    pub evicted: Option<Block>,
}

/// One set of a set-associative cache.
#[derive(Debug)]
pub struct CacheSet {
    blocks: Vec<Block>,
    policy: Box<dyn ReplacementPolicy + Send + Sync>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid blocks governed by `policy`.
    pub fn new(ways: usize, policy: PolicyType) -> Self {
        Self {
            blocks: vec![Block::default(); ways],
            policy: policies::build(policy, ways),
        }
    }

    /// Number of ways.
    pub fn ways(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in way order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Replacement policy state (read-only).
    pub fn policy(&self) -> &dyn ReplacementPolicy {
        self.policy.as_ref()
    }

    /// `true` when every way holds a valid block.
    pub fn is_full(&self) -> bool {
        self.blocks.iter().all(|b| b.valid)
    }

    /// Way holding `tag`, if resident.
    pub fn probe(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.valid && b.tag == tag)
    }

    /// Lowest-numbered invalid way.
    fn first_invalid(&self) -> Option<usize> {
        self.blocks.iter().position(|b| !b.valid)
    }

    /// Looks up `tag`, filling (and evicting if needed) on a miss.
    ///
    /// On a miss the first invalid way is filled in index order; only a full
    /// set consults the replacement policy. The block is loaded dirty when the
    /// access is a write.
    pub fn access(&mut self, tag: u64, is_write: bool) -> AccessOutcome {
        if let Some(way) = self.probe(tag) {
            if is_write {
                self.blocks[way].dirty = true;
            }
            self.policy.on_access(way);
            return AccessOutcome {
                hit: true,
                way,
                evicted: None,
            };
        }

        let (way, evicted) = match self.first_invalid() {
            Some(way) => (way, None),
            None => {
                // Every valid way went through on_load, so the order is non-empty.
                let way = self.policy.select_victim().unwrap_or_default();
                (way, Some(self.blocks[way]))
            }
        };

        self.blocks[way] = Block {
            valid: true,
            dirty: is_write,
            tag,
        };
        self.policy.on_load(way);

        AccessOutcome {
            hit: false,
            way,
            evicted,
        }
    }

    /// Invalidates every block and forgets policy state.
    pub fn clear(&mut self) {
        self.blocks.fill(Block::default());
        self.policy.reset();
    }

    /// Read-only view of this set as set number `index`.
    pub fn snapshot(&self, index: usize, layout: &AddressLayout) -> SetSnapshot {
        SetSnapshot {
            index,
            blocks: self
                .blocks
                .iter()
                .enumerate()
                .map(|(way, block)| BlockSnapshot {
                    way,
                    valid: block.valid,
                    dirty: block.dirty,
                    tag: block.tag,
                    block_address: block
                        .valid
                        .then(|| layout.block_address(block.tag, index)),
                })
                .collect(),
            eviction_order: self.policy.order().to_vec(),
        }
    }
}
