//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the way that has gone longest without being touched.
//! It keeps a recency list per set: index 0 is the least recently used way,
//! the last index the most recently used. Both hits and fills move a way to
//! the back of the list.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()` / `on_load()`: O(W) where W is the number of ways
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Cyclic scans one block larger than the set (thrashing)

use super::{ReplacementPolicy, push_newest};
use crate::config::ReplacementPolicy as PolicyType;

/// LRU state for one set.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// Resident ways, least recently used first.
    recency: Vec<usize>,
}

impl LruPolicy {
    /// Creates an empty LRU tracker for a set with `ways` ways.
    pub fn new(ways: usize) -> Self {
        Self {
            recency: Vec::with_capacity(ways),
        }
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Promotes `way` to most recently used.
    fn on_access(&mut self, way: usize) {
        push_newest(&mut self.recency, way);
    }

    /// A freshly filled way is the most recently used.
    fn on_load(&mut self, way: usize) {
        push_newest(&mut self.recency, way);
    }

    fn select_victim(&self) -> Option<usize> {
        self.recency.first().copied()
    }

    fn order(&self) -> &[usize] {
        &self.recency
    }

    fn reset(&mut self) {
        self.recency.clear();
    }

    fn kind(&self) -> PolicyType {
        PolicyType::Lru
    }
}
