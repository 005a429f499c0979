//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the way that was filled earliest, regardless of how
//! recently it was hit. Arrival order is fixed when a way is loaded; hits
//! never reorder it. That is the behavioral difference from LRU.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(1) (no-op)
//!   - `on_load()`: O(W) where W is the number of ways
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Streaming accesses where every block is touched once
//! - **Worst Case:** A hot block that keeps getting evicted despite frequent hits

use super::{ReplacementPolicy, push_newest};
use crate::config::ReplacementPolicy as PolicyType;

/// FIFO state for one set.
#[derive(Debug, Clone)]
pub struct FifoPolicy {
    /// Resident ways in arrival order, oldest first.
    arrivals: Vec<usize>,
}

impl FifoPolicy {
    /// Creates an empty FIFO tracker for a set with `ways` ways.
    pub fn new(ways: usize) -> Self {
        Self {
            arrivals: Vec::with_capacity(ways),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Hits do not affect arrival order.
    fn on_access(&mut self, _way: usize) {}

    /// Appends `way` as the newest arrival.
    fn on_load(&mut self, way: usize) {
        push_newest(&mut self.arrivals, way);
    }

    fn select_victim(&self) -> Option<usize> {
        self.arrivals.first().copied()
    }

    fn order(&self) -> &[usize] {
        &self.arrivals
    }

    fn reset(&mut self) {
        self.arrivals.clear();
    }

    fn kind(&self) -> PolicyType {
        PolicyType::Fifo
    }
}
