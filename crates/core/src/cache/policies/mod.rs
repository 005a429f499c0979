//! Cache Replacement Policies.
//!
//! Implements the algorithms that pick a victim way in a full cache set.
//! Each set owns one policy instance, so all bookkeeping is per set.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used. Hits refresh recency.
//! - `Fifo`: First-In, First-Out. Only load order matters; hits are ignored.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::config::ReplacementPolicy as PolicyType;

/// Trait for per-set cache replacement policies.
///
/// A policy keeps a total order over the resident ways of one set. The front of
/// the order is the next victim; the back is the most protected way.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Records a hit on `way`.
    fn on_access(&mut self, way: usize);

    /// Records that `way` was just filled (cold fill or reuse after eviction).
    fn on_load(&mut self, way: usize);

    /// Selects the way to evict. Only meaningful once every way is resident;
    /// returns `None` if nothing has been loaded yet.
    fn select_victim(&self) -> Option<usize>;

    /// Resident ways from next victim to most protected.
    fn order(&self) -> &[usize];

    /// Forgets all bookkeeping, as if no way had ever been loaded.
    fn reset(&mut self);

    /// Which policy this is.
    fn kind(&self) -> PolicyType;
}

/// Builds a boxed policy of the requested kind for a set of `ways` ways.
pub fn build(kind: PolicyType, ways: usize) -> Box<dyn ReplacementPolicy + Send + Sync> {
    match kind {
        PolicyType::Lru => Box::new(LruPolicy::new(ways)),
        PolicyType::Fifo => Box::new(FifoPolicy::new(ways)),
    }
}

/// Moves `way` to the back of `order`, inserting it if absent.
fn push_newest(order: &mut Vec<usize>, way: usize) {
    if let Some(pos) = order.iter().position(|&w| w == way) {
        let _ = order.remove(pos);
    }
    order.push(way);
}
