//! Cache statistics collection and reporting.
//!
//! This module tracks the counters of one simulation session. It provides:
//! 1. **Counters:** Accesses, hits, misses and evictions.
//! 2. **Access mix:** Reads versus writes, and how many evictions displaced a dirty block.
//! 3. **Derived metrics:** Hit and miss rates.
//!
//! Counters only grow within a session; they are zeroed by reset or reconfigure.

use std::fmt;

use serde::Serialize;

use crate::common::data::AccessKind;

/// Running counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total accesses presented to the cache.
    pub accesses: u64,
    /// Accesses that found their tag resident.
    pub hits: u64,
    /// Accesses that had to load a block.
    pub misses: u64,
    /// Misses that displaced a resident block.
    pub evictions: u64,
    /// Evictions whose victim was dirty.
    pub dirty_evictions: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,
}

impl CacheStats {
    /// Records one access.
    ///
    /// `evicted_dirty` is `None` when nothing was evicted, otherwise the dirty
    /// bit of the victim.
    pub const fn record(&mut self, kind: AccessKind, hit: bool, evicted_dirty: Option<bool>) {
        self.accesses += 1;
        match kind {
            AccessKind::Read => self.reads += 1,
            AccessKind::Write => self.writes += 1,
        }
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        if let Some(dirty) = evicted_dirty {
            self.evictions += 1;
            if dirty {
                self.dirty_evictions += 1;
            }
        }
    }

    /// `hits / accesses`, or 0 before the first access.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses)
    }

    /// `misses / accesses`, or 0 before the first access.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses, self.accesses)
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Counters plus derived rates.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accesses: self.accesses,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            dirty_evictions: self.dirty_evictions,
            reads: self.reads,
            writes: self.writes,
            hit_rate: self.hit_rate(),
            miss_rate: self.miss_rate(),
        }
    }
}

/// Statistics as reported to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Total accesses.
    pub accesses: u64,
    /// Hits.
    pub hits: u64,
    /// Misses.
    pub misses: u64,
    /// Evictions.
    pub evictions: u64,
    /// Evictions of dirty blocks.
    pub dirty_evictions: u64,
    /// Reads.
    pub reads: u64,
    /// Writes.
    pub writes: u64,
    /// `hits / accesses` (0 when empty).
    pub hit_rate: f64,
    /// `misses / accesses` (0 when empty).
    pub miss_rate: f64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "accesses        {}", self.accesses)?;
        writeln!(f, "  reads         {}", self.reads)?;
        writeln!(f, "  writes        {}", self.writes)?;
        writeln!(f, "hits            {}", self.hits)?;
        writeln!(f, "misses          {}", self.misses)?;
        writeln!(
            f,
            "evictions       {} ({} dirty)",
            self.evictions, self.dirty_evictions
        )?;
        writeln!(f, "hit_rate        {:.2}%", self.hit_rate * 100.0)?;
        write!(f, "miss_rate       {:.2}%", self.miss_rate * 100.0)
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
