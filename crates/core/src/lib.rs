//! Set-associative cache simulator library.
//!
//! This crate models how a hardware cache maps addresses to blocks and which
//! block it evicts, for teaching and visualization. It provides:
//! 1. **Geometry:** Validated size/block/associativity configuration and its tag/index/offset layout.
//! 2. **Engine:** Sets of ways with LRU or FIFO replacement, hit/miss/eviction classification.
//! 3. **Observation:** Read-only snapshots of every set and block, plus running statistics.
//! 4. **Inputs:** Size strings, address text, traces, and generated sample scenarios.
//!
//! Only block metadata (valid, dirty, tag) is modeled; there is no data,
//! timing, or backing store.

/// Common types (address layout, access kinds, errors, sizes).
pub mod common;
/// Cache configuration (defaults, enums, validated geometry).
pub mod config;
/// Cache session engine (sets, blocks, replacement policies, snapshots).
pub mod cache;
/// Sample scenarios generated from a geometry.
pub mod scenarios;
/// Session statistics collection and reporting.
pub mod stats;
/// Address trace parsing.
pub mod trace;

/// Main session type; start with `Cache::new()` and configure it.
pub use crate::cache::{AccessResult, Cache};
/// Error types shared by every operation.
pub use crate::common::{ConfigError, Result, SimError};
/// Configuration types; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::{Associativity, CacheConfig, CacheGeometry, ReplacementPolicy};
