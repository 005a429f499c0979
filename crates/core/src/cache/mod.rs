//! Set-Associative Cache Simulator.
//!
//! This module implements the cache session engine. A [`Cache`] starts
//! unconfigured; `configure` validates a geometry and builds its sets, after
//! which every access is classified through the address layout, resolved by
//! the set it maps to, and recorded in the session statistics.
//!
//! ```text
//! Unconfigured --configure--> Configured --access/reset--> Configured
//!                                  |
//!                                  +--configure--> Configured' (new geometry)
//! ```
//!
//! A failed configure leaves the session exactly as it was.

/// Cache replacement policy implementations (LRU, FIFO).
pub mod policies;

/// Cache sets and block metadata.
pub mod set;

/// Read-only state views.
pub mod snapshot;

use tracing::{debug, info, trace};

pub use self::set::{AccessOutcome, Block, CacheSet};
pub use self::snapshot::{AccessResult, BlockSnapshot, CacheSnapshot, EvictedBlock, SetSnapshot};
use crate::common::addr::AddressParts;
use crate::common::data::AccessKind;
use crate::common::error::{Result, SimError};
use crate::config::{CacheConfig, CacheGeometry, ConfigureRequest};
use crate::stats::{CacheStats, StatsSnapshot};
use crate::trace::TraceOp;

/// State of a configured session.
#[derive(Debug)]
struct Session {
    geometry: CacheGeometry,
    sets: Vec<CacheSet>,
    stats: CacheStats,
}

impl Session {
    fn new(geometry: CacheGeometry) -> Self {
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.ways(), geometry.policy()))
            .collect();
        Self {
            geometry,
            sets,
            stats: CacheStats::default(),
        }
    }
}

/// One cache simulation session.
///
/// Every mutating method takes `&mut self`; a host that shares a session
/// between threads wraps it in a mutex. Independent sessions share nothing.
///
/// # Examples
///
/// ```
/// use cachesim_core::cache::Cache;
/// use cachesim_core::config::{Associativity, CacheConfig, ReplacementPolicy};
///
/// let config = CacheConfig::new(16, 4, Associativity::Ways(1), ReplacementPolicy::Lru);
/// let mut cache = Cache::with_config(&config).unwrap();
///
/// assert!(!cache.read(0x00).unwrap().hit);
/// assert!(cache.read(0x01).unwrap().hit);
/// assert_eq!(cache.read(0x04).unwrap().set_index, 1);
/// assert_eq!(cache.snapshot_stats().unwrap().accesses, 3);
/// ```
#[derive(Debug, Default)]
pub struct Cache {
    session: Option<Session>,
}

impl Cache {
    /// Creates an unconfigured session.
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Creates a session and configures it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `config` violates a geometry invariant.
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        let mut cache = Self::new();
        let _ = cache.configure(config)?;
        Ok(cache)
    }

    /// Validates `config` and replaces the current geometry with it.
    ///
    /// All blocks start invalid and statistics start at zero. On error the
    /// previous configuration, blocks and statistics are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] naming the failed invariant.
    pub fn configure(&mut self, config: &CacheConfig) -> Result<&CacheGeometry> {
        let geometry = CacheGeometry::new(config).inspect_err(|e| {
            debug!(error = %e, "rejected cache configuration");
        })?;
        info!(%geometry, "cache configured");
        let session = self.session.insert(Session::new(geometry));
        Ok(&session.geometry)
    }

    /// Parses a string-typed front end request and configures from it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if a field fails to parse or the resulting
    /// geometry is invalid.
    pub fn configure_request(&mut self, request: &ConfigureRequest) -> Result<&CacheGeometry> {
        let config = request.to_config()?;
        self.configure(&config)
    }

    /// `true` once a configure has succeeded.
    pub const fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    /// Active geometry, if configured.
    pub fn geometry(&self) -> Option<&CacheGeometry> {
        self.session.as_ref().map(|s| &s.geometry)
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(SimError::NotConfigured)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(SimError::NotConfigured)
    }

    /// Splits `address` using the active layout without touching the cache.
    ///
    /// # Errors
    ///
    /// [`SimError::NotConfigured`] or [`SimError::InvalidAddress`].
    pub fn decompose(&self, address: u64) -> Result<AddressParts> {
        self.session()?.geometry.layout().decompose(address)
    }

    /// Performs one access.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] before a successful configure, and
    /// [`SimError::InvalidAddress`] for addresses beyond the address width.
    /// Neither case changes any state.
    pub fn access(&mut self, address: u64, is_write: bool) -> Result<AccessResult> {
        let session = self.session_mut()?;
        let layout = *session.geometry.layout();
        let parts = layout.decompose(address)?;
        let kind = AccessKind::from_write_flag(is_write);

        let set = &mut session.sets[parts.index];
        let outcome = set.access(parts.tag, is_write);
        session
            .stats
            .record(kind, outcome.hit, outcome.evicted.map(|b| b.dirty));

        let evicted = outcome.evicted.map(|victim| EvictedBlock {
            way: outcome.way,
            tag: victim.tag,
            dirty: victim.dirty,
            block_address: layout.block_address(victim.tag, parts.index),
        });

        trace!(
            address,
            %kind,
            tag = parts.tag,
            set = parts.index,
            way = outcome.way,
            hit = outcome.hit,
            "cache access"
        );
        if let Some(victim) = &evicted {
            debug!(
                set = parts.index,
                way = victim.way,
                tag = victim.tag,
                dirty = victim.dirty,
                "evicted block"
            );
        }

        Ok(AccessResult {
            address,
            kind,
            parts,
            hit: outcome.hit,
            set_index: parts.index,
            way: outcome.way,
            evicted,
            set: set.snapshot(parts.index, &layout),
            stats: session.stats.snapshot(),
        })
    }

    /// Read access.
    ///
    /// # Errors
    ///
    /// See [`Cache::access`].
    pub fn read(&mut self, address: u64) -> Result<AccessResult> {
        self.access(address, false)
    }

    /// Write access.
    ///
    /// # Errors
    ///
    /// See [`Cache::access`].
    pub fn write(&mut self, address: u64) -> Result<AccessResult> {
        self.access(address, true)
    }

    /// Replays `ops` in order, stopping at the first failing access.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Cache::access`]; accesses before it
    /// remain applied.
    pub fn run_trace(&mut self, ops: &[TraceOp]) -> Result<Vec<AccessResult>> {
        ops.iter()
            .map(|op| self.access(op.address, op.kind.is_write()))
            .collect()
    }

    /// Invalidates every block and zeroes statistics, keeping the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] before a successful configure.
    pub fn reset(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session.sets.iter_mut().for_each(CacheSet::clear);
        session.stats.reset();
        info!("cache reset");
        Ok(())
    }

    /// Full read-only view of every set and block.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] before a successful configure.
    pub fn snapshot_state(&self) -> Result<CacheSnapshot> {
        let session = self.session()?;
        let layout = session.geometry.layout();
        Ok(CacheSnapshot {
            geometry: session.geometry,
            sets: session
                .sets
                .iter()
                .enumerate()
                .map(|(index, set)| set.snapshot(index, layout))
                .collect(),
        })
    }

    /// Statistics with derived rates.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] before a successful configure.
    pub fn snapshot_stats(&self) -> Result<StatsSnapshot> {
        Ok(self.session()?.stats.snapshot())
    }

    /// Live view of one set.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] before a successful configure.
    pub fn set(&self, index: usize) -> Result<Option<&CacheSet>> {
        Ok(self.session()?.sets.get(index))
    }
}
