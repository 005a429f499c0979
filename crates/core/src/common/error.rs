//! Error definitions for the cache simulator.
//!
//! This module defines every failure the engine can report. It provides:
//! 1. **Configuration errors:** One variant per geometry invariant, each naming the offending values.
//! 2. **Session errors:** Operations attempted before a successful configure.
//! 3. **Input errors:** Out-of-range or malformed addresses and trace tokens.
//!
//! All errors are synchronous and non-retryable; they describe caller misuse.

use thiserror::Error;

/// A cache configuration that violates one of the geometry invariants.
///
/// Returned by [`CacheGeometry::new`](crate::config::CacheGeometry::new) and
/// anything that validates a configuration on its way to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A size string could not be parsed (e.g. `"12XB"` or `"abc"`).
    #[error("invalid size {input:?}: {reason}")]
    InvalidSize {
        /// The text as supplied.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A size field was zero.
    #[error("{field} must be positive")]
    ZeroSize {
        /// Which field (`"cache size"` or `"block size"`).
        field: &'static str,
    },

    /// A size field was not a power of two.
    #[error("{field} must be a power of two, got {value} bytes")]
    NotPowerOfTwo {
        /// Which field (`"cache size"` or `"block size"`).
        field: &'static str,
        /// The rejected value in bytes.
        value: u64,
    },

    /// The block is bigger than the whole cache.
    #[error("block size ({block} bytes) is larger than cache size ({size} bytes)")]
    BlockLargerThanCache {
        /// Block size in bytes.
        block: u64,
        /// Cache size in bytes.
        size: u64,
    },

    /// An associativity string was neither a positive integer nor `"fully"`.
    #[error("invalid associativity {0:?}: expected a positive integer or \"fully\"")]
    InvalidAssociativity(String),

    /// Associativity of zero ways.
    #[error("associativity must be at least 1 way")]
    ZeroAssociativity,

    /// The number of ways does not divide the number of blocks.
    #[error("associativity ({ways} ways) does not evenly divide the {blocks} blocks in the cache")]
    AssociativityMismatch {
        /// Requested ways per set.
        ways: u64,
        /// Total number of blocks (`size / block`).
        blocks: u64,
    },

    /// The derived set count cannot be indexed with a bit field.
    #[error("resulting set count ({0}) is not a power of two")]
    SetCountNotPowerOfTwo(u64),

    /// More blocks than a session is allowed to model.
    #[error("cache would hold {blocks} blocks; at most {max} are supported")]
    TooManyBlocks {
        /// Requested block count.
        blocks: u64,
        /// Supported maximum.
        max: u64,
    },

    /// Offset and index bits do not fit in the address.
    #[error(
        "address width of {width} bits cannot hold {needed} offset+index bits; cache is too large"
    )]
    AddressTooNarrow {
        /// Configured address width.
        width: u32,
        /// Offset bits plus index bits.
        needed: u32,
    },

    /// Address width other than 32 or 64.
    #[error("unsupported address width {0}: expected 32 or 64")]
    UnsupportedAddressWidth(u32),

    /// A replacement policy name that is not LRU or FIFO.
    #[error("unknown replacement policy {0:?}: expected LRU or FIFO")]
    UnknownPolicy(String),
}

/// Top-level error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The configuration was rejected; the previous one (if any) stays active.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An access, reset or query was attempted before a successful configure.
    #[error("cache is not configured")]
    NotConfigured,

    /// An address that is negative, malformed, or wider than the address width.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The address as supplied (text or hex rendering of the number).
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A trace token that could not be parsed.
    #[error("invalid trace entry #{position} ({token:?}): {reason}")]
    InvalidTrace {
        /// 1-based position of the token in the trace.
        position: usize,
        /// The offending token.
        token: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SimError>;
