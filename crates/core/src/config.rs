//! Configuration for the cache simulator.
//!
//! This module defines the structures used to parameterize a cache session. It provides:
//! 1. **Defaults:** Baseline geometry (1 KiB, 64-byte blocks, direct mapped, LRU, 32-bit addresses).
//! 2. **Structures:** `CacheConfig` (typed) and `ConfigureRequest` (string fields from a front end).
//! 3. **Validation:** `CacheGeometry`, the checked configuration plus its derived bit layout.
//! 4. **Enums:** Replacement policy and associativity.
//!
//! Configuration is supplied as JSON by a host, as command line flags by the CLI,
//! or with `CacheConfig::default()`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::addr::{AddressLayout, AddressWidth};
use crate::common::error::ConfigError;
use crate::common::size::{format_size, parse_size};

/// Default configuration constants.
mod defaults {
    /// Default cache size in bytes (1 KiB).
    pub const SIZE_BYTES: u64 = 1024;

    /// Default block (line) size in bytes.
    pub const BLOCK_BYTES: u64 = 64;

    /// Default associativity (1 way = direct mapped).
    pub const WAYS: u64 = 1;

    /// Upper bound on the number of blocks a session may model.
    ///
    /// Every block is materialized for snapshots, so geometries beyond this
    /// are rejected rather than allocated.
    pub const MAX_BLOCKS: u64 = 1 << 22;
}

/// Cache replacement policy algorithms.
///
/// Selects which resident block to evict when a miss lands in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the block that was touched least recently; hits refresh recency.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// First In First Out replacement policy.
    ///
    /// Evicts the block that was loaded earliest; hits do not change the order.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(Self::Lru),
            "FIFO" => Ok(Self::Fifo),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lru => write!(f, "LRU"),
            Self::Fifo => write!(f, "FIFO"),
        }
    }
}

/// Number of ways per set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AssociativityRepr", into = "AssociativityRepr")]
pub enum Associativity {
    /// `n`-way set associative; `Ways(1)` is direct mapped.
    Ways(u64),
    /// A single set holding every block.
    Fully,
}

impl Associativity {
    /// Direct-mapped cache (one way per set).
    pub const DIRECT: Self = Self::Ways(defaults::WAYS);
}

impl Default for Associativity {
    fn default() -> Self {
        Self::DIRECT
    }
}

impl FromStr for Associativity {
    type Err = ConfigError;

    /// Accepts a positive integer or `"fully"` (any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("fully") || text.eq_ignore_ascii_case("full") {
            return Ok(Self::Fully);
        }
        text.parse::<u64>()
            .map(Self::Ways)
            .map_err(|_| ConfigError::InvalidAssociativity(s.to_string()))
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ways(1) => write!(f, "direct mapped"),
            Self::Ways(n) => write!(f, "{n}-way"),
            Self::Fully => write!(f, "fully associative"),
        }
    }
}

/// Wire form of [`Associativity`]: a number (`4`) or a string (`"4"`, `"fully"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AssociativityRepr {
    Ways(u64),
    Text(String),
}

impl TryFrom<AssociativityRepr> for Associativity {
    type Error = ConfigError;

    fn try_from(repr: AssociativityRepr) -> Result<Self, Self::Error> {
        match repr {
            AssociativityRepr::Ways(n) => Ok(Self::Ways(n)),
            AssociativityRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Associativity> for AssociativityRepr {
    fn from(assoc: Associativity) -> Self {
        match assoc {
            Associativity::Ways(n) => Self::Ways(n),
            Associativity::Fully => Self::Text("fully".to_string()),
        }
    }
}

/// Typed cache configuration.
///
/// Not validated on construction; pass it to [`CacheGeometry::new`] (or
/// [`Cache::configure`](crate::cache::Cache::configure)) to check the invariants.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Associativity, CacheConfig, ReplacementPolicy};
///
/// let json = r#"{ "size_bytes": 32, "block_bytes": 8, "associativity": 2, "policy": "FIFO" }"#;
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.associativity, Associativity::Ways(2));
/// assert_eq!(config.policy, ReplacementPolicy::Fifo);
/// assert_eq!(config.address_width.bits(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total cache capacity in bytes.
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: u64,

    /// Block (line) size in bytes.
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: u64,

    /// Ways per set.
    #[serde(default)]
    pub associativity: Associativity,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Width of the simulated address space.
    #[serde(default)]
    pub address_width: AddressWidth,
}

impl CacheConfig {
    /// Creates a configuration with a 32-bit address space.
    pub const fn new(
        size_bytes: u64,
        block_bytes: u64,
        associativity: Associativity,
        policy: ReplacementPolicy,
    ) -> Self {
        Self {
            size_bytes,
            block_bytes,
            associativity,
            policy,
            address_width: AddressWidth::Bits32,
        }
    }

    /// Returns a copy with a different address width.
    #[must_use]
    pub const fn with_address_width(mut self, width: AddressWidth) -> Self {
        self.address_width = width;
        self
    }

    /// Returns the default cache size in bytes.
    const fn default_size() -> u64 {
        defaults::SIZE_BYTES
    }

    /// Returns the default block size in bytes.
    const fn default_block() -> u64 {
        defaults::BLOCK_BYTES
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(
            defaults::SIZE_BYTES,
            defaults::BLOCK_BYTES,
            Associativity::default(),
            ReplacementPolicy::default(),
        )
    }
}

/// Configure request as sent by a front end: sizes and policy are strings.
///
/// ```
/// use cachesim_core::config::ConfigureRequest;
///
/// let json = r#"{ "size": "1KB", "blockSize": "64B", "associativity": "fully", "policy": "LRU" }"#;
/// let request: ConfigureRequest = serde_json::from_str(json).unwrap();
/// let config = request.to_config().unwrap();
/// assert_eq!(config.size_bytes, 1024);
/// assert_eq!(config.block_bytes, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    /// Total size, e.g. `"1KB"`.
    pub size: String,
    /// Block size, e.g. `"64B"`.
    #[serde(alias = "block_size")]
    pub block_size: String,
    /// `"1"`, `"2"`, ... or `"fully"`.
    #[serde(default)]
    pub associativity: Associativity,
    /// `"LRU"` or `"FIFO"`.
    #[serde(default = "ConfigureRequest::default_policy")]
    pub policy: String,
    /// Optional address width (32 or 64).
    #[serde(default, alias = "address_width")]
    pub address_width: AddressWidth,
}

impl ConfigureRequest {
    /// Parses the string fields into a typed [`CacheConfig`].
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first field that fails to parse.
    /// Geometry invariants are not checked here.
    pub fn to_config(&self) -> Result<CacheConfig, ConfigError> {
        Ok(CacheConfig {
            size_bytes: parse_size(&self.size)?,
            block_bytes: parse_size(&self.block_size)?,
            associativity: self.associativity,
            policy: self.policy.parse()?,
            address_width: self.address_width,
        })
    }

    fn default_policy() -> String {
        ReplacementPolicy::default().to_string()
    }
}

impl TryFrom<&ConfigureRequest> for CacheConfig {
    type Error = ConfigError;

    fn try_from(request: &ConfigureRequest) -> Result<Self, Self::Error> {
        request.to_config()
    }
}

/// A validated configuration and everything derived from it.
///
/// This is the normalized form returned to callers after a successful
/// configure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Associativity, CacheConfig, CacheGeometry, ReplacementPolicy};
///
/// let config = CacheConfig::new(32, 8, Associativity::Ways(2), ReplacementPolicy::Lru);
/// let geometry = CacheGeometry::new(&config).unwrap();
/// assert_eq!(geometry.num_sets(), 2);
/// assert_eq!(geometry.offset_bits(), 3);
/// assert_eq!(geometry.index_bits(), 1);
/// assert_eq!(geometry.tag_bits(), 28);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheGeometry {
    #[serde(flatten)]
    config: CacheConfig,
    num_sets: usize,
    ways: usize,
    total_blocks: u64,
    offset_bits: u32,
    index_bits: u32,
    tag_bits: u32,
    #[serde(skip)]
    layout: AddressLayout,
}

impl CacheGeometry {
    /// Validates `config` and derives the set count and address layout.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] for the first invariant that fails, checked
    /// in this order: positive sizes, power-of-two sizes, block not larger than
    /// the cache, non-zero associativity dividing the block count, power-of-two
    /// set count, model size bound, offset+index bits fitting the address width.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let size = config.size_bytes;
        let block = config.block_bytes;

        for (field, value) in [("cache size", size), ("block size", block)] {
            if value == 0 {
                return Err(ConfigError::ZeroSize { field });
            }
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { field, value });
            }
        }
        if block > size {
            return Err(ConfigError::BlockLargerThanCache { block, size });
        }

        let total_blocks = size / block;
        let ways = match config.associativity {
            Associativity::Fully => total_blocks,
            Associativity::Ways(0) => return Err(ConfigError::ZeroAssociativity),
            Associativity::Ways(n) => n,
        };
        if total_blocks % ways != 0 {
            return Err(ConfigError::AssociativityMismatch {
                ways,
                blocks: total_blocks,
            });
        }

        let num_sets = total_blocks / ways;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(num_sets));
        }
        if total_blocks > defaults::MAX_BLOCKS {
            return Err(ConfigError::TooManyBlocks {
                blocks: total_blocks,
                max: defaults::MAX_BLOCKS,
            });
        }

        let layout =
            AddressLayout::new(config.address_width, block.trailing_zeros(), num_sets.trailing_zeros())?;

        Ok(Self {
            config: *config,
            num_sets: num_sets as usize,
            ways: ways as usize,
            total_blocks,
            offset_bits: layout.offset_bits(),
            index_bits: layout.index_bits(),
            tag_bits: layout.tag_bits(),
            layout,
        })
    }

    /// The configuration this geometry was derived from.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Total capacity in bytes.
    pub const fn size_bytes(&self) -> u64 {
        self.config.size_bytes
    }

    /// Block size in bytes.
    pub const fn block_bytes(&self) -> u64 {
        self.config.block_bytes
    }

    /// Replacement policy used by every set.
    pub const fn policy(&self) -> ReplacementPolicy {
        self.config.policy
    }

    /// Width of the address space.
    pub const fn address_width(&self) -> AddressWidth {
        self.config.address_width
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Blocks in the whole cache (`num_sets * ways`).
    pub const fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// `log2(block_bytes)`.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// `log2(num_sets)`.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// `address_width - index_bits - offset_bits`.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Address layout used to decompose addresses.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Distance in bytes between consecutive addresses that map to the same set
    /// with different tags (`num_sets * block_bytes`).
    pub const fn set_stride(&self) -> u64 {
        self.num_sets as u64 * self.config.block_bytes
    }

    /// `true` for one way per set.
    pub const fn is_direct_mapped(&self) -> bool {
        self.ways == 1
    }

    /// `true` for a single set.
    pub const fn is_fully_associative(&self) -> bool {
        self.num_sets == 1
    }
}

impl fmt::Display for CacheGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cache, {} blocks, {} ({} sets x {} ways), {}, {} addresses (tag {} | index {} | offset {})",
            format_size(self.size_bytes()),
            format_size(self.block_bytes()),
            Associativity::Ways(self.ways as u64),
            self.num_sets,
            self.ways,
            self.policy(),
            self.address_width(),
            self.tag_bits,
            self.index_bits,
            self.offset_bits,
        )
    }
}
