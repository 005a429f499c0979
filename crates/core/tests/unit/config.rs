//! Configuration Tests.
//!
//! Verifies geometry derivation for valid configurations, the order in which
//! invalid configurations are rejected, and the JSON shapes a front end sends.

use cachesim_core::common::{AddressWidth, ConfigError};
use cachesim_core::config::{
    Associativity, CacheConfig, CacheGeometry, ConfigureRequest, ReplacementPolicy,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn geometry(size: u64, block: u64, assoc: Associativity) -> Result<CacheGeometry, ConfigError> {
    CacheGeometry::new(&CacheConfig::new(size, block, assoc, ReplacementPolicy::Lru))
}

// ══════════════════════════════════════════════════════════
// 1. Derived Geometry
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1024, 64, Associativity::Ways(1), 16, 1, 6, 4, 22)]
#[case(16, 4, Associativity::Ways(2), 2, 2, 2, 1, 29)]
#[case(16, 4, Associativity::Fully, 1, 4, 2, 0, 30)]
#[case(32, 8, Associativity::Ways(4), 1, 4, 3, 0, 29)]
#[case(8, 8, Associativity::Ways(1), 1, 1, 3, 0, 29)]
#[case(4096, 1, Associativity::Ways(8), 512, 8, 0, 9, 23)]
fn derives_layout(
    #[case] size: u64,
    #[case] block: u64,
    #[case] assoc: Associativity,
    #[case] sets: usize,
    #[case] ways: usize,
    #[case] offset_bits: u32,
    #[case] index_bits: u32,
    #[case] tag_bits: u32,
) {
    let g = geometry(size, block, assoc).unwrap();
    assert_eq!(g.num_sets(), sets);
    assert_eq!(g.ways(), ways);
    assert_eq!(g.offset_bits(), offset_bits);
    assert_eq!(g.index_bits(), index_bits);
    assert_eq!(g.tag_bits(), tag_bits);
    assert_eq!(g.num_sets() as u64 * g.ways() as u64 * block, size);
}

/// Ways equal to the block count is the same geometry as `Fully`.
#[test]
fn max_ways_is_fully_associative() {
    let by_count = geometry(64, 8, Associativity::Ways(8)).unwrap();
    let by_name = geometry(64, 8, Associativity::Fully).unwrap();
    assert_eq!(by_count.num_sets(), by_name.num_sets());
    assert_eq!(by_count.ways(), by_name.ways());
    assert!(by_count.is_fully_associative());
    assert!(!by_count.is_direct_mapped());
}

#[test]
fn set_stride_is_sets_times_block() {
    let g = geometry(1024, 64, Associativity::Ways(2)).unwrap();
    assert_eq!(g.set_stride(), 8 * 64);
}

#[test]
fn display_summarizes_geometry() {
    let g = CacheGeometry::new(&CacheConfig::default()).unwrap();
    assert_eq!(
        g.to_string(),
        "1KB cache, 64B blocks, direct mapped (16 sets x 1 ways), LRU, 32-bit addresses \
         (tag 22 | index 4 | offset 6)"
    );
}

#[test]
fn wide_address_space_adds_tag_bits() {
    let config = CacheConfig::default().with_address_width(AddressWidth::Bits64);
    let g = CacheGeometry::new(&config).unwrap();
    assert_eq!(g.tag_bits(), 54);
}

// ══════════════════════════════════════════════════════════
// 2. Rejected Configurations
// ══════════════════════════════════════════════════════════

#[test]
fn rejects_zero_sizes() {
    assert_eq!(
        geometry(0, 64, Associativity::DIRECT).unwrap_err(),
        ConfigError::ZeroSize {
            field: "cache size"
        }
    );
    assert_eq!(
        geometry(1024, 0, Associativity::DIRECT).unwrap_err(),
        ConfigError::ZeroSize {
            field: "block size"
        }
    );
}

#[test]
fn rejects_non_power_of_two_sizes() {
    assert_eq!(
        geometry(1000, 64, Associativity::DIRECT).unwrap_err(),
        ConfigError::NotPowerOfTwo {
            field: "cache size",
            value: 1000
        }
    );
    assert_eq!(
        geometry(1024, 48, Associativity::DIRECT).unwrap_err(),
        ConfigError::NotPowerOfTwo {
            field: "block size",
            value: 48
        }
    );
}

#[test]
fn rejects_block_larger_than_cache() {
    assert_eq!(
        geometry(64, 128, Associativity::DIRECT).unwrap_err(),
        ConfigError::BlockLargerThanCache {
            block: 128,
            size: 64
        }
    );
}

#[test]
fn rejects_bad_associativity() {
    assert_eq!(
        geometry(64, 8, Associativity::Ways(0)).unwrap_err(),
        ConfigError::ZeroAssociativity
    );
    assert_eq!(
        geometry(64, 8, Associativity::Ways(3)).unwrap_err(),
        ConfigError::AssociativityMismatch { ways: 3, blocks: 8 }
    );
    assert_eq!(
        geometry(64, 8, Associativity::Ways(16)).unwrap_err(),
        ConfigError::AssociativityMismatch {
            ways: 16,
            blocks: 8
        }
    );
}

#[test]
fn rejects_models_with_too_many_blocks() {
    let err = geometry(1 << 30, 1, Associativity::DIRECT).unwrap_err();
    assert!(matches!(err, ConfigError::TooManyBlocks { blocks, .. } if blocks == 1 << 30));
}

/// Size is checked before block size, so both errors report the size.
#[test]
fn first_failing_invariant_wins() {
    assert_eq!(
        geometry(0, 0, Associativity::Ways(0)).unwrap_err(),
        ConfigError::ZeroSize {
            field: "cache size"
        }
    );
    assert_eq!(
        geometry(100, 0, Associativity::Ways(0)).unwrap_err(),
        ConfigError::NotPowerOfTwo {
            field: "cache size",
            value: 100
        }
    );
}

// ══════════════════════════════════════════════════════════
// 3. Enums and Requests
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("LRU", ReplacementPolicy::Lru)]
#[case("lru", ReplacementPolicy::Lru)]
#[case(" Fifo ", ReplacementPolicy::Fifo)]
fn parses_policy_names(#[case] input: &str, #[case] expected: ReplacementPolicy) {
    assert_eq!(input.parse::<ReplacementPolicy>().unwrap(), expected);
}

#[test]
fn rejects_unknown_policy() {
    assert_eq!(
        "RANDOM".parse::<ReplacementPolicy>().unwrap_err(),
        ConfigError::UnknownPolicy("RANDOM".to_string())
    );
}

#[rstest]
#[case("1", Associativity::Ways(1))]
#[case("4", Associativity::Ways(4))]
#[case("fully", Associativity::Fully)]
#[case("FULLY", Associativity::Fully)]
fn parses_associativity(#[case] input: &str, #[case] expected: Associativity) {
    assert_eq!(input.parse::<Associativity>().unwrap(), expected);
}

#[test]
fn rejects_unparseable_associativity() {
    assert_eq!(
        "two".parse::<Associativity>().unwrap_err(),
        ConfigError::InvalidAssociativity("two".to_string())
    );
}

#[test]
fn config_json_uses_defaults_for_missing_fields() {
    let config: CacheConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, CacheConfig::default());
}

#[test]
fn associativity_accepts_number_or_text() {
    let numeric: CacheConfig = serde_json::from_str(r#"{"associativity": 2}"#).unwrap();
    let textual: CacheConfig = serde_json::from_str(r#"{"associativity": "2"}"#).unwrap();
    let fully: CacheConfig = serde_json::from_str(r#"{"associativity": "fully"}"#).unwrap();
    assert_eq!(numeric.associativity, Associativity::Ways(2));
    assert_eq!(textual.associativity, Associativity::Ways(2));
    assert_eq!(fully.associativity, Associativity::Fully);
    assert!(serde_json::from_str::<CacheConfig>(r#"{"associativity": "many"}"#).is_err());
}

#[test]
fn configure_request_parses_strings() {
    let json = r#"{"size": "16B", "blockSize": "4B", "associativity": 2, "policy": "fifo"}"#;
    let request: ConfigureRequest = serde_json::from_str(json).unwrap();
    let config = CacheConfig::try_from(&request).unwrap();
    assert_eq!(
        config,
        CacheConfig::new(16, 4, Associativity::Ways(2), ReplacementPolicy::Fifo)
    );
}

#[test]
fn configure_request_defaults_policy_and_ways() {
    let json = r#"{"size": "1KB", "block_size": "64"}"#;
    let request: ConfigureRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.policy, "LRU");
    let config = request.to_config().unwrap();
    assert_eq!(config, CacheConfig::default());
}

#[test]
fn configure_request_reports_bad_fields() {
    let request = ConfigureRequest {
        size: "1KB".to_string(),
        block_size: "64B".to_string(),
        associativity: Associativity::DIRECT,
        policy: "MRU".to_string(),
        address_width: AddressWidth::Bits32,
    };
    assert_eq!(
        request.to_config().unwrap_err(),
        ConfigError::UnknownPolicy("MRU".to_string())
    );
}

#[test]
fn geometry_serializes_flat() {
    let g = geometry(16, 4, Associativity::Ways(2)).unwrap();
    let value = serde_json::to_value(g).unwrap();
    assert_eq!(value["size_bytes"], 16);
    assert_eq!(value["num_sets"], 2);
    assert_eq!(value["policy"], "LRU");
    assert_eq!(value["associativity"], 2);
    assert_eq!(value["address_width"], 32);
}
