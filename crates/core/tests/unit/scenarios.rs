//! Generated Scenario Tests.
//!
//! Every scenario carries its own expected hit/miss sequence. Replaying it on a
//! freshly configured cache must reproduce that sequence exactly, for every
//! geometry and both policies.

use cachesim_core::Cache;
use cachesim_core::config::{Associativity, CacheConfig, ReplacementPolicy};
use cachesim_core::scenarios::generate;
use rstest::rstest;

use crate::common::harness::init_tracing;

fn names(config: &CacheConfig) -> Vec<&'static str> {
    let cache = Cache::with_config(config).unwrap();
    generate(cache.geometry().unwrap())
        .iter()
        .map(|s| s.name)
        .collect()
}

#[rstest]
#[case(1024, 64, Associativity::Ways(1))]
#[case(16, 4, Associativity::Ways(2))]
#[case(16, 4, Associativity::Fully)]
#[case(32, 8, Associativity::Ways(4))]
#[case(4, 4, Associativity::Ways(1))]
#[case(4096, 1, Associativity::Ways(8))]
#[case(256, 16, Associativity::Ways(4))]
fn replay_matches_expectations(
    #[case] size: u64,
    #[case] block: u64,
    #[case] assoc: Associativity,
    #[values(ReplacementPolicy::Lru, ReplacementPolicy::Fifo)] policy: ReplacementPolicy,
) {
    init_tracing();
    let config = CacheConfig::new(size, block, assoc, policy);
    let mut cache = Cache::with_config(&config).unwrap();
    let scenarios = generate(cache.geometry().unwrap());
    assert!(!scenarios.is_empty());

    for scenario in scenarios {
        cache.reset().unwrap();
        let results = cache.run_trace(&scenario.ops()).unwrap();
        let observed: Vec<bool> = results.iter().map(|r| r.hit).collect();
        assert_eq!(observed, scenario.expected_hits(), "{}", scenario.name);

        for (step, result) in scenario.steps.iter().zip(&results) {
            assert_eq!(step.parts, result.parts, "{}: {}", scenario.name, step.note);
        }
    }
}

#[test]
fn direct_mapped_has_no_policy_contrast() {
    let config = CacheConfig::default();
    let names = names(&config);
    assert!(!names.contains(&"policy-contrast"));
    assert!(names.contains(&"conflict"));
}

#[test]
fn associative_caches_get_every_scenario() {
    let config = CacheConfig::new(16, 4, Associativity::Ways(2), ReplacementPolicy::Lru);
    assert_eq!(
        names(&config),
        vec!["spatial-locality", "conflict", "policy-contrast", "dirty-eviction"]
    );
}

/// The last step of the policy contrast differs between LRU and FIFO.
#[test]
fn policy_contrast_outcome_depends_on_policy() {
    let last_hit = |policy| {
        let config = CacheConfig::new(16, 4, Associativity::Fully, policy);
        let cache = Cache::with_config(&config).unwrap();
        let scenario = generate(cache.geometry().unwrap())
            .into_iter()
            .find(|s| s.name == "policy-contrast")
            .unwrap();
        scenario.steps.last().unwrap().expect_hit
    };
    assert!(last_hit(ReplacementPolicy::Lru));
    assert!(!last_hit(ReplacementPolicy::Fifo));
}

#[test]
fn dirty_eviction_ends_with_dirty_victim() {
    let config = CacheConfig::new(32, 8, Associativity::Ways(2), ReplacementPolicy::Fifo);
    let mut cache = Cache::with_config(&config).unwrap();
    let scenario = generate(cache.geometry().unwrap())
        .into_iter()
        .find(|s| s.name == "dirty-eviction")
        .unwrap();
    let results = cache.run_trace(&scenario.ops()).unwrap();
    let last = results.last().unwrap();
    assert!(last.evicted.unwrap().dirty);
    assert_eq!(last.stats.dirty_evictions, 1);
}
