//! Sample scenarios derived from a geometry.
//!
//! Each scenario is built from the formal decomposition of the active
//! geometry, so its addresses really do land where its narrative says. The
//! expected hit/miss sequence is computed alongside and is checked by replaying
//! the scenario on a fresh cache.

use serde::Serialize;

use crate::common::addr::AddressParts;
use crate::config::{CacheGeometry, ReplacementPolicy};
use crate::trace::TraceOp;

/// One access of a scenario with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioStep {
    /// The access.
    pub op: TraceOp,
    /// Where the address lands.
    pub parts: AddressParts,
    /// Expected outcome on a freshly configured cache.
    pub expect_hit: bool,
    /// Human-readable explanation.
    pub note: String,
}

/// A named, self-describing trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Short identifier.
    pub name: &'static str,
    /// What the scenario demonstrates.
    pub description: String,
    /// Accesses in order.
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// The accesses without annotations.
    pub fn ops(&self) -> Vec<TraceOp> {
        self.steps.iter().map(|s| s.op).collect()
    }

    /// Expected hit flags.
    pub fn expected_hits(&self) -> Vec<bool> {
        self.steps.iter().map(|s| s.expect_hit).collect()
    }
}

/// Incrementally builds a scenario; drops it if any address falls outside the
/// address space.
struct Builder<'g> {
    geometry: &'g CacheGeometry,
    steps: Vec<ScenarioStep>,
    fits: bool,
}

impl<'g> Builder<'g> {
    const fn new(geometry: &'g CacheGeometry) -> Self {
        Self {
            geometry,
            steps: Vec::new(),
            fits: true,
        }
    }

    fn step(&mut self, op: TraceOp, expect_hit: bool, why: &str) {
        let Ok(parts) = self.geometry.layout().decompose(op.address) else {
            self.fits = false;
            return;
        };
        let outcome = if expect_hit { "hit" } else { "miss" };
        self.steps.push(ScenarioStep {
            op,
            parts,
            expect_hit,
            note: format!(
                "{op} -> tag {:#x}, set {}, offset {}: {outcome} ({why})",
                parts.tag, parts.index, parts.offset
            ),
        });
    }

    /// `true` when tags up to `max_tag` can be represented.
    fn tags_fit(&self, max_tag: u64) -> bool {
        max_tag
            .checked_shr(self.geometry.tag_bits())
            .is_none_or(|high| high == 0)
    }

    /// Address of tag `tag` in set 0, offset `offset`.
    fn addr(&self, tag: u64, offset: u64) -> u64 {
        self.geometry.layout().compose(AddressParts {
            tag,
            index: 0,
            offset,
        })
    }

    fn finish(self, name: &'static str, description: String) -> Option<Scenario> {
        self.fits.then(|| Scenario {
            name,
            description,
            steps: self.steps,
        })
    }
}

/// Generates every scenario that makes sense for `geometry`.
///
/// The policy contrast scenario needs at least two ways and is omitted for
/// direct-mapped caches.
pub fn generate(geometry: &CacheGeometry) -> Vec<Scenario> {
    [
        spatial_locality(geometry),
        conflict(geometry),
        policy_contrast(geometry),
        dirty_eviction(geometry),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn spatial_locality(geometry: &CacheGeometry) -> Option<Scenario> {
    let block = geometry.block_bytes();
    let survives = geometry.total_blocks() >= 2;
    let mut b = Builder::new(geometry);
    b.step(TraceOp::read(0), false, "cold start");
    b.step(TraceOp::read(block - 1), true, "same block, last byte");
    b.step(TraceOp::read(block), false, "next block is a different block");
    let why = if survives {
        "first block is still resident"
    } else {
        "the only block was replaced"
    };
    b.step(TraceOp::read(block / 2), survives, why);
    b.finish(
        "spatial-locality",
        format!(
            "Bytes 0..{} share one {block}-byte block; address {block} starts the next block.",
            block - 1
        ),
    )
}

fn conflict(geometry: &CacheGeometry) -> Option<Scenario> {
    let ways = geometry.ways() as u64;
    let mut b = Builder::new(geometry);
    if !b.tags_fit(ways) {
        return None;
    }
    for tag in 0..ways {
        let why = if tag == 0 { "cold start" } else { "fills a free way" };
        b.step(TraceOp::read(b.addr(tag, 0)), false, why);
    }
    b.step(
        TraceOp::read(b.addr(ways, 0)),
        false,
        "set 0 is full, evicts tag 0x0",
    );
    b.step(
        TraceOp::read(b.addr(0, 0)),
        false,
        "tag 0x0 was evicted, conflict miss",
    );
    b.finish(
        "conflict",
        format!(
            "{} blocks {} bytes apart all map to set 0, which has {ways} way(s).",
            ways + 1,
            geometry.set_stride()
        ),
    )
}

fn policy_contrast(geometry: &CacheGeometry) -> Option<Scenario> {
    let ways = geometry.ways() as u64;
    if ways < 2 {
        return None;
    }
    let lru = geometry.policy() == ReplacementPolicy::Lru;
    let mut b = Builder::new(geometry);
    if !b.tags_fit(ways) {
        return None;
    }
    for tag in 0..ways {
        b.step(TraceOp::read(b.addr(tag, 0)), false, "fills set 0");
    }
    b.step(TraceOp::read(b.addr(0, 0)), true, "tag 0x0 touched again");
    let victim = if lru {
        "LRU evicts tag 0x1, the least recently used"
    } else {
        "FIFO evicts tag 0x0, the first loaded, despite the hit"
    };
    b.step(TraceOp::read(b.addr(ways, 0)), false, victim);
    let again = if lru {
        "tag 0x0 survived under LRU"
    } else {
        "tag 0x0 was evicted under FIFO"
    };
    b.step(TraceOp::read(b.addr(0, 0)), lru, again);
    b.finish(
        "policy-contrast",
        format!(
            "Fill set 0, hit the oldest block, then force one eviction. Running with {}.",
            geometry.policy()
        ),
    )
}

fn dirty_eviction(geometry: &CacheGeometry) -> Option<Scenario> {
    let ways = geometry.ways() as u64;
    let mut b = Builder::new(geometry);
    if !b.tags_fit(ways) {
        return None;
    }
    b.step(TraceOp::write(b.addr(0, 0)), false, "write miss loads a dirty block");
    for tag in 1..=ways {
        let why = if tag == ways {
            "evicts dirty tag 0x0 (reported, not written back)"
        } else {
            "fills a free way"
        };
        b.step(TraceOp::read(b.addr(tag, 0)), false, why);
    }
    b.finish(
        "dirty-eviction",
        "A written block is pushed out of set 0; the eviction is flagged dirty.".to_string(),
    )
}
