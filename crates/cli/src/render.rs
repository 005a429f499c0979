//! Text rendering of engine results for the terminal.
//!
//! JSON output bypasses this module entirely and serializes the engine types
//! with `serde_json`.

use std::fmt::Write as _;

use cachesim_core::cache::{AccessResult, CacheSnapshot, SetSnapshot};
use cachesim_core::config::CacheGeometry;

/// One line per access: outcome, decomposition, and any eviction.
///
/// ```text
/// 0x20        R  MISS  tag 0x2  set 0  offset 0  -> way 1
/// 0x10        R  MISS  tag 0x1  set 0  offset 0  -> way 0  evicted tag 0x0 @0x0
/// ```
pub fn access_line(result: &AccessResult) -> String {
    let mut line = format!(
        "{:<10}  {}  {:<4}  tag {:#x}  set {}  offset {}  -> way {}",
        format!("{:#x}", result.address),
        result.kind,
        if result.hit { "HIT" } else { "MISS" },
        result.parts.tag,
        result.set_index,
        result.parts.offset,
        result.way,
    );
    if let Some(victim) = &result.evicted {
        let _ = write!(
            line,
            "  evicted tag {:#x} @{:#x}{}",
            victim.tag,
            victim.block_address,
            if victim.dirty { " (dirty)" } else { "" }
        );
    }
    line
}

fn set_line(set: &SetSnapshot) -> String {
    let mut line = format!("set {:>3}:", set.index);
    for block in &set.blocks {
        match block.block_address {
            Some(addr) if block.valid => {
                let _ = write!(
                    line,
                    "  [{}] {}tag {:#x} @{addr:#x}",
                    block.way,
                    if block.dirty { "D " } else { "" },
                    block.tag
                );
            }
            _ => {
                let _ = write!(line, "  [{}] -", block.way);
            }
        }
    }
    if let Some(victim) = set.next_victim() {
        let _ = write!(line, "  next victim: way {victim}");
    }
    line
}

/// Every set, one per line. Sets with no resident block are folded into a
/// count at the end when `skip_empty` is set.
pub fn state_table(snapshot: &CacheSnapshot, skip_empty: bool) -> String {
    let mut out = String::new();
    let mut empty = 0usize;
    for set in &snapshot.sets {
        if skip_empty && set.occupancy() == 0 {
            empty += 1;
            continue;
        }
        out.push_str(&set_line(set));
        out.push('\n');
    }
    if empty > 0 {
        let _ = writeln!(out, "({empty} empty sets not shown)");
    }
    out
}

/// Geometry summary with the bit layout spelled out.
pub fn geometry_block(geometry: &CacheGeometry) -> String {
    format!(
        "size           {} bytes\n\
         block size     {} bytes\n\
         sets           {}\n\
         ways           {}\n\
         total blocks   {}\n\
         policy         {}\n\
         address        {} (tag {} | index {} | offset {})\n",
        geometry.size_bytes(),
        geometry.block_bytes(),
        geometry.num_sets(),
        geometry.ways(),
        geometry.total_blocks(),
        geometry.policy(),
        geometry.address_width(),
        geometry.tag_bits(),
        geometry.index_bits(),
        geometry.offset_bits(),
    )
}
