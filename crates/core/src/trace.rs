//! Address traces.
//!
//! A trace is a list of accesses separated by commas, semicolons or
//! whitespace. Each entry is an address in decimal or `0x` hex, optionally
//! prefixed with `r:` (read, the default) or `w:` (write). `#` starts a
//! comment that runs to the end of the line.
//!
//! ```text
//! # warm up, then conflict
//! 0x00, 0x04, w:0x08
//! 16 r:0x00
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::addr::parse_address;
use crate::common::data::AccessKind;
use crate::common::error::{Result, SimError};

/// One trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceOp {
    /// Byte address.
    pub address: u64,
    /// Read or write.
    #[serde(default)]
    pub kind: AccessKind,
}

impl TraceOp {
    /// Read of `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            address,
            kind: AccessKind::Read,
        }
    }

    /// Write of `address`.
    pub const fn write(address: u64) -> Self {
        Self {
            address,
            kind: AccessKind::Write,
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessKind::Read => write!(f, "{:#x}", self.address),
            AccessKind::Write => write!(f, "w:{:#x}", self.address),
        }
    }
}

/// Parses a single entry such as `"0x1f"`, `"12"` or `"w:0x40"`.
///
/// # Errors
///
/// Returns [`SimError::InvalidAddress`] if the address part does not parse.
pub fn parse_op(token: &str) -> Result<TraceOp> {
    let token = token.trim();
    let (kind, address) = match token.split_once(':') {
        Some((prefix, rest)) if prefix.eq_ignore_ascii_case("w") => (AccessKind::Write, rest),
        Some((prefix, rest)) if prefix.eq_ignore_ascii_case("r") => (AccessKind::Read, rest),
        Some((prefix, _)) => {
            return Err(SimError::InvalidAddress {
                input: token.to_string(),
                reason: format!("unknown access prefix {prefix:?}, expected r: or w:"),
            });
        }
        None => (AccessKind::Read, token),
    };
    Ok(TraceOp {
        address: parse_address(address)?,
        kind,
    })
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns [`SimError::InvalidTrace`] for the first entry that fails, with
/// its 1-based position.
pub fn parse_trace(text: &str) -> Result<Vec<TraceOp>> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(|line| line.split(|c: char| c == ',' || c == ';' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(i, token)| {
            parse_op(token).map_err(|e| SimError::InvalidTrace {
                position: i + 1,
                token: token.to_string(),
                reason: match e {
                    SimError::InvalidAddress { reason, .. } => reason,
                    other => other.to_string(),
                },
            })
        })
        .collect()
}
