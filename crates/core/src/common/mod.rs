//! Common types shared across the simulator.
//!
//! This module provides the leaf building blocks used by the cache engine. It includes:
//! 1. **Address Layout:** Tag/index/offset decomposition and address parsing.
//! 2. **Access Kinds:** Read/write classification of accesses.
//! 3. **Error Handling:** Configuration and session error types.
//! 4. **Sizes:** Parsing and formatting of human-readable byte sizes.

/// Address width, layout and decomposition.
pub mod addr;

/// Memory access kind definitions.
pub mod data;

/// Error types.
pub mod error;

/// Size string parsing.
pub mod size;

pub use addr::{AddressLayout, AddressParts, AddressWidth, parse_address};
pub use data::AccessKind;
pub use error::{ConfigError, Result, SimError};
pub use size::{format_size, parse_size};
