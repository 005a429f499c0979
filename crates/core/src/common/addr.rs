//! Address layout and decomposition.
//!
//! This module splits an address into the three fields a cache uses to locate a block.
//! It provides the following:
//! 1. **Address width:** An explicit 32- or 64-bit address space; nothing relies on integer wraparound.
//! 2. **Decomposition:** `tag | index | offset` extraction with masks derived from the geometry.
//! 3. **Parsing:** Decimal and `0x`-prefixed hexadecimal address text.
//!
//! ```text
//!  address_width-1                                      0
//! +--------------------+----------------+---------------+
//! |        tag         |     index      |    offset     |
//! +--------------------+----------------+---------------+
//!        tag_bits          index_bits      offset_bits
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, Result, SimError};

/// Width of the simulated address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AddressWidth {
    /// 32-bit addresses (`0..=0xFFFF_FFFF`).
    #[default]
    Bits32,
    /// 64-bit addresses.
    Bits64,
}

impl AddressWidth {
    /// Number of address bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Largest representable address.
    #[inline]
    pub const fn max_address(self) -> u64 {
        low_mask(self.bits())
    }
}

impl TryFrom<u32> for AddressWidth {
    type Error = ConfigError;

    fn try_from(bits: u32) -> std::result::Result<Self, Self::Error> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            other => Err(ConfigError::UnsupportedAddressWidth(other)),
        }
    }
}

impl From<AddressWidth> for u32 {
    fn from(width: AddressWidth) -> Self {
        width.bits()
    }
}

impl fmt::Display for AddressWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// The three fields of a decomposed address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressParts {
    /// Identifies the block within its set.
    pub tag: u64,
    /// Selects the set.
    pub index: usize,
    /// Selects the byte within the block.
    pub offset: u64,
}

/// Bit layout of an address for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AddressLayout {
    width: AddressWidth,
    offset_bits: u32,
    index_bits: u32,
}

impl AddressLayout {
    /// Creates a layout with the given field widths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressTooNarrow`] if `offset_bits + index_bits`
    /// exceeds the address width (the tag would need a negative width).
    pub const fn new(
        width: AddressWidth,
        offset_bits: u32,
        index_bits: u32,
    ) -> std::result::Result<Self, ConfigError> {
        let needed = offset_bits + index_bits;
        if needed > width.bits() {
            return Err(ConfigError::AddressTooNarrow {
                width: width.bits(),
                needed,
            });
        }
        Ok(Self {
            width,
            offset_bits,
            index_bits,
        })
    }

    /// Address width this layout was built for.
    #[inline]
    pub const fn width(&self) -> AddressWidth {
        self.width
    }

    /// Number of offset bits (`log2(block_bytes)`).
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of index bits (`log2(num_sets)`).
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits (`width - index_bits - offset_bits`).
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        self.width.bits() - self.index_bits - self.offset_bits
    }

    /// Rejects addresses that do not fit in the address width.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidAddress`] for addresses above
    /// [`AddressWidth::max_address`].
    pub fn check(&self, address: u64) -> Result<u64> {
        if address > self.width.max_address() {
            return Err(SimError::InvalidAddress {
                input: format!("{address:#x}"),
                reason: format!("does not fit in a {} address space", self.width),
            });
        }
        Ok(address)
    }

    /// Splits `address` into tag, index and offset.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidAddress`] if the address is out of range.
    pub fn decompose(&self, address: u64) -> Result<AddressParts> {
        let address = self.check(address)?;
        let offset = address & low_mask(self.offset_bits);
        let index = shr(address, self.offset_bits) & low_mask(self.index_bits);
        let tag = shr(address, self.offset_bits + self.index_bits);
        Ok(AddressParts {
            tag,
            index: index as usize,
            offset,
        })
    }

    /// Reassembles an address from its fields. Fields wider than their bit
    /// width are masked down first.
    pub const fn compose(&self, parts: AddressParts) -> u64 {
        let offset = parts.offset & low_mask(self.offset_bits);
        let index = (parts.index as u64) & low_mask(self.index_bits);
        let tag = parts.tag & low_mask(self.tag_bits());
        shl(tag, self.offset_bits + self.index_bits) | shl(index, self.offset_bits) | offset
    }

    /// First byte address of the block holding `tag` in set `index`.
    pub const fn block_address(&self, tag: u64, index: usize) -> u64 {
        self.compose(AddressParts {
            tag,
            index,
            offset: 0,
        })
    }
}

/// Parses a textual address: decimal (`"4096"`) or hex (`"0x1000"`).
///
/// Surrounding whitespace and `_` separators are ignored.
///
/// # Errors
///
/// Returns [`SimError::InvalidAddress`] for negative numbers, empty input,
/// non-digit characters, or values that overflow 64 bits.
pub fn parse_address(input: &str) -> Result<u64> {
    let invalid = |reason: &str| SimError::InvalidAddress {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let text: String = input.trim().chars().filter(|&c| c != '_').collect();
    if text.is_empty() {
        return Err(invalid("empty address"));
    }
    if text.starts_with('-') {
        return Err(invalid("negative addresses are not allowed"));
    }

    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text.as_str(), 10),
    };
    if digits.is_empty() {
        return Err(invalid("missing digits"));
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid(if radix == 16 {
            "not a hexadecimal number"
        } else {
            "not a decimal number"
        }));
    }
    u64::from_str_radix(digits, radix).map_err(|_| invalid("address overflows 64 bits"))
}

/// Mask of the low `bits` bits.
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

const fn shr(value: u64, bits: u32) -> u64 {
    if bits >= u64::BITS { 0 } else { value >> bits }
}

const fn shl(value: u64, bits: u32) -> u64 {
    if bits >= u64::BITS { 0 } else { value << bits }
}
