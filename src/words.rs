use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Instruction size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    W16 = 2,
    W32 = 4,
}

impl Width {
    pub fn bytes(self) -> u32 {
        self as u32
    }

    pub fn words(self) -> usize {
        match self {
            Width::W16 => 1,
            Width::W32 => 2,
        }
    }
}

/// One instruction's worth of words.
///
/// `low` holds the primary opcode. `high` is the word that follows it in
/// memory and is only present for two-word input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Words {
    pub low: u16,
    pub high: Option<u16>,
}

impl Words {
    pub const fn short(low: u16) -> Self {
        Self { low, high: None }
    }

    pub const fn long(low: u16, high: u16) -> Self {
        Self { low, high: Some(high) }
    }

    pub fn high_valid(&self) -> bool {
        self.high.is_some()
    }

    pub fn width(&self) -> Width {
        if self.high_valid() {
            Width::W32
        } else {
            Width::W16
        }
    }

    /// Words from memory-order bytes: XS1 is little-endian and the word at the
    /// lower address comes first.
    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [b0, b1] => Some(Self::short(u16::from_le_bytes([b0, b1]))),
            [b0, b1, b2, b3] => Some(Self::long(
                u16::from_le_bytes([b0, b1]),
                u16::from_le_bytes([b2, b3]),
            )),
            _ => None,
        }
    }

    /// Words from the integer value of a hex dump token.
    ///
    /// A dump lists bytes in memory order, so reading the token as one
    /// big-endian number packs byte 0 in the most significant position. A
    /// one-word token only occupies the low 16 bits of `value`.
    pub fn from_container(value: u32, width: Width) -> Self {
        let bytes = value.to_be_bytes();
        match width {
            Width::W16 => Self::short(u16::from_le_bytes([bytes[2], bytes[3]])),
            Width::W32 => Self::long(
                u16::from_le_bytes([bytes[0], bytes[1]]),
                u16::from_le_bytes([bytes[2], bytes[3]]),
            ),
        }
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = self.low.to_le_bytes().to_vec();
        if let Some(high) = self.high {
            out.extend_from_slice(&high.to_le_bytes());
        }
        out
    }
}

impl fmt::Display for Words {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.high {
            Some(high) => write!(f, "{:04x} {:04x}", self.low, high),
            None => write!(f, "{:04x}", self.low),
        }
    }
}

/// Parses a dump token of exactly 4 or 8 hex digits, e.g. `dda6`.
impl FromStr for Words {
    type Err = DecodeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || DecodeError::MalformedToken { token: token.to_string() };
        let width = match token.len() {
            4 => Width::W16,
            8 => Width::W32,
            _ => return Err(malformed()),
        };
        // from_str_radix alone would also take a leading '+'
        if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let value = u32::from_str_radix(token, 16).map_err(|_| malformed())?;
        Ok(Self::from_container(value, width))
    }
}
