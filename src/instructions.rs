use std::fmt;

use serde::{Serialize, Serializer};

use crate::words::Width;

/// Operand shape of an instruction, the suffix after `_` in a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    /// register and small unsigned immediate
    Rus,
    /// two registers and small unsigned immediate
    R2us,
    Ru6,
    U6,
    U10,
}

impl Encoding {
    pub fn tag(self) -> &'static str {
        match self {
            Encoding::R0 => "0r",
            Encoding::R1 => "1r",
            Encoding::R2 => "2r",
            Encoding::R3 => "3r",
            Encoding::R4 => "4r",
            Encoding::R5 => "5r",
            Encoding::R6 => "6r",
            Encoding::Rus => "rus",
            Encoding::R2us => "2rus",
            Encoding::Ru6 => "ru6",
            Encoding::U6 => "u6",
            Encoding::U10 => "u10",
        }
    }
}

/// An architectural mnemonic such as `ADD_3r` or `STWSP_lru6`.
///
/// `long` marks the prefixed two-word form and renders as an `l` in front of
/// the encoding tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mnemonic {
    pub name: &'static str,
    pub encoding: Encoding,
    pub long: bool,
}

impl Mnemonic {
    pub const fn short(name: &'static str, encoding: Encoding) -> Self {
        Self { name, encoding, long: false }
    }

    pub const fn long(name: &'static str, encoding: Encoding) -> Self {
        Self { name, encoding, long: true }
    }

    /// Instruction size implied by the encoding.
    pub fn width(&self) -> Width {
        if self.long {
            Width::W32
        } else {
            Width::W16
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.long { "l" } else { "" };
        // pad() so width/alignment flags apply to the whole mnemonic
        f.pad(&format!("{}_{}{}", self.name, prefix, self.encoding.tag()))
    }
}

impl Serialize for Mnemonic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
