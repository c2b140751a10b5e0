use std::fmt;

use crate::words::Words;

/// Which word a discriminant is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    Low,
    High,
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Word::Low => "low",
            Word::High => "high",
        })
    }
}

/// The discriminant a decode step branched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// single-word operand count
    OperandClass,
    /// two-word operand count; reported as 0 when no class applies
    LongOperandClass,
    Bit(Word, u8),
    Range(Word, u8, u8),
    /// the whole word, for instructions without operands
    Value(Word),
    /// `bit(low, 4)` above `bits(high, 3..0)`
    Combined,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::OperandClass => f.write_str("operand class"),
            Field::LongOperandClass => f.write_str("long operand class"),
            Field::Bit(word, n) => write!(f, "bit({word}, {n})"),
            Field::Range(word, high, low) => write!(f, "bits({word}, {high}..{low})"),
            Field::Value(word) => write!(f, "{word} word"),
            Field::Combined => f.write_str("bit(low, 4):bits(high, 3..0)"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed token {token:?}: expected 4 or 8 hex digits")]
    MalformedToken { token: String },
    #[error("invalid encoding {words} (opcode {opcode:#04x}): no rule for {field} = {value:#x}")]
    InvalidEncoding {
        words: Words,
        opcode: u8,
        field: Field,
        value: u16,
    },
    #[error("opcode {opcode:#04x} needs a second word but only {words} was given")]
    MissingHighWord { words: Words, opcode: u8 },
}

impl DecodeError {
    /// True for failures of the decode tree itself, as opposed to bad input
    /// text. A missing second word counts as an invalid encoding.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidEncoding { .. } | DecodeError::MissingHighWord { .. }
        )
    }

    /// Raw words of an encoding failure.
    pub fn words(&self) -> Option<Words> {
        match self {
            DecodeError::MalformedToken { .. } => None,
            DecodeError::InvalidEncoding { words, .. } | DecodeError::MissingHighWord { words, .. } => {
                Some(*words)
            }
        }
    }

    pub fn opcode(&self) -> Option<u8> {
        match self {
            DecodeError::MalformedToken { .. } => None,
            DecodeError::InvalidEncoding { opcode, .. } | DecodeError::MissingHighWord { opcode, .. } => {
                Some(*opcode)
            }
        }
    }
}
