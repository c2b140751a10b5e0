use serde::Serialize;

use crate::error::DecodeError;
use crate::instructions::Mnemonic;
use crate::isa::xs1::Xs1Decoder;
use crate::words::{Width, Words};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub mnemonic: Mnemonic,
    /// Bytes consumed. A short instruction given two words only uses `low`.
    pub width: Width,
}

pub trait Decoder {
    fn decode(&self, words: Words) -> Result<Decoded, DecodeError>;
}

/// Decodes one instruction with the XS1 tables.
pub fn decode(words: Words) -> Result<Mnemonic, DecodeError> {
    Xs1Decoder.decode(words).map(|d| d.mnemonic)
}

/// Decodes a 4 or 8 hex digit dump token such as `dda6`.
pub fn decode_token(token: &str) -> Result<Mnemonic, DecodeError> {
    decode(token.parse()?)
}
