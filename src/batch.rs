//! Decoding many independent instructions at once.

use rayon::prelude::*;

use crate::decoder::{Decoded, Decoder};
use crate::error::DecodeError;
use crate::words::Words;

/// Decodes every instruction, keeping failures in place. Output order
/// matches input order.
pub fn decode_batch<D>(decoder: &D, input: &[Words]) -> Vec<Result<Decoded, DecodeError>>
where
    D: Decoder + Sync,
{
    input.par_iter().map(|&words| decoder.decode(words)).collect()
}

/// Like [`decode_batch`] but fails with the first error in input order.
pub fn decode_batch_strict<D>(decoder: &D, input: &[Words]) -> Result<Vec<Decoded>, DecodeError>
where
    D: Decoder + Sync,
{
    // rayon's own Result collection reports whichever error lands first
    decode_batch(decoder, input).into_iter().collect()
}

/// Parses and decodes dump tokens; a malformed token fails only its own slot.
pub fn decode_tokens<D, S>(decoder: &D, tokens: &[S]) -> Vec<Result<Decoded, DecodeError>>
where
    D: Decoder + Sync,
    S: AsRef<str> + Sync,
{
    tokens
        .par_iter()
        .map(|token| decoder.decode(token.as_ref().parse()?))
        .collect()
}
