//! Bit-field access on 16-bit instruction words.
//!
//! Bit 0 is the least significant bit. Ranges are written high-to-low, the
//! way the XS1 architecture manual draws its encodings.

use bitvec::prelude::*;

/// Bits `low..=high` of `value`, right-aligned.
///
/// Panics if `high` is past bit 15 or the range is reversed; both are
/// programming errors in a decode table, not properties of the input.
#[inline]
pub fn bit_range(value: u16, high: usize, low: usize) -> u16 {
    assert!(
        low <= high && high < 16,
        "bit range {high}..{low} is not within a 16-bit word"
    );
    value.view_bits::<Lsb0>()[low..=high].load_le::<u16>()
}

/// Single bit `n` of `value` (0 or 1).
#[inline]
pub fn bit(value: u16, n: usize) -> u16 {
    bit_range(value, n, n)
}

/// Primary opcode: the top five bits of the low word.
#[inline]
pub fn primary_opcode(word: u16) -> u8 {
    bit_range(word, 15, 11) as u8
}
