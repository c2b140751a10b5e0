//! Operand-count classification.
//!
//! XS1 packs register operands three to a word in base-3 form, so the field
//! at bits 10..6 tells how many registers a word carries: values below 27 are
//! three registers, a handful above that hold two (with bit 5 extending the
//! range), and the all-ones pattern leaves room for one. Whatever is left
//! encodes no register at all.

use crate::bits::{bit, bit_range};

/// Largest packed value for three registers, exclusive.
const THREE_REGS: u16 = 27;
/// Marker in bits 10..4 of a prefix word that carries no operands of its own.
const OPERANDLESS: u16 = 0x7e;

fn three_regs(word: u16) -> bool {
    bit_range(word, 10, 6) < THREE_REGS
}

fn two_regs(word: u16) -> bool {
    // Signed: a word holding three registers makes this negative, which the
    // long-form ordering depends on.
    let packed = i32::from(bit_range(word, 10, 6)) - i32::from(THREE_REGS);
    packed + i32::from(bit(word, 5)) * 5 < 9
}

fn one_reg(word: u16) -> bool {
    bit_range(word, 10, 5) == 0x3f && bit_range(word, 3, 0) < 12
}

fn operandless(word: u16) -> bool {
    bit_range(word, 10, 4) == OPERANDLESS
}

/// Operand count of a single-word instruction: always one of 0, 1, 2 or 3.
pub fn classify_short(low: u16) -> u8 {
    if three_regs(low) {
        3
    } else if two_regs(low) {
        2
    } else if one_reg(low) {
        1
    } else {
        0
    }
}

/// Operand count of a two-word instruction, one of 2 through 6.
///
/// The checks run in a fixed order, first match wins. `None` means the pair
/// fits none of them.
pub fn classify_long(low: u16, high: u16) -> Option<u8> {
    let low_three = three_regs(low);
    if low_three && three_regs(high) {
        Some(6)
    } else if low_three && two_regs(high) {
        Some(5)
    } else if low_three && one_reg(high) {
        Some(4)
    } else if low_three && operandless(high) {
        Some(3)
    } else if two_regs(low) && operandless(high) {
        Some(2)
    } else {
        None
    }
}

/// True when a ru6-shaped word holds a register and immediate rather than
/// one of the escaped u6 instructions.
pub fn test_ru6(word: u16) -> bool {
    bit_range(word, 9, 6) < 12
}
