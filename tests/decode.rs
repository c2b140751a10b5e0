use pretty_assertions::assert_eq;

use xs1_rs::{decode, decode_token, DecodeError, Decoder, Field, Width, Word, Words, Xs1Decoder};

fn mnemonic(words: Words) -> String {
    decode(words).unwrap().to_string()
}

#[test]
fn stw_2rus_from_zeroed_operands() {
    assert_eq!(mnemonic(Words::short(0x0002)), "STW_2rus");
}

#[test]
fn waiteu_is_an_operandless_word() {
    assert_eq!(mnemonic(Words::short(0x07ec)), "WAITEU_0r");
    assert_eq!(mnemonic(Words::short(0x07ff)), "SETKEP_0r");
    assert_eq!(mnemonic(Words::short(0x0fed)), "STSPC_0r");
}

#[test]
fn entsp_escapes_the_ru6_range() {
    // opcode 0x0e, bits 10..6 = 0x1d
    assert_eq!(mnemonic(Words::short(0x7740)), "ENTSP_u6");
    assert_eq!(mnemonic(Words::short(0x7000)), "BRFT_ru6");
    assert_eq!(mnemonic(Words::short(0x7400)), "BRBT_ru6");
    assert_eq!(mnemonic(Words::short(0x77c0)), "RETSP_u6");
}

#[test]
fn prefixed_stwsp() {
    let d = Xs1Decoder.decode(Words::long(0xf000, 0x5400)).unwrap();
    assert_eq!(d.mnemonic.to_string(), "STWSP_lru6");
    assert_eq!(d.width, Width::W32);
    assert_eq!(mnemonic(Words::long(0xf000, 0x5000)), "STWDP_lru6");
    assert_eq!(mnemonic(Words::long(0xf000, 0x7740)), "ENTSP_lu6");
    assert_eq!(mnemonic(Words::long(0xf000, 0xd400)), "BLRB_lu10");
}

#[test]
fn hex_tokens() {
    assert_eq!(decode_token("dda6").unwrap().to_string(), "MKMSK_rus");
    assert_eq!(decode_token("00f00054").unwrap().to_string(), "STWSP_lru6");
    assert_eq!(
        decode_token("dda61"),
        Err(DecodeError::MalformedToken { token: "dda61".into() })
    );
    assert!(matches!(decode_token("dda6zz00"), Err(DecodeError::MalformedToken { .. })));
    assert!(matches!(decode_token("+da6"), Err(DecodeError::MalformedToken { .. })));
}

#[test]
fn unmapped_operandless_word_is_invalid() {
    let err = decode(Words::short(0x17ff)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidEncoding {
            words: Words::short(0x17ff),
            opcode: 0x02,
            field: Field::Value(Word::Low),
            value: 0x17ff,
        }
    );
    assert!(err.is_invalid_encoding());
    assert_eq!(
        err.to_string(),
        "invalid encoding 17ff (opcode 0x02): no rule for low word = 0x17ff"
    );
}

#[test]
fn missing_operand_class_is_invalid() {
    // SUB has no operandless forms
    let err = decode(Words::short(0x1fec)).unwrap_err();
    assert_eq!(err.opcode(), Some(0x03));
    assert!(matches!(err, DecodeError::InvalidEncoding { field: Field::OperandClass, value: 0, .. }));
    // EET is the only two-operand form under opcode 0x04
    let err = decode(Words::short((0x04 << 11) | (27 << 6))).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidEncoding { field: Field::Bit(Word::Low, 4), value: 0, .. }));
}

#[test]
fn prefix_without_second_word_never_falls_back() {
    for low in [0xf000, 0xf800, 0xf8a3] {
        let err = decode(Words::short(low)).unwrap_err();
        assert!(matches!(err, DecodeError::MissingHighWord { .. }), "{low:#06x}: {err}");
        assert!(err.is_invalid_encoding());
        assert_eq!(err.words(), Some(Words::short(low)));
    }
}

#[test]
fn extended_operand_instructions() {
    assert_eq!(mnemonic(Words::long(0xf800, 0x0000)), "LMUL_l6r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x06d0)), "LADD_l5r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x06c0)), "LDIVU_l5r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x07f0)), "MACCU_l4r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x0fe0)), "MACCS_l4r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x3fec)), "MUL_l3r");
    assert_eq!(mnemonic(Words::long(0xf800, 0x97ed)), "OUTPW_l2rus");
    assert_eq!(mnemonic(Words::long(0xfed0, 0x0fec)), "SETCLK_l2r");
    assert_eq!(mnemonic(Words::long(0xfec0, 0x0fec)), "CLZ_l2r");
}

#[test]
fn extended_pair_outside_every_class_is_invalid() {
    let err = decode(Words::long(0xffec, 0x0000)).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidEncoding { field: Field::LongOperandClass, value: 0, .. }));
}

#[test]
fn short_instruction_ignores_trailing_word() {
    let d = Xs1Decoder.decode(Words::long(0xa6dd, 0xf000)).unwrap();
    assert_eq!(d.mnemonic.to_string(), "MKMSK_rus");
    assert_eq!(d.width, Width::W16);
}
