use pretty_assertions::assert_eq;

use xs1_rs::{DecodeError, Width, Words};

#[test]
fn single_word_token_is_byte_swapped() {
    // dump bytes are in memory order, low byte first
    assert_eq!("dda6".parse::<Words>().unwrap(), Words::short(0xa6dd));
    assert_eq!(Words::from_container(0xdda6, Width::W16), Words::short(0xa6dd));
}

#[test]
fn two_word_token_keeps_opcode_word_first() {
    let words: Words = "00f00054".parse().unwrap();
    assert_eq!(words, Words::long(0xf000, 0x5400));
    assert_eq!(words.low >> 11, 0x1e);
    assert!(words.high_valid());
    assert_eq!(words.width(), Width::W32);
}

#[test]
fn container_and_bytes_agree() {
    let bytes = [0x00, 0xf0, 0x00, 0x54];
    let from_bytes = Words::from_le_bytes(&bytes).unwrap();
    let from_container = Words::from_container(u32::from_be_bytes(bytes), Width::W32);
    assert_eq!(from_bytes, from_container);
    assert_eq!(from_bytes.to_le_bytes(), bytes.to_vec());
    assert_eq!(Words::from_le_bytes(&[0xdd, 0xa6]), Some(Words::short(0xa6dd)));
    assert_eq!(Words::from_le_bytes(&[0xdd, 0xa6, 0x00]), None);
}

#[test]
fn token_length_and_digits_are_checked() {
    for token in ["", "dda", "dda61", "dd a6", "00f0005", "00f000541", "xyzw", "dd-6"] {
        assert_eq!(
            token.parse::<Words>(),
            Err(DecodeError::MalformedToken { token: token.to_string() }),
            "{token:?}"
        );
    }
    assert_eq!("DDA6".parse::<Words>().unwrap(), Words::short(0xa6dd));
}

#[test]
fn display_is_hex_words() {
    assert_eq!(Words::short(0xa6dd).to_string(), "a6dd");
    assert_eq!(Words::long(0xf000, 0x5400).to_string(), "f000 5400");
    assert_eq!(Width::W32.bytes(), 4);
    assert_eq!(Width::W16.words(), 1);
}

#[test]
fn malformed_token_is_not_an_encoding_error() {
    let err = "dda61".parse::<Words>().unwrap_err();
    assert!(!err.is_invalid_encoding());
    assert_eq!(err.words(), None);
    assert_eq!(err.to_string(), "malformed token \"dda61\": expected 4 or 8 hex digits");
}
