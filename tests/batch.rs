use pretty_assertions::assert_eq;

use xs1_rs::{decode_batch, decode_batch_strict, decode_tokens, DecodeError, Words, Xs1Decoder};

fn names<E>(results: &[Result<xs1_rs::Decoded, E>]) -> Vec<String> {
    results
        .iter()
        .map(|r| match r {
            Ok(d) => d.mnemonic.to_string(),
            Err(_) => "<err>".to_string(),
        })
        .collect()
}

#[test]
fn batch_preserves_order_and_isolates_failures() {
    let input = [
        Words::short(0x0002),
        Words::short(0x17ff),
        Words::long(0xf000, 0x5400),
        Words::short(0xf800),
        Words::short(0x07ec),
    ];
    let results = decode_batch(&Xs1Decoder, &input);
    assert_eq!(
        names(&results),
        ["STW_2rus", "<err>", "STWSP_lru6", "<err>", "WAITEU_0r"]
    );
    assert!(matches!(results[3], Err(DecodeError::MissingHighWord { opcode: 0x1f, .. })));
}

#[test]
fn large_batch_matches_sequential_decode() {
    let input: Vec<Words> = (0..=u16::MAX).map(Words::short).collect();
    let parallel = decode_batch(&Xs1Decoder, &input);
    let sequential: Vec<_> = input.iter().map(|&w| xs1_rs::Decoder::decode(&Xs1Decoder, w)).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn strict_batch_reports_first_failure_in_order() {
    let input = [
        Words::short(0x0002),
        Words::short(0x17ff),
        Words::short(0xf000),
    ];
    let err = decode_batch_strict(&Xs1Decoder, &input).unwrap_err();
    assert_eq!(err.words(), Some(Words::short(0x17ff)));

    let ok = decode_batch_strict(&Xs1Decoder, &input[..1]).unwrap();
    assert_eq!(ok.len(), 1);
}

#[test]
fn tokens_fail_independently() {
    let results = decode_tokens(&Xs1Decoder, &["dda6", "dda61", "00f00054"]);
    assert_eq!(names(&results), ["MKMSK_rus", "<err>", "STWSP_lru6"]);
    assert!(matches!(results[1], Err(DecodeError::MalformedToken { .. })));
}
