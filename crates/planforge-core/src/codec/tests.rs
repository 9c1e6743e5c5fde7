use crate::codec::{
    CommonHandle, Datum, DatumDecoder, DecodeError, Handle, MemcomparableDecoder, cut_one,
    decode_one, encode_datum, encode_datums,
};
use proptest::prelude::*;

fn encode(datum: &Datum) -> Vec<u8> {
    let mut out = Vec::new();
    encode_datum(&mut out, datum);
    out
}

#[test]
fn decode_one_returns_remainder_after_first_datum() {
    let bytes = encode_datums(&[Datum::Int(-7), Datum::Text("a\0b".to_string())]);

    let (first, rest) = decode_one(&bytes).expect("first datum should decode");
    let (second, tail) = decode_one(rest).expect("second datum should decode");

    assert_eq!(first, Datum::Int(-7));
    assert_eq!(second, Datum::Text("a\0b".to_string()));
    assert!(tail.is_empty());
}

#[test]
fn null_decodes_as_value_not_error() {
    let decoded = MemcomparableDecoder
        .decode_column(&encode(&Datum::Null))
        .expect("null is a legitimate value");

    assert!(decoded.is_null());
}

#[test]
fn invalid_bool_payload_frames_but_fails_decode() {
    let bytes = vec![0x06, 0x07];

    assert!(cut_one(&bytes).is_ok(), "framing only checks width");
    assert_eq!(
        decode_one(&bytes),
        Err(DecodeError::InvalidPayload { kind: "bool" })
    );
}

#[test]
fn invalid_utf8_text_fails_decode() {
    let bytes = vec![0x02, 0xC3, 0x28, 0x00, 0x00];

    assert_eq!(
        decode_one(&bytes),
        Err(DecodeError::InvalidPayload { kind: "text" })
    );
}

#[test]
fn truncated_and_unknown_tags_are_rejected() {
    assert_eq!(
        decode_one(&[0x03, 0x80, 0x00]),
        Err(DecodeError::Truncated {
            needed: 8,
            remaining: 2
        })
    );
    assert_eq!(
        decode_one(&[0x42]),
        Err(DecodeError::InvalidTag { tag: 0x42 })
    );
    assert_eq!(decode_one(&[]), Err(DecodeError::Empty));
}

#[test]
fn common_handle_frames_each_column() {
    let handle = CommonHandle::from_datums(&[
        Datum::Text("tenant".to_string()),
        Datum::Int(42),
        Datum::Null,
    ]);
    let reparsed = CommonHandle::new(handle.encoded().to_vec()).expect("handle should frame");

    assert_eq!(reparsed, handle);
    assert_eq!(handle.num_cols(), 3);
    assert_eq!(
        decode_one(handle.encoded_col(1).expect("column 1 exists")).map(|(d, _)| d),
        Ok(Datum::Int(42))
    );
    assert_eq!(
        handle.encoded_col(3),
        Err(DecodeError::ColumnOutOfRange { pos: 3, len: 3 })
    );
}

#[test]
fn int_handle_has_no_encoded_columns() {
    let handle = Handle::Int(9);

    assert!(handle.is_int());
    assert_eq!(handle.int_value(), Some(9));
    assert_eq!(
        handle.encoded_col(0),
        Err(DecodeError::ColumnOutOfRange { pos: 0, len: 0 })
    );
}

proptest! {
    #[test]
    fn int_encoding_preserves_order(a in any::<i64>(), b in any::<i64>()) {
        let ea = encode(&Datum::Int(a));
        let eb = encode(&Datum::Int(b));

        prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
    }

    #[test]
    fn text_survives_encoding(text in "[a-z\\x00]{0,12}") {
        let bytes = encode(&Datum::Text(text.clone()));
        let (decoded, rest) = decode_one(&bytes).expect("text should decode");

        prop_assert_eq!(decoded, Datum::Text(text));
        prop_assert!(rest.is_empty());
    }
}
