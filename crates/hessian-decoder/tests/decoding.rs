//! End-to-end decoding scenarios exercised through the public API only
//! (`Decoder::new`/`feed`/`finalize`), covering wire forms not already
//! exercised by the unit tests colocated with the decoder itself:
//! chunked strings, typed vectors, back-references into both tables,
//! timestamps, 64-bit integers, and opcode-table sweeps.

use hessian_core::{Error, Value};
use hessian_decoder::Decoder;
use proptest::prelude::*;
use rstest::rstest;

fn decode(bytes: &[u8]) -> Value {
    let mut dec = Decoder::new();
    dec.feed(bytes).unwrap();
    dec.finalize().unwrap()
}

#[test]
fn decodes_a_string_split_across_two_chunks() {
    // R 00 03 "foo" S 00 03 "bar" -> "foobar"
    let bytes: &[u8] = &[
        0x52, 0x00, 0x03, b'f', b'o', b'o', 0x53, 0x00, 0x03, b'b', b'a', b'r',
    ];
    assert_eq!(decode(bytes), Value::String("foobar".into()));
}

#[test]
fn chunked_string_length_counts_characters_not_bytes() {
    // R 00 01 "é" (2 UTF-8 bytes, 1 char) S 00 01 "x"
    let mut bytes = vec![0x52, 0x00, 0x01];
    bytes.extend("é".as_bytes());
    bytes.push(0x53);
    bytes.extend([0x00, 0x01]);
    bytes.push(b'x');
    assert_eq!(decode(&bytes), Value::String("éx".into()));
}

#[test]
fn decodes_a_binary_value_split_across_two_chunks() {
    // A 00 02 <01 02> B 00 01 <03>
    let bytes: &[u8] = &[0x41, 0x00, 0x02, 0x01, 0x02, 0x42, 0x00, 0x01, 0x03];
    match decode(bytes) {
        Value::Binary(b) => assert_eq!(&b[..], &[0x01, 0x02, 0x03]),
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn decodes_a_typed_fixed_vector() {
    // V "int[]" (5 chars) size 2: [0, 1]
    let bytes: &[u8] = &[
        0x56, 0x05, b'i', b'n', b't', b'[', b']', 0x92, 0x90, 0x91,
    ];
    match decode(bytes) {
        Value::Vector(items) => {
            let items = items.borrow();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].as_int(), Some(0));
            assert_eq!(items[1].as_int(), Some(1));
        }
        other => panic!("expected vector, got {other:?}"),
    }
}

#[test]
fn decodes_a_typed_fixed_compact_vector_with_zero_elements() {
    // 0x70 = typed-fixed-compact, size implied 0; type "x" (1 char)
    let bytes: &[u8] = &[0x70, 0x01, b'x'];
    match decode(bytes) {
        Value::Vector(items) => assert!(items.borrow().is_empty()),
        other => panic!("expected vector, got {other:?}"),
    }
}

#[test]
fn decodes_an_untyped_fixed_compact_vector_with_zero_elements() {
    // 0x78 = untyped-fixed-compact, size implied 0
    assert!(matches!(decode(&[0x78]), Value::Vector(items) if items.borrow().is_empty()));
}

#[test]
fn decodes_a_back_reference_to_an_earlier_vector() {
    // W 90 Z -> vector [0], then Q 90 -> back-reference to index 0
    let first: &[u8] = &[0x57, 0x90, 0x5a];
    let reference: &[u8] = &[b'Q', 0x90];

    let mut dec = Decoder::new();
    dec.feed(first).unwrap();
    let first_value = dec.finalize().unwrap();

    dec.feed(reference).unwrap();
    let second_value = dec.finalize().unwrap();

    assert_eq!(first_value, second_value);
}

#[test]
fn decodes_a_second_object_reusing_an_earlier_class_definition() {
    // A class definition and two compact-form instances of it, each with
    // field x, both wrapped in a streamed vector so that both instances
    // are decoded within a single decode cycle (the class-definition
    // table is cleared on `finalize()`, so reuse across two separate
    // `finalize()` calls is not something one decoder instance supports).
    let bytes: &[u8] = &[
        b'C', 0x06, b'P', b'o', b'i', b'n', b't', b'2', 0x91, 0x01, b'x', // class def
        0x57, // streamed vector opener
        0x60, 0x91, // instance a: x = 1
        0x60, 0x92, // instance b: x = 2
        0x5a, // terminator
    ];

    let v = decode(bytes);
    let Value::Vector(items) = v else {
        panic!("expected vector");
    };
    let items = items.borrow();
    assert_eq!(items.len(), 2);
    let (Value::Object(a), Value::Object(b)) = (&items[0], &items[1]) else {
        panic!("expected two objects");
    };
    assert_eq!(a.borrow().fields.get("x").unwrap().as_int(), Some(1));
    assert_eq!(b.borrow().fields.get("x").unwrap().as_int(), Some(2));
}

#[test]
fn decodes_int64_forms() {
    assert_eq!(decode(&[0xd8]), Value::Long(-8));
    // L <8 bytes big-endian> = 256
    assert_eq!(
        decode(&[0x4c, 0, 0, 0, 0, 0, 0, 1, 0]),
        Value::Long(256)
    );
}

#[test]
fn decodes_millisecond_timestamp() {
    // epoch 0
    match decode(&[0x4a, 0, 0, 0, 0, 0, 0, 0, 0]) {
        Value::Date(d) => assert_eq!(d.timestamp_millis(), 0),
        other => panic!("expected date, got {other:?}"),
    }
}

#[rstest]
#[case(0x00)]
#[case(0x10)]
#[case(0xff)]
fn every_byte_is_either_accepted_as_an_opener_or_rejected_cleanly(#[case] byte: u8) {
    let mut dec = Decoder::new();
    // A single arbitrary byte either starts a legitimate (if incomplete)
    // value, or is rejected with a typed error -- it must never panic.
    let _ = dec.feed(&[byte]);
}

#[rstest]
#[case(&[0x3a])] // not a valid opener anywhere in the table
#[case(&[0x45])] // 'E' is unused
fn invalid_openers_produce_invalid_opcode(#[case] bytes: &[u8]) {
    let mut dec = Decoder::new();
    assert!(matches!(
        dec.feed(bytes),
        Err(Error::InvalidOpcode { .. })
    ));
}

proptest! {
    #[test]
    fn incrementality_holds_for_arbitrary_byte_partitions(splits in proptest::collection::vec(1usize..=3, 0..8)) {
        // A streamed vector of three compact ints: W 90 91 92 Z
        let whole: &[u8] = &[0x57, 0x90, 0x91, 0x92, 0x5a];

        let mut dec = Decoder::new();
        let mut offset = 0;
        for split in &splits {
            if offset >= whole.len() {
                break;
            }
            let end = (offset + split).min(whole.len());
            dec.feed(&whole[offset..end]).unwrap();
            offset = end;
        }
        if offset < whole.len() {
            dec.feed(&whole[offset..]).unwrap();
        }
        let value = dec.finalize().unwrap();

        match value {
            Value::Vector(items) => {
                let items = items.borrow();
                prop_assert_eq!(items.len(), 3);
                prop_assert_eq!(items[0].as_int(), Some(0));
                prop_assert_eq!(items[1].as_int(), Some(1));
                prop_assert_eq!(items[2].as_int(), Some(2));
            }
            other => prop_assert!(false, "expected vector, got {:?}", other),
        }
    }
}
