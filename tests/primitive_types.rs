//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod common;

use common::Doc;
use lazybson::{ElementType, RawDocument, Value};

fn every_primitive() -> Vec<u8> {
    Doc::new()
        .int32("int32Field", 42)
        .int64("int64Field", 9876543210)
        .double("doubleField", 3.14159)
        .string("stringField", "Hello")
        .boolean("boolField", true)
        .datetime("dateField", 1609459200000)
        .object_id(
            "objectIdField",
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C],
        )
        .null("nullField")
        .binary("binaryField", 0x00, &[0x01, 0x02, 0x03, 0x04, 0x05])
        .build()
}

#[test]
fn test_every_scalar_round_trips() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.get_i32("int32Field"), Ok(42));
    assert_eq!(document.get_i64("int64Field"), Ok(9876543210));
    assert_eq!(document.get_f64("doubleField"), Ok(3.14159));
    assert_eq!(document.get_str("stringField"), Ok("Hello"));
    assert_eq!(document.get_bool("boolField"), Ok(true));
    assert_eq!(document.get_datetime("dateField"), Ok(1609459200000));
    assert_eq!(document.len(), 9);
}

#[test]
fn test_object_id_renders_as_lowercase_hex() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();
    assert_eq!(
        document.get_object_id("objectIdField"),
        Ok("0102030405060708090a0b0c"),
    );
}

#[test]
fn test_null_field_is_explicit() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();

    assert!(document.is_null("nullField"));
    assert!(document.contains("nullField"));
    assert!(matches!(document.get("nullField"), Ok(Some(Value::Null))));
    assert_eq!(document.element_type("nullField"), Some(ElementType::Null));

    // A null-typed field takes the default, same as an absent one.
    assert_eq!(document.get_str_or("nullField", "fallback"), "fallback");
}

#[test]
fn test_binary_payload_is_returned_without_subtype() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(
        document.get_binary("binaryField"),
        Ok(&[0x01, 0x02, 0x03, 0x04, 0x05][..]),
    );

    // The untyped accessor keeps the subtype.
    match document.get("binaryField").unwrap() {
        Some(Value::Binary { subtype, bytes }) => {
            assert_eq!(subtype, 0x00);
            assert_eq!(bytes, &[0x01, 0x02, 0x03, 0x04, 0x05]);
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_untyped_get_dispatches_on_the_stored_tag() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();

    assert!(matches!(document.get("int32Field"), Ok(Some(Value::Int32(42)))));
    assert!(matches!(document.get("int64Field"), Ok(Some(Value::Int64(9876543210)))));
    assert!(matches!(document.get("boolField"), Ok(Some(Value::Boolean(true)))));
    assert!(matches!(document.get("dateField"), Ok(Some(Value::DateTime(1609459200000)))));
    assert!(matches!(document.get("stringField"), Ok(Some(Value::String("Hello")))));
    assert!(matches!(document.get("absentField"), Ok(None)));

    match document.get("objectIdField").unwrap() {
        Some(Value::ObjectId(id)) => assert_eq!(id, "0102030405060708090a0b0c"),
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_exotic_tags_decode_through_the_untyped_accessor() {
    let bytes = Doc::new()
        .regex("pattern", "^a.*z$", "i")
        .timestamp("ts", 7)
        .build();
    let document = RawDocument::parse(&bytes).unwrap();

    match document.get("pattern").unwrap() {
        Some(Value::Regex { pattern, options }) => {
            assert_eq!(pattern, "^a.*z$");
            assert_eq!(options, "i");
        }
        other => panic!("unexpected value {:?}", other),
    }
    assert!(matches!(document.get("ts"), Ok(Some(Value::Timestamp(7)))));
}

#[test]
fn test_scalar_reads_are_stable_across_calls() {
    let bytes = every_primitive();
    let document = RawDocument::parse(&bytes).unwrap();

    for _ in 0..4 {
        assert_eq!(document.get_i32("int32Field"), Ok(42));
        assert_eq!(document.get_str("stringField"), Ok("Hello"));
        assert_eq!(
            document.get_object_id("objectIdField"),
            Ok("0102030405060708090a0b0c"),
        );
    }
}
