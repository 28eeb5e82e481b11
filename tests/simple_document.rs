//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod common;

use std::borrow::Cow;

use common::Doc;
use lazybson::{ElementType, Error, RawDocument};

fn simple_document() -> Vec<u8> {
    Doc::new()
        .string("name", "Alice")
        .int32("age", 30)
        .double("score", 95.5)
        .boolean("active", true)
        .build()
}

#[test]
fn test_typed_getters_on_a_simple_document() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.get_str("name"), Ok("Alice"));
    assert_eq!(document.get_i32("age"), Ok(30));
    assert_eq!(document.get_f64("score"), Ok(95.5));
    assert_eq!(document.get_bool("active"), Ok(true));
    assert_eq!(document.len(), 4);
    assert!(!document.is_empty());
}

#[test]
fn test_to_bytes_returns_the_original_slice() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    match document.to_bytes() {
        Cow::Borrowed(slice) => assert_eq!(slice, bytes.as_slice()),
        Cow::Owned(_) => panic!("a full-slice view must not copy"),
    }
}

#[test]
fn test_introspection_on_a_simple_document() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    assert!(document.contains("name"));
    assert!(document.contains("active"));
    assert!(!document.contains("missing"));

    assert_eq!(document.element_type("name"), Some(ElementType::String));
    assert_eq!(document.element_type("age"), Some(ElementType::Int32));
    assert_eq!(document.element_type("score"), Some(ElementType::Double));
    assert_eq!(document.element_type("active"), Some(ElementType::Boolean));
    assert_eq!(document.element_type("missing"), None);

    let names = document.field_names();
    assert_eq!(names.len(), 4);
    for name in ["name", "age", "score", "active"] {
        assert!(names.contains(name));
    }
}

#[test]
fn test_strict_getters_report_absence_and_mismatch() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(
        document.get_i32("missing"),
        Err(Error::FieldNotFound(String::from("missing"))),
    );
    assert_eq!(
        document.get_bool("score"),
        Err(Error::TypeMismatch(ElementType::Boolean)),
    );
    assert_eq!(
        document.get_bool("score").unwrap_err().to_string(),
        "not BOOLEAN",
    );
}

#[test]
fn test_default_getters_swallow_every_failure() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.get_i32_or("age", -1), 30);
    assert_eq!(document.get_i32_or("missing", -1), -1);
    assert_eq!(document.get_i32_or("name", -1), -1);
    assert_eq!(document.get_f64_or("score", 0.0), 95.5);
    assert_eq!(document.get_bool_or("missing", true), true);
    assert_eq!(document.get_str_or("name", "nobody"), "Alice");
    assert_eq!(document.get_str_or("age", "nobody"), "nobody");
}

#[test]
fn test_json_rendering_covers_every_field() {
    let bytes = simple_document();
    let document = RawDocument::parse(&bytes).unwrap();

    let json = document.to_json().unwrap();
    assert!(json.starts_with('{'));
    assert!(json.ends_with('}'));
    assert!(json.contains("\"name\":\"Alice\""));
    assert!(json.contains("\"age\":30"));
    assert!(json.contains("\"score\":95.5"));
    assert!(json.contains("\"active\":true"));
}

#[test]
fn test_empty_document() {
    let bytes = Doc::new().build();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.len(), 0);
    assert!(document.is_empty());
    assert!(document.field_names().is_empty());
    assert_eq!(document.to_json().unwrap(), "{}");
}

#[test]
fn test_parse_rejects_undersized_input() {
    assert!(matches!(
        RawDocument::parse(&[]),
        Err(Error::InvalidInput(_)),
    ));
    assert!(matches!(
        RawDocument::parse(&[0x05, 0x00, 0x00]),
        Err(Error::InvalidInput(_)),
    ));
}

#[test]
fn test_parse_rejects_unknown_tag() {
    let mut bytes = simple_document();
    // Corrupt the first element tag (0x02 STRING at offset 4) into the
    // unsupported DBPointer tag.
    bytes[4] = 0x0C;
    assert!(matches!(
        RawDocument::parse(&bytes),
        Err(Error::MalformedBson(_)),
    ));
}
