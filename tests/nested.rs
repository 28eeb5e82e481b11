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
use lazybson::{Error, RawDocument, Value};

fn person_with_address() -> Vec<u8> {
    Doc::new()
        .string("name", "Bob")
        .document(
            "address",
            Doc::new().string("city", "NYC").int32("zip", 10001),
        )
        .build()
}

#[test]
fn test_nested_document_getters() {
    let bytes = person_with_address();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.get_str("name"), Ok("Bob"));
    let address = document.get_document("address").unwrap();
    assert_eq!(address.get_str("city"), Ok("NYC"));
    assert_eq!(address.get_i32("zip"), Ok(10001));
}

#[test]
fn test_array_of_ints() {
    let bytes = Doc::new()
        .array("numbers", Doc::new().int32_elements(&[10, 20, 30]))
        .build();
    let document = RawDocument::parse(&bytes).unwrap();

    let numbers = document.get_array("numbers").unwrap();
    assert_eq!(numbers.len(), 3);
    assert_eq!(numbers.get_i32(0), Ok(10));
    assert_eq!(numbers.get_i32(1), Ok(20));
    assert_eq!(numbers.get_i32(2), Ok(30));
    assert_eq!(numbers.get_i32(3), Err(Error::IndexOutOfBounds(3)));
}

#[test]
fn test_nested_views_are_cached_instances() {
    let bytes = person_with_address();
    let document = RawDocument::parse(&bytes).unwrap();

    let first = document.get_document("address").unwrap();
    let second = document.get_document("address").unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_deeply_nested_composites() {
    let bytes = Doc::new()
        .document(
            "outer",
            Doc::new().array(
                "items",
                Doc::new()
                    .document("0", Doc::new().int32("value", 1))
                    .document("1", Doc::new().int32("value", 2)),
            ),
        )
        .build();
    let document = RawDocument::parse(&bytes).unwrap();

    let items = document.get_document("outer").unwrap().get_array("items").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items.get_document(0).unwrap().get_i32("value"), Ok(1));
    assert_eq!(items.get_document(1).unwrap().get_i32("value"), Ok(2));
}

#[test]
fn test_nested_views_survive_their_parent_value() {
    let bytes = person_with_address();
    let document = RawDocument::parse(&bytes).unwrap();

    // A nested view taken through the untyped accessor owns its own
    // directory over the shared root bytes.
    let address = match document.get("address").unwrap() {
        Some(Value::Document(address)) => address,
        other => panic!("unexpected value {:?}", other),
    };
    drop(document);
    assert_eq!(address.get_str("city"), Ok("NYC"));
}

#[test]
fn test_concurrent_readers_observe_one_published_view() {
    let bytes = person_with_address();
    let document = RawDocument::parse(&bytes).unwrap();

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..8 {
            let document = &document;
            handles.push(scope.spawn(move || {
                let address = document.get_document("address").unwrap();
                assert_eq!(address.get_i32("zip"), Ok(10001));
                address as *const _ as usize
            }));
        }
        let addresses: Vec<usize> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        // Every thread observed the same published instance.
        for address in &addresses {
            assert_eq!(*address, addresses[0]);
        }
    });
}

#[test]
fn test_concurrent_scalar_reads_need_no_locking() {
    let bytes = person_with_address();
    let document = RawDocument::parse(&bytes).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let document = &document;
            scope.spawn(move || {
                for _ in 0..64 {
                    assert_eq!(document.get_str("name"), Ok("Bob"));
                    assert!(document.contains("address"));
                }
            });
        }
    });
}

#[test]
fn test_malformed_nested_payload_is_not_cached() {
    // Corrupt the tag of the "city" element inside the nested payload. The
    // root indexer skips over the nested span using its length alone, so the
    // root parse still succeeds.
    let mut bytes = person_with_address();
    let city_tag_offset = bytes
        .windows(5)
        .position(|window| window == b"city\x00")
        .unwrap()
        - 1;
    bytes[city_tag_offset] = 0x0C;

    // Indexing the root is unaffected, but materializing the nested view
    // fails every time. The error is not cached.
    let document = RawDocument::parse(&bytes).unwrap();
    assert!(matches!(
        document.get_document("address"),
        Err(Error::MalformedBson(_)),
    ));
    assert!(matches!(
        document.get_document("address"),
        Err(Error::MalformedBson(_)),
    ));
}
