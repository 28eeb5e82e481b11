//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod common;

use std::collections::HashSet;

use common::Doc;
use lazybson::{Error, RawDocument};
use proptest::prelude::*;

// "Aa", "BB" and "C#" share a polynomial-31 hash; only the first two are
// present in the documents below.

#[test]
fn test_colliding_names_resolve_to_their_own_values() {
    let bytes = Doc::new().int32("Aa", 1).int32("BB", 2).build();
    let document = RawDocument::parse(&bytes).unwrap();

    assert_eq!(document.get_i32("Aa"), Ok(1));
    assert_eq!(document.get_i32("BB"), Ok(2));
}

#[test]
fn test_colliding_absent_name_reports_absent() {
    let bytes = Doc::new().int32("Aa", 1).int32("BB", 2).build();
    let document = RawDocument::parse(&bytes).unwrap();

    assert!(!document.contains("C#"));
    assert!(matches!(document.get("C#"), Ok(None)));
    assert_eq!(
        document.get_i32("C#"),
        Err(Error::FieldNotFound(String::from("C#"))),
    );
    assert_eq!(document.element_type("C#"), None);
}

#[test]
fn test_collision_run_order_does_not_matter() {
    let forward = Doc::new().int32("Aa", 1).int32("BB", 2).build();
    let backward = Doc::new().int32("BB", 2).int32("Aa", 1).build();

    for bytes in [forward, backward] {
        let document = RawDocument::parse(&bytes).unwrap();
        assert_eq!(document.get_i32("Aa"), Ok(1));
        assert_eq!(document.get_i32("BB"), Ok(2));
    }
}

#[test]
fn test_longer_collision_runs() {
    // Concatenations of colliding pairs collide as well: every name here
    // shares one hash.
    let names = ["AaAa", "AaBB", "BBAa", "BBBB"];
    let mut doc = Doc::new();
    for (value, name) in names.iter().enumerate() {
        doc = doc.int32(name, value as i32);
    }
    let bytes = doc.build();
    let document = RawDocument::parse(&bytes).unwrap();

    for (value, name) in names.iter().enumerate() {
        assert_eq!(document.get_i32(name), Ok(value as i32));
    }
    assert!(!document.contains("AaC#"));
    assert!(!document.contains("C#BB"));
}

proptest! {
    #[test]
    fn prop_every_field_is_locatable(names in proptest::collection::hash_set("[a-zA-Z0-9_]{1,12}", 1..24)) {
        let names: Vec<String> = names.into_iter().collect();
        let mut doc = Doc::new();
        for (value, name) in names.iter().enumerate() {
            doc = doc.int32(name, value as i32);
        }
        let bytes = doc.build();
        let document = RawDocument::parse(&bytes).unwrap();

        prop_assert_eq!(document.len(), names.len());
        for (value, name) in names.iter().enumerate() {
            prop_assert_eq!(document.get_i32(name), Ok(value as i32));
            prop_assert!(document.contains(name));
        }
    }

    #[test]
    fn prop_absent_probes_report_absent(
        names in proptest::collection::hash_set("[a-z]{1,8}", 1..12),
        probes in proptest::collection::vec("[A-Z#]{1,8}", 1..12),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut doc = Doc::new();
        for (value, name) in names.iter().enumerate() {
            doc = doc.int32(name, value as i32);
        }
        let bytes = doc.build();
        let document = RawDocument::parse(&bytes).unwrap();

        let present: HashSet<&str> = names.iter().map(String::as_str).collect();
        for probe in &probes {
            if !present.contains(probe.as_str()) {
                prop_assert!(!document.contains(probe));
                prop_assert!(matches!(document.get(probe), Ok(None)));
            }
        }
    }

    #[test]
    fn prop_field_names_match_the_input_set(names in proptest::collection::hash_set("[a-zA-Z]{1,10}", 0..16)) {
        let mut doc = Doc::new();
        for name in &names {
            doc = doc.boolean(name, true);
        }
        let bytes = doc.build();
        let document = RawDocument::parse(&bytes).unwrap();

        let observed: HashSet<String> = document
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        prop_assert_eq!(observed, names);
    }
}
