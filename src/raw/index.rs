//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! The element indexer and the field directory.
//!
//! A single forward pass over a document byte range produces one compact
//! descriptor per element, recording where its name and payload live without
//! decoding the payload. Document views then sort the descriptors by name
//! hash, which turns field lookup into a binary search plus a short sweep
//! over the equal-hash run. Array views keep the descriptors in source order
//! so that descriptor index and logical index coincide.

use crate::document::{ElementType, PayloadLayout, MIN_DOCUMENT_SIZE};
use crate::error::{Error, Result};
use crate::raw::parser;

/// Identifies one element within a parsed byte range.
///
/// Offsets are relative to the start of the owning byte slice, not to the
/// start of the document, so nested views share descriptors' coordinate
/// space with their root.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct ElementDescriptor {
    /// The element tag.
    pub tag: ElementType,
    /// Polynomial-31 hash of the raw UTF-8 name bytes.
    pub name_hash: i32,
    /// Byte offset of the element name within the owning slice.
    pub name_offset: u32,
    /// Number of UTF-8 bytes in the name, excluding the NUL.
    pub name_length: u32,
    /// Byte offset of the first payload byte.
    pub value_offset: u32,
    /// Payload size in bytes, not counting the tag or name.
    pub value_size: u32,
}

impl ElementDescriptor {
    /// The raw UTF-8 bytes of the element name.
    pub(crate) fn name_bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = self.name_offset as usize;
        &data[start..start + self.name_length as usize]
    }

    pub(crate) fn value_start(&self) -> usize {
        self.value_offset as usize
    }

    pub(crate) fn value_end(&self) -> usize {
        (self.value_offset + self.value_size) as usize
    }
}

/// The rolling polynomial name hash: multiplier 31, accumulator starting at
/// zero, applied to the UTF-8 bytes in order, wrapping at 32 bits. Bytes
/// widen unsigned. Collisions exist and the locator tolerates them.
pub(crate) fn name_hash(name: &[u8]) -> i32 {
    name.iter().fold(0i32, |hash, &byte| {
        hash.wrapping_mul(31).wrapping_add(i32::from(byte))
    })
}

/// Walks the elements of the document occupying `[offset, offset + length)`
/// and returns one descriptor per element, in source order.
///
/// The walk stops at the 0x00 terminator, or defensively at the declared end
/// for malformed inputs that lack one. An unknown tag or an element whose
/// span would cross the declared end is a `MalformedBson` failure.
pub(crate) fn index_elements(
    data: &[u8],
    offset: usize,
    length: usize,
) -> Result<Vec<ElementDescriptor>> {
    let end = offset + length;
    let mut fields = Vec::new();
    let mut pos = offset + 4;

    while pos < end {
        let tag_byte = data[pos];
        if tag_byte == 0x00 {
            break;
        }
        let element_offset = pos;
        let tag = ElementType::from_byte(tag_byte).ok_or_else(|| {
            Error::malformed(format!(
                "unknown element tag 0x{:02x} at offset {}", tag_byte, pos,
            ))
        })?;

        let name_offset = pos + 1;
        let name = parser::cstring_at(data, name_offset, end)?;
        let value_offset = name_offset + name.len() + 1;
        let value_size = payload_size(data, tag, value_offset, end)?;
        let value_end = value_offset
            .checked_add(value_size)
            .filter(|&value_end| value_end <= end)
            .ok_or_else(|| {
                Error::malformed(format!(
                    "element at offset {} crosses the document end", element_offset,
                ))
            })?;

        fields.push(ElementDescriptor {
            tag,
            name_hash: name_hash(name),
            name_offset: name_offset as u32,
            name_length: name.len() as u32,
            value_offset: value_offset as u32,
            value_size: value_size as u32,
        });
        pos = value_end;
    }

    Ok(fields)
}

/// Computes the payload size of an element from its layout, reading at most
/// one length prefix.
fn payload_size(
    data: &[u8],
    tag: ElementType,
    at: usize,
    end: usize,
) -> Result<usize> {
    match tag.layout() {
        PayloadLayout::Fixed(size) =>
            Ok(size),
        PayloadLayout::LengthPrefixedText => {
            let length = parser::int32_at(data, at)?;
            if length < 1 {
                return Err(implausible_length(tag, at, length));
            }
            Ok(4 + length as usize)
        }
        PayloadLayout::LengthInclusive => {
            let length = parser::int32_at(data, at)?;
            if length < MIN_DOCUMENT_SIZE as i32 {
                return Err(implausible_length(tag, at, length));
            }
            Ok(length as usize)
        }
        PayloadLayout::Binary => {
            let length = parser::int32_at(data, at)?;
            if length < 0 {
                return Err(implausible_length(tag, at, length));
            }
            Ok(4 + 1 + length as usize)
        }
        PayloadLayout::CStringPair => {
            let pattern = parser::cstring_at(data, at, end)?;
            let options = parser::cstring_at(data, at + pattern.len() + 1, end)?;
            Ok(pattern.len() + options.len() + 2)
        }
    }
}

fn implausible_length(tag: ElementType, at: usize, length: i32) -> Error {
    Error::malformed(format!(
        "{} element at offset {} declares implausible length {}",
        tag.name(), at, length,
    ))
}

/// Sorts a descriptor list by name hash. The sort is stable so that
/// equal-hash elements retain source order, which keeps collision sweeps
/// deterministic.
pub(crate) fn sort_by_hash(fields: &mut [ElementDescriptor]) {
    fields.sort_by_key(|descriptor| descriptor.name_hash);
}

/// Finds the descriptor for the named field in a hash-sorted directory.
///
/// Binary search may land anywhere within an equal-hash run, so after a
/// failed compare at the landing point the run is swept forward and then
/// backward, comparing full name bytes at each step. Absent names that
/// collide with present ones fall out of the sweep with no match.
pub(crate) fn locate(
    fields: &[ElementDescriptor],
    data: &[u8],
    name: &str,
) -> Option<usize> {
    let hash = name_hash(name.as_bytes());
    let hit = fields
        .binary_search_by(|descriptor| descriptor.name_hash.cmp(&hash))
        .ok()?;

    if name_matches(&fields[hit], data, name) {
        return Some(hit);
    }
    let mut index = hit + 1;
    while index < fields.len() && fields[index].name_hash == hash {
        if name_matches(&fields[index], data, name) {
            return Some(index);
        }
        index += 1;
    }
    let mut index = hit;
    while index > 0 {
        index -= 1;
        if fields[index].name_hash != hash {
            break;
        }
        if name_matches(&fields[index], data, name) {
            return Some(index);
        }
    }
    None
}

fn name_matches(descriptor: &ElementDescriptor, data: &[u8], name: &str) -> bool {
    descriptor.name_length as usize == name.len()
        && descriptor.name_bytes(data) == name.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash_known_values() {
        assert_eq!(name_hash(b""), 0);
        assert_eq!(name_hash(b"a"), 97);
        assert_eq!(name_hash(b"age"), 96511);
    }

    #[test]
    fn test_name_hash_collisions() {
        // "Aa", "BB" and "C#" all hash to 2112 under polynomial-31.
        assert_eq!(name_hash(b"Aa"), 2112);
        assert_eq!(name_hash(b"Aa"), name_hash(b"BB"));
        assert_eq!(name_hash(b"Aa"), name_hash(b"C#"));
        assert_ne!(name_hash(b"Aa"), name_hash(b"Cc"));
    }

    // { "age": 30, "name": "Bob" }
    const TWO_FIELDS: &[u8] = &[
        0x1C, 0x00, 0x00, 0x00,
        0x10, 0x61, 0x67, 0x65, 0x00, 0x1E, 0x00, 0x00, 0x00,
        0x02, 0x6E, 0x61, 0x6D, 0x65, 0x00, 0x04, 0x00, 0x00, 0x00, 0x42, 0x6F, 0x62, 0x00,
        0x00,
    ];

    #[test]
    fn test_index_elements_source_order() {
        let fields = index_elements(TWO_FIELDS, 0, TWO_FIELDS.len()).unwrap();
        assert_eq!(fields.len(), 2);

        assert_eq!(fields[0].tag, ElementType::Int32);
        assert_eq!(fields[0].name_bytes(TWO_FIELDS), b"age");
        assert_eq!(fields[0].name_hash, name_hash(b"age"));
        assert_eq!(fields[0].name_offset, 5);
        assert_eq!(fields[0].name_length, 3);
        assert_eq!(fields[0].value_offset, 9);
        assert_eq!(fields[0].value_size, 4);

        assert_eq!(fields[1].tag, ElementType::String);
        assert_eq!(fields[1].name_bytes(TWO_FIELDS), b"name");
        assert_eq!(fields[1].value_offset, 19);
        assert_eq!(fields[1].value_size, 8);
    }

    #[test]
    fn test_index_elements_descriptor_spans_nest_in_document() {
        let fields = index_elements(TWO_FIELDS, 0, TWO_FIELDS.len()).unwrap();
        for descriptor in &fields {
            let name_end = (descriptor.name_offset + descriptor.name_length + 1) as usize;
            assert!(name_end <= descriptor.value_start());
            assert!(descriptor.value_end() <= TWO_FIELDS.len());
        }
    }

    #[test]
    fn test_index_elements_empty_document() {
        let input = &[0x05, 0x00, 0x00, 0x00, 0x00];
        let fields = index_elements(input, 0, input.len()).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_index_elements_stops_at_declared_end_without_terminator() {
        // Declared length covers the prefix and one element but no 0x00
        // terminator; the defensive bound ends the walk.
        let input = &[
            0x0B, 0x00, 0x00, 0x00,
            0x10, 0x61, 0x00, 0x2A, 0x00, 0x00, 0x00,
        ];
        let fields = index_elements(input, 0, input.len()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name_bytes(input), b"a");
    }

    #[test]
    fn test_index_elements_rejects_unknown_tag() {
        let input = &[
            0x0D, 0x00, 0x00, 0x00,
            0x0C, 0x61, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x00,
            0x00,
        ];
        let result = index_elements(input, 0, input.len());
        assert!(matches!(result, Err(Error::MalformedBson(_))));
    }

    #[test]
    fn test_index_elements_rejects_element_crossing_end() {
        // An int64 element whose 8-byte payload runs past the declared end.
        let input = &[
            0x0B, 0x00, 0x00, 0x00,
            0x12, 0x61, 0x00, 0x2A, 0x00, 0x00, 0x00,
        ];
        let result = index_elements(input, 0, input.len());
        assert!(matches!(result, Err(Error::MalformedBson(_))));
    }

    #[test]
    fn test_index_elements_rejects_negative_string_length() {
        let input = &[
            0x10, 0x00, 0x00, 0x00,
            0x02, 0x61, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
            0x00,
        ];
        let result = index_elements(input, 0, input.len());
        assert!(matches!(result, Err(Error::MalformedBson(_))));
    }

    // { "Aa": 1, "BB": 2 } — both names hash to 2112.
    const COLLIDING: &[u8] = &[
        0x15, 0x00, 0x00, 0x00,
        0x10, 0x41, 0x61, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x10, 0x42, 0x42, 0x00, 0x02, 0x00, 0x00, 0x00,
        0x00,
    ];

    #[test]
    fn test_sort_by_hash_is_stable_for_equal_hashes() {
        let mut fields = index_elements(COLLIDING, 0, COLLIDING.len()).unwrap();
        sort_by_hash(&mut fields);
        assert_eq!(fields[0].name_bytes(COLLIDING), b"Aa");
        assert_eq!(fields[1].name_bytes(COLLIDING), b"BB");
    }

    #[test]
    fn test_locate_resolves_colliding_names() {
        let mut fields = index_elements(COLLIDING, 0, COLLIDING.len()).unwrap();
        sort_by_hash(&mut fields);

        let aa = locate(&fields, COLLIDING, "Aa").unwrap();
        let bb = locate(&fields, COLLIDING, "BB").unwrap();
        assert_ne!(aa, bb);
        assert_eq!(fields[aa].name_bytes(COLLIDING), b"Aa");
        assert_eq!(fields[bb].name_bytes(COLLIDING), b"BB");
    }

    #[test]
    fn test_locate_rejects_absent_name_in_collision_run() {
        let mut fields = index_elements(COLLIDING, 0, COLLIDING.len()).unwrap();
        sort_by_hash(&mut fields);

        // "C#" shares the 2112 hash but is not present.
        assert_eq!(locate(&fields, COLLIDING, "C#"), None);
        assert_eq!(locate(&fields, COLLIDING, "Cc"), None);
        assert_eq!(locate(&fields, COLLIDING, ""), None);
    }

    #[test]
    fn test_locate_is_idempotent() {
        let mut fields = index_elements(TWO_FIELDS, 0, TWO_FIELDS.len()).unwrap();
        sort_by_hash(&mut fields);
        let first = locate(&fields, TWO_FIELDS, "age");
        for _ in 0..8 {
            assert_eq!(locate(&fields, TWO_FIELDS, "age"), first);
        }
    }
}
