//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! The column store behind the builder-backed values.
//!
//! Each appended entry records its tag and an index into exactly one "home"
//! column: the scalar columns for fixed-width values, a packed bitset for
//! booleans, the string column for text (including ObjectId hex and regex
//! pattern/options), and the complex column for everything else. Entries are
//! append-only; a document overwrite repurposes the entry's tag and local
//! index, leaving the stale home-column value logically dead.

use ordered_float::OrderedFloat;

use crate::builder::array::ArrayBuf;
use crate::builder::document::DocumentBuf;
use crate::document::ElementType;
use crate::error::{Error, Result};
use crate::json;

/// A packed bitset column for boolean entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Appends a bit and returns its index.
    pub(crate) fn push(&mut self, value: bool) -> u32 {
        let index = self.len;
        if index % 64 == 0 {
            self.words.push(0);
        }
        if value {
            self.words[index / 64] |= 1 << (index % 64);
        }
        self.len += 1;
        index as u32
    }

    pub(crate) fn get(&self, index: usize) -> bool {
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// A value homed in the complex column: anything that does not fit the
/// scalar, boolean or string columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Complex {
    Document(DocumentBuf),
    Array(ArrayBuf),
    Binary {
        subtype: u8,
        bytes: Vec<u8>,
    },
    CodeWithScope {
        code: String,
        scope: DocumentBuf,
    },
    Decimal128([u8; 16]),
    Null,
    Undefined,
    MinKey,
    MaxKey,
}

/// The parallel columns shared by the document and array variants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Columns {
    /// Per-entry tag.
    pub(crate) tags: Vec<ElementType>,
    /// Per-entry index into the home column selected by the tag.
    pub(crate) local_indices: Vec<u32>,
    pub(crate) ints: Vec<i32>,
    pub(crate) longs: Vec<i64>,
    pub(crate) doubles: Vec<OrderedFloat<f64>>,
    pub(crate) bools: BitSet,
    pub(crate) strings: Vec<String>,
    pub(crate) complex: Vec<Complex>,
}

impl Columns {

    /// Pre-allocation hint for the control columns. No observable effect.
    pub(crate) fn reserve_entries(&mut self, entries: usize) {
        self.tags.reserve(entries);
        self.local_indices.reserve(entries);
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.tags.len()
    }

    pub(crate) fn push_int(&mut self, value: i32) -> u32 {
        self.ints.push(value);
        (self.ints.len() - 1) as u32
    }

    pub(crate) fn push_long(&mut self, value: i64) -> u32 {
        self.longs.push(value);
        (self.longs.len() - 1) as u32
    }

    pub(crate) fn push_double(&mut self, value: f64) -> u32 {
        self.doubles.push(OrderedFloat(value));
        (self.doubles.len() - 1) as u32
    }

    pub(crate) fn push_bool(&mut self, value: bool) -> u32 {
        self.bools.push(value)
    }

    pub(crate) fn push_string(&mut self, value: String) -> u32 {
        self.strings.push(value);
        (self.strings.len() - 1) as u32
    }

    pub(crate) fn push_complex(&mut self, value: Complex) -> u32 {
        self.complex.push(value);
        (self.complex.len() - 1) as u32
    }

    fn expect_tag(&self, entry: usize, tag: ElementType) -> Result<usize> {
        if self.tags[entry] == tag {
            Ok(self.local_indices[entry] as usize)
        } else {
            Err(Error::TypeMismatch(tag))
        }
    }

    pub(crate) fn read_i32(&self, entry: usize) -> Result<i32> {
        let local = self.expect_tag(entry, ElementType::Int32)?;
        Ok(self.ints[local])
    }

    pub(crate) fn read_i64(&self, entry: usize) -> Result<i64> {
        let local = self.expect_tag(entry, ElementType::Int64)?;
        Ok(self.longs[local])
    }

    pub(crate) fn read_f64(&self, entry: usize) -> Result<f64> {
        let local = self.expect_tag(entry, ElementType::Double)?;
        Ok(self.doubles[local].into_inner())
    }

    pub(crate) fn read_bool(&self, entry: usize) -> Result<bool> {
        let local = self.expect_tag(entry, ElementType::Boolean)?;
        Ok(self.bools.get(local))
    }

    pub(crate) fn read_datetime(&self, entry: usize) -> Result<i64> {
        let local = self.expect_tag(entry, ElementType::DateTime)?;
        Ok(self.longs[local])
    }

    pub(crate) fn read_str(&self, entry: usize) -> Result<&str> {
        match self.tags[entry] {
            ElementType::String | ElementType::JavaScript | ElementType::Symbol => {}
            _ => return Err(Error::TypeMismatch(ElementType::String)),
        }
        Ok(&self.strings[self.local_indices[entry] as usize])
    }

    pub(crate) fn read_object_id(&self, entry: usize) -> Result<&str> {
        let local = self.expect_tag(entry, ElementType::ObjectId)?;
        Ok(&self.strings[local])
    }

    pub(crate) fn read_binary(&self, entry: usize) -> Result<&[u8]> {
        let local = self.expect_tag(entry, ElementType::Binary)?;
        match &self.complex[local] {
            Complex::Binary { bytes, .. } => Ok(bytes),
            _ => unreachable!("home column holds the variant of its tag"),
        }
    }

    pub(crate) fn read_document(&self, entry: usize) -> Result<&DocumentBuf> {
        let local = self.expect_tag(entry, ElementType::Document)?;
        match &self.complex[local] {
            Complex::Document(document) => Ok(document),
            _ => unreachable!("home column holds the variant of its tag"),
        }
    }

    pub(crate) fn read_array(&self, entry: usize) -> Result<&ArrayBuf> {
        let local = self.expect_tag(entry, ElementType::Array)?;
        match &self.complex[local] {
            Complex::Array(array) => Ok(array),
            _ => unreachable!("home column holds the variant of its tag"),
        }
    }

    pub(crate) fn is_null(&self, entry: usize) -> bool {
        matches!(self.tags[entry], ElementType::Null | ElementType::Undefined)
    }

    /// Compares the live entry of one column set against the live entry of
    /// another: same tag, element-wise equal home value.
    pub(crate) fn entry_eq(&self, entry: usize, other: &Columns, other_entry: usize) -> bool {
        let tag = self.tags[entry];
        if tag != other.tags[other_entry] {
            return false;
        }
        let local = self.local_indices[entry] as usize;
        let other_local = other.local_indices[other_entry] as usize;
        use ElementType::*;
        match tag {
            Int32 =>
                self.ints[local] == other.ints[other_local],
            Int64 | DateTime | Timestamp =>
                self.longs[local] == other.longs[other_local],
            Double =>
                self.doubles[local] == other.doubles[other_local],
            Boolean =>
                self.bools.get(local) == other.bools.get(other_local),
            String | JavaScript | Symbol | ObjectId =>
                self.strings[local] == other.strings[other_local],
            Regex =>
                self.strings[local] == other.strings[other_local]
                    && self.strings[local + 1] == other.strings[other_local + 1],
            Document | Array | Binary | JavaScriptWithScope | Decimal128
            | Null | Undefined | MinKey | MaxKey =>
                self.complex[local] == other.complex[other_local],
        }
    }

    /// Renders the live value of one entry as compact JSON-ish text.
    pub(crate) fn write_entry_json(&self, entry: usize, out: &mut String) {
        let tag = self.tags[entry];
        let local = self.local_indices[entry] as usize;
        use ElementType::*;
        match tag {
            Int32 =>
                out.push_str(&self.ints[local].to_string()),
            Int64 | DateTime =>
                out.push_str(&self.longs[local].to_string()),
            Timestamp =>
                out.push_str(&(self.longs[local] as u64).to_string()),
            Double =>
                out.push_str(&self.doubles[local].into_inner().to_string()),
            Boolean =>
                out.push_str(if self.bools.get(local) { "true" } else { "false" }),
            String | JavaScript | Symbol | ObjectId =>
                json::write_quoted(out, &self.strings[local]),
            Regex => {
                let pattern = &self.strings[local];
                let options = &self.strings[local + 1];
                json::write_quoted(out, &format!("/{}/{}", pattern, options));
            }
            Null | Undefined =>
                out.push_str("null"),
            Document => match &self.complex[local] {
                Complex::Document(document) => document.write_json(out),
                _ => unreachable!("home column holds the variant of its tag"),
            },
            Array => match &self.complex[local] {
                Complex::Array(array) => array.write_json(out),
                _ => unreachable!("home column holds the variant of its tag"),
            },
            Binary | JavaScriptWithScope | Decimal128 | MinKey | MaxKey =>
                out.push_str(json::UNSUPPORTED),
        }
    }

}
