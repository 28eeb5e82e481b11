//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::collections::{HashMap, HashSet};
use std::mem;

use crate::builder::array::ArrayBuf;
use crate::builder::columns::{Columns, Complex};
use crate::builder::BuilderState;
use crate::document::ElementType;
use crate::error::{Error, Result};
use crate::json;

/// One-shot builder for an in-memory document.
///
/// Appends are fluent and last-writer-wins: putting a value under an
/// existing name repurposes that entry rather than adding another. `build`
/// produces the immutable [`DocumentBuf`] exactly once; a second call fails
/// until [`DocumentBuilder::reset`] returns the builder to its fresh state.
///
/// The builder is single-owner; the produced value is safe to share across
/// threads.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    names: Vec<String>,
    entries: HashMap<String, usize>,
    cols: Columns,
    state: BuilderState,
}

impl DocumentBuilder {

    pub fn new() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// Pre-allocation hint for the expected number of fields. No observable
    /// effect.
    pub fn estimate_size(&mut self, fields: usize) -> &mut Self {
        self.names.reserve(fields);
        self.entries.reserve(fields);
        self.cols.reserve_entries(fields);
        self
    }

    fn put(&mut self, name: &str, tag: ElementType, local: u32) -> &mut Self {
        if let Some(&entry) = self.entries.get(name) {
            // Overwrite: the stale home-column value becomes dead.
            self.cols.tags[entry] = tag;
            self.cols.local_indices[entry] = local;
        } else {
            self.entries.insert(name.to_string(), self.cols.entry_count());
            self.names.push(name.to_string());
            self.cols.tags.push(tag);
            self.cols.local_indices.push(local);
        }
        if self.state == BuilderState::Fresh {
            self.state = BuilderState::Populated;
        }
        self
    }

    pub fn put_f64(&mut self, name: &str, value: f64) -> &mut Self {
        let local = self.cols.push_double(value);
        self.put(name, ElementType::Double, local)
    }

    pub fn put_str(&mut self, name: &str, value: &str) -> &mut Self {
        let local = self.cols.push_string(value.to_string());
        self.put(name, ElementType::String, local)
    }

    pub fn put_document(&mut self, name: &str, value: DocumentBuf) -> &mut Self {
        let local = self.cols.push_complex(Complex::Document(value));
        self.put(name, ElementType::Document, local)
    }

    pub fn put_array(&mut self, name: &str, value: ArrayBuf) -> &mut Self {
        let local = self.cols.push_complex(Complex::Array(value));
        self.put(name, ElementType::Array, local)
    }

    pub fn put_binary(&mut self, name: &str, subtype: u8, bytes: &[u8]) -> &mut Self {
        let local = self.cols.push_complex(Complex::Binary {
            subtype,
            bytes: bytes.to_vec(),
        });
        self.put(name, ElementType::Binary, local)
    }

    pub fn put_undefined(&mut self, name: &str) -> &mut Self {
        let local = self.cols.push_complex(Complex::Undefined);
        self.put(name, ElementType::Undefined, local)
    }

    /// Appends an ObjectId given as 24 hex characters.
    pub fn put_object_id(&mut self, name: &str, id: &str) -> &mut Self {
        let local = self.cols.push_string(id.to_string());
        self.put(name, ElementType::ObjectId, local)
    }

    pub fn put_bool(&mut self, name: &str, value: bool) -> &mut Self {
        let local = self.cols.push_bool(value);
        self.put(name, ElementType::Boolean, local)
    }

    pub fn put_datetime(&mut self, name: &str, millis: i64) -> &mut Self {
        let local = self.cols.push_long(millis);
        self.put(name, ElementType::DateTime, local)
    }

    pub fn put_null(&mut self, name: &str) -> &mut Self {
        let local = self.cols.push_complex(Complex::Null);
        self.put(name, ElementType::Null, local)
    }

    pub fn put_regex(&mut self, name: &str, pattern: &str, options: &str) -> &mut Self {
        let local = self.cols.push_string(pattern.to_string());
        self.cols.push_string(options.to_string());
        self.put(name, ElementType::Regex, local)
    }

    pub fn put_javascript(&mut self, name: &str, code: &str) -> &mut Self {
        let local = self.cols.push_string(code.to_string());
        self.put(name, ElementType::JavaScript, local)
    }

    pub fn put_symbol(&mut self, name: &str, value: &str) -> &mut Self {
        let local = self.cols.push_string(value.to_string());
        self.put(name, ElementType::Symbol, local)
    }

    pub fn put_javascript_with_scope(
        &mut self,
        name: &str,
        code: &str,
        scope: DocumentBuf,
    ) -> &mut Self {
        let local = self.cols.push_complex(Complex::CodeWithScope {
            code: code.to_string(),
            scope,
        });
        self.put(name, ElementType::JavaScriptWithScope, local)
    }

    pub fn put_i32(&mut self, name: &str, value: i32) -> &mut Self {
        let local = self.cols.push_int(value);
        self.put(name, ElementType::Int32, local)
    }

    pub fn put_timestamp(&mut self, name: &str, value: u64) -> &mut Self {
        let local = self.cols.push_long(value as i64);
        self.put(name, ElementType::Timestamp, local)
    }

    pub fn put_i64(&mut self, name: &str, value: i64) -> &mut Self {
        let local = self.cols.push_long(value);
        self.put(name, ElementType::Int64, local)
    }

    pub fn put_decimal128(&mut self, name: &str, bytes: [u8; 16]) -> &mut Self {
        let local = self.cols.push_complex(Complex::Decimal128(bytes));
        self.put(name, ElementType::Decimal128, local)
    }

    pub fn put_min_key(&mut self, name: &str) -> &mut Self {
        let local = self.cols.push_complex(Complex::MinKey);
        self.put(name, ElementType::MinKey, local)
    }

    pub fn put_max_key(&mut self, name: &str) -> &mut Self {
        let local = self.cols.push_complex(Complex::MaxKey);
        self.put(name, ElementType::MaxKey, local)
    }

    /// Produces the immutable document and marks the builder spent.
    pub fn build(&mut self) -> Result<DocumentBuf> {
        if self.state == BuilderState::Spent {
            return Err(Error::IllegalState("builder has already produced its value"));
        }
        self.state = BuilderState::Spent;
        Ok(DocumentBuf {
            names: mem::take(&mut self.names),
            entries: mem::take(&mut self.entries),
            cols: mem::take(&mut self.cols),
        })
    }

    /// Returns the builder to its fresh empty state, whether it is fresh,
    /// populated or spent.
    pub fn reset(&mut self) -> &mut Self {
        self.names.clear();
        self.entries.clear();
        self.cols = Columns::default();
        self.state = BuilderState::Fresh;
        self
    }

}

/// An immutable in-memory document produced by [`DocumentBuilder`].
///
/// Values live in parallel typed columns; each entry's tag selects the
/// column its value is homed in. The read surface mirrors the indexed view:
/// typed getters with and without defaults, introspection, and JSON
/// rendering.
///
/// Equality is name-keyed over the live entries. Comparing a `DocumentBuf`
/// against an indexed view is intentionally unsupported.
#[derive(Clone, Debug, Default)]
pub struct DocumentBuf {
    names: Vec<String>,
    entries: HashMap<String, usize>,
    cols: Columns,
}

impl DocumentBuf {

    fn expect(&self, name: &str) -> Result<usize> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    /// Reads an INT32 field.
    pub fn get_i32(&self, name: &str) -> Result<i32> {
        self.cols.read_i32(self.expect(name)?)
    }

    /// Reads an INT64 field.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.cols.read_i64(self.expect(name)?)
    }

    /// Reads a DOUBLE field.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.cols.read_f64(self.expect(name)?)
    }

    /// Reads a BOOLEAN field from the packed bitset column.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.cols.read_bool(self.expect(name)?)
    }

    /// Reads a DATE_TIME field as milliseconds since the Unix epoch.
    pub fn get_datetime(&self, name: &str) -> Result<i64> {
        self.cols.read_datetime(self.expect(name)?)
    }

    /// Reads the text of a STRING, JAVASCRIPT or SYMBOL field.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.cols.read_str(self.expect(name)?)
    }

    /// Reads an OBJECT_ID field as 24 hex characters.
    pub fn get_object_id(&self, name: &str) -> Result<&str> {
        self.cols.read_object_id(self.expect(name)?)
    }

    /// Reads the payload of a BINARY field.
    pub fn get_binary(&self, name: &str) -> Result<&[u8]> {
        self.cols.read_binary(self.expect(name)?)
    }

    /// Returns a nested DOCUMENT field.
    pub fn get_document(&self, name: &str) -> Result<&DocumentBuf> {
        self.cols.read_document(self.expect(name)?)
    }

    /// Returns a nested ARRAY field.
    pub fn get_array(&self, name: &str) -> Result<&ArrayBuf> {
        self.cols.read_array(self.expect(name)?)
    }

    pub fn get_i32_or(&self, name: &str, default: i32) -> i32 {
        self.get_i32(name).unwrap_or(default)
    }

    pub fn get_i64_or(&self, name: &str, default: i64) -> i64 {
        self.get_i64(name).unwrap_or(default)
    }

    pub fn get_f64_or(&self, name: &str, default: f64) -> f64 {
        self.get_f64(name).unwrap_or(default)
    }

    pub fn get_bool_or(&self, name: &str, default: bool) -> bool {
        self.get_bool(name).unwrap_or(default)
    }

    pub fn get_datetime_or(&self, name: &str, default: i64) -> i64 {
        self.get_datetime(name).unwrap_or(default)
    }

    pub fn get_str_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.get_str(name).unwrap_or(default)
    }

    pub fn get_object_id_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.get_object_id(name).unwrap_or(default)
    }

    pub fn get_binary_or<'s>(&'s self, name: &str, default: &'s [u8]) -> &'s [u8] {
        self.get_binary(name).unwrap_or(default)
    }

    pub fn get_document_or<'s>(&'s self, name: &str, default: &'s DocumentBuf) -> &'s DocumentBuf {
        self.get_document(name).unwrap_or(default)
    }

    pub fn get_array_or<'s>(&'s self, name: &str, default: &'s ArrayBuf) -> &'s ArrayBuf {
        self.get_array(name).unwrap_or(default)
    }

    /// True when the document has a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True when the field is present and typed NULL or UNDEFINED.
    pub fn is_null(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map_or(false, |&entry| self.cols.is_null(entry))
    }

    /// The stored tag of the named field, or `None` when absent.
    pub fn element_type(&self, name: &str) -> Option<ElementType> {
        self.entries.get(name).map(|&entry| self.cols.tags[entry])
    }

    /// The number of fields in the document.
    pub fn len(&self) -> usize {
        self.cols.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.entry_count() == 0
    }

    /// The set of field names. The set is unordered by contract.
    pub fn field_names(&self) -> HashSet<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Renders the document as compact JSON-ish text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push('{');
        for (position, name) in self.names.iter().enumerate() {
            if position > 0 {
                out.push(',');
            }
            out.push('"');
            json::escape_into(out, name);
            out.push_str("\":");
            self.cols.write_entry_json(self.entries[name], out);
        }
        out.push('}');
    }

}

impl PartialEq for DocumentBuf {
    /// Name-keyed comparison over the live entries: dead home-column values
    /// left behind by overwrites do not participate.
    fn eq(&self, other: &DocumentBuf) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().all(|(name, &entry)| {
            other.entries.get(name).map_or(false, |&other_entry| {
                self.cols.entry_eq(entry, &other.cols, other_entry)
            })
        })
    }
}

impl Eq for DocumentBuf {}
