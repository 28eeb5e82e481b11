//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::mem;

use crate::builder::columns::{Columns, Complex};
use crate::builder::document::DocumentBuf;
use crate::builder::BuilderState;
use crate::document::ElementType;
use crate::error::{Error, Result};
use crate::json;

/// One-shot builder for an in-memory array.
///
/// Appends are positional: each push becomes the next element. `build`
/// produces the immutable [`ArrayBuf`] exactly once; a second call fails
/// until [`ArrayBuilder::reset`] returns the builder to its fresh state.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    cols: Columns,
    state: BuilderState,
}

impl ArrayBuilder {

    pub fn new() -> ArrayBuilder {
        ArrayBuilder::default()
    }

    /// Pre-allocation hint for the expected number of elements. No
    /// observable effect.
    pub fn estimate_size(&mut self, elements: usize) -> &mut Self {
        self.cols.reserve_entries(elements);
        self
    }

    fn push(&mut self, tag: ElementType, local: u32) -> &mut Self {
        self.cols.tags.push(tag);
        self.cols.local_indices.push(local);
        if self.state == BuilderState::Fresh {
            self.state = BuilderState::Populated;
        }
        self
    }

    pub fn push_f64(&mut self, value: f64) -> &mut Self {
        let local = self.cols.push_double(value);
        self.push(ElementType::Double, local)
    }

    pub fn push_str(&mut self, value: &str) -> &mut Self {
        let local = self.cols.push_string(value.to_string());
        self.push(ElementType::String, local)
    }

    pub fn push_document(&mut self, value: DocumentBuf) -> &mut Self {
        let local = self.cols.push_complex(Complex::Document(value));
        self.push(ElementType::Document, local)
    }

    pub fn push_array(&mut self, value: ArrayBuf) -> &mut Self {
        let local = self.cols.push_complex(Complex::Array(value));
        self.push(ElementType::Array, local)
    }

    pub fn push_binary(&mut self, subtype: u8, bytes: &[u8]) -> &mut Self {
        let local = self.cols.push_complex(Complex::Binary {
            subtype,
            bytes: bytes.to_vec(),
        });
        self.push(ElementType::Binary, local)
    }

    pub fn push_undefined(&mut self) -> &mut Self {
        let local = self.cols.push_complex(Complex::Undefined);
        self.push(ElementType::Undefined, local)
    }

    /// Appends an ObjectId given as 24 hex characters.
    pub fn push_object_id(&mut self, id: &str) -> &mut Self {
        let local = self.cols.push_string(id.to_string());
        self.push(ElementType::ObjectId, local)
    }

    pub fn push_bool(&mut self, value: bool) -> &mut Self {
        let local = self.cols.push_bool(value);
        self.push(ElementType::Boolean, local)
    }

    pub fn push_datetime(&mut self, millis: i64) -> &mut Self {
        let local = self.cols.push_long(millis);
        self.push(ElementType::DateTime, local)
    }

    pub fn push_null(&mut self) -> &mut Self {
        let local = self.cols.push_complex(Complex::Null);
        self.push(ElementType::Null, local)
    }

    pub fn push_regex(&mut self, pattern: &str, options: &str) -> &mut Self {
        let local = self.cols.push_string(pattern.to_string());
        self.cols.push_string(options.to_string());
        self.push(ElementType::Regex, local)
    }

    pub fn push_javascript(&mut self, code: &str) -> &mut Self {
        let local = self.cols.push_string(code.to_string());
        self.push(ElementType::JavaScript, local)
    }

    pub fn push_symbol(&mut self, value: &str) -> &mut Self {
        let local = self.cols.push_string(value.to_string());
        self.push(ElementType::Symbol, local)
    }

    pub fn push_javascript_with_scope(&mut self, code: &str, scope: DocumentBuf) -> &mut Self {
        let local = self.cols.push_complex(Complex::CodeWithScope {
            code: code.to_string(),
            scope,
        });
        self.push(ElementType::JavaScriptWithScope, local)
    }

    pub fn push_i32(&mut self, value: i32) -> &mut Self {
        let local = self.cols.push_int(value);
        self.push(ElementType::Int32, local)
    }

    pub fn push_timestamp(&mut self, value: u64) -> &mut Self {
        let local = self.cols.push_long(value as i64);
        self.push(ElementType::Timestamp, local)
    }

    pub fn push_i64(&mut self, value: i64) -> &mut Self {
        let local = self.cols.push_long(value);
        self.push(ElementType::Int64, local)
    }

    pub fn push_decimal128(&mut self, bytes: [u8; 16]) -> &mut Self {
        let local = self.cols.push_complex(Complex::Decimal128(bytes));
        self.push(ElementType::Decimal128, local)
    }

    pub fn push_min_key(&mut self) -> &mut Self {
        let local = self.cols.push_complex(Complex::MinKey);
        self.push(ElementType::MinKey, local)
    }

    pub fn push_max_key(&mut self) -> &mut Self {
        let local = self.cols.push_complex(Complex::MaxKey);
        self.push(ElementType::MaxKey, local)
    }

    /// Produces the immutable array and marks the builder spent.
    pub fn build(&mut self) -> Result<ArrayBuf> {
        if self.state == BuilderState::Spent {
            return Err(Error::IllegalState("builder has already produced its value"));
        }
        self.state = BuilderState::Spent;
        Ok(ArrayBuf {
            cols: mem::take(&mut self.cols),
        })
    }

    /// Returns the builder to its fresh empty state, whether it is fresh,
    /// populated or spent.
    pub fn reset(&mut self) -> &mut Self {
        self.cols = Columns::default();
        self.state = BuilderState::Fresh;
        self
    }

}

/// An immutable in-memory array produced by [`ArrayBuilder`].
///
/// Equality is ordered and element-wise over the columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayBuf {
    cols: Columns,
}

impl ArrayBuf {

    fn expect(&self, index: usize) -> Result<usize> {
        if index < self.cols.entry_count() {
            Ok(index)
        } else {
            Err(Error::IndexOutOfBounds(index))
        }
    }

    /// Reads the INT32 element at `index`.
    pub fn get_i32(&self, index: usize) -> Result<i32> {
        self.cols.read_i32(self.expect(index)?)
    }

    /// Reads the INT64 element at `index`.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        self.cols.read_i64(self.expect(index)?)
    }

    /// Reads the DOUBLE element at `index`.
    pub fn get_f64(&self, index: usize) -> Result<f64> {
        self.cols.read_f64(self.expect(index)?)
    }

    /// Reads the BOOLEAN element at `index` from the packed bitset column.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.cols.read_bool(self.expect(index)?)
    }

    /// Reads the DATE_TIME element at `index`.
    pub fn get_datetime(&self, index: usize) -> Result<i64> {
        self.cols.read_datetime(self.expect(index)?)
    }

    /// Reads the text of the STRING, JAVASCRIPT or SYMBOL element at `index`.
    pub fn get_str(&self, index: usize) -> Result<&str> {
        self.cols.read_str(self.expect(index)?)
    }

    /// Reads the OBJECT_ID element at `index` as 24 hex characters.
    pub fn get_object_id(&self, index: usize) -> Result<&str> {
        self.cols.read_object_id(self.expect(index)?)
    }

    /// Reads the payload of the BINARY element at `index`.
    pub fn get_binary(&self, index: usize) -> Result<&[u8]> {
        self.cols.read_binary(self.expect(index)?)
    }

    /// Returns the nested DOCUMENT element at `index`.
    pub fn get_document(&self, index: usize) -> Result<&DocumentBuf> {
        self.cols.read_document(self.expect(index)?)
    }

    /// Returns the nested ARRAY element at `index`.
    pub fn get_array(&self, index: usize) -> Result<&ArrayBuf> {
        self.cols.read_array(self.expect(index)?)
    }

    pub fn get_i32_or(&self, index: usize, default: i32) -> i32 {
        self.get_i32(index).unwrap_or(default)
    }

    pub fn get_i64_or(&self, index: usize, default: i64) -> i64 {
        self.get_i64(index).unwrap_or(default)
    }

    pub fn get_f64_or(&self, index: usize, default: f64) -> f64 {
        self.get_f64(index).unwrap_or(default)
    }

    pub fn get_bool_or(&self, index: usize, default: bool) -> bool {
        self.get_bool(index).unwrap_or(default)
    }

    pub fn get_datetime_or(&self, index: usize, default: i64) -> i64 {
        self.get_datetime(index).unwrap_or(default)
    }

    pub fn get_str_or<'s>(&'s self, index: usize, default: &'s str) -> &'s str {
        self.get_str(index).unwrap_or(default)
    }

    pub fn get_object_id_or<'s>(&'s self, index: usize, default: &'s str) -> &'s str {
        self.get_object_id(index).unwrap_or(default)
    }

    pub fn get_binary_or<'s>(&'s self, index: usize, default: &'s [u8]) -> &'s [u8] {
        self.get_binary(index).unwrap_or(default)
    }

    pub fn get_document_or<'s>(&'s self, index: usize, default: &'s DocumentBuf) -> &'s DocumentBuf {
        self.get_document(index).unwrap_or(default)
    }

    pub fn get_array_or<'s>(&'s self, index: usize, default: &'s ArrayBuf) -> &'s ArrayBuf {
        self.get_array(index).unwrap_or(default)
    }

    /// True when the element at `index` exists and is typed NULL or
    /// UNDEFINED.
    pub fn is_null(&self, index: usize) -> bool {
        index < self.cols.entry_count() && self.cols.is_null(index)
    }

    /// The stored tag of the element at `index`, or `None` when out of
    /// range.
    pub fn element_type(&self, index: usize) -> Option<ElementType> {
        if index < self.cols.entry_count() {
            Some(self.cols.tags[index])
        } else {
            None
        }
    }

    /// The number of elements in the array.
    pub fn len(&self) -> usize {
        self.cols.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.entry_count() == 0
    }

    /// Renders the array as compact JSON-ish text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push('[');
        for entry in 0..self.cols.entry_count() {
            if entry > 0 {
                out.push(',');
            }
            self.cols.write_entry_json(entry, out);
        }
        out.push(']');
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_reads() {
        let mut builder = ArrayBuilder::new();
        builder.push_i32(10).push_str("mid").push_bool(false);
        let array = builder.build().unwrap();

        assert_eq!(array.len(), 3);
        assert_eq!(array.get_i32(0), Ok(10));
        assert_eq!(array.get_str(1), Ok("mid"));
        assert_eq!(array.get_bool(2), Ok(false));
        assert_eq!(array.get_i32(3), Err(Error::IndexOutOfBounds(3)));
        assert_eq!(array.get_i32_or(3, -1), -1);
    }

    #[test]
    fn test_build_succeeds_once_and_reset_revives() {
        let mut builder = ArrayBuilder::new();
        builder.push_i32(1);
        let _ = builder.build().unwrap();
        assert!(builder.build().is_err());

        builder.reset().push_i32(2);
        let array = builder.build().unwrap();
        assert_eq!(array.get_i32(0), Ok(2));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_equality_is_ordered_and_element_wise() {
        let mut builder = ArrayBuilder::new();
        builder.push_i32(1).push_str("two");
        let first = builder.build().unwrap();

        builder.reset().push_i32(1).push_str("two");
        let same = builder.build().unwrap();
        assert_eq!(first, same);

        builder.reset().push_str("two").push_i32(1);
        let reordered = builder.build().unwrap();
        assert_ne!(first, reordered);
    }

    #[test]
    fn test_empty_array_renders_brackets() {
        let mut builder = ArrayBuilder::new();
        let array = builder.build().unwrap();
        assert!(array.is_empty());
        assert_eq!(array.to_json(), "[]");
    }
}
