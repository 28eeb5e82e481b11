//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::borrow::Cow;

use crate::document::{ElementType, MIN_DOCUMENT_SIZE};
use crate::error::{Error, Result};
use crate::json;
use crate::raw::body::RawBody;
use crate::raw::document::RawDocument;
use crate::value::Value;

/// A read-only, random-access view over the bytes of a BSON array.
///
/// An array is a document whose element names are the decimal renderings of
/// the element indices; the indexer hashes and records those names for
/// uniformity, but accessors address elements by position. The directory is
/// kept in source order, so the descriptor at position `i` is the array's
/// logical element `i`.
#[derive(Debug)]
pub struct RawArray<'a> {
    body: RawBody<'a>,
}

impl<'a> RawArray<'a> {

    /// Parses an array spanning the entire input slice.
    pub fn parse(bytes: &'a [u8]) -> Result<RawArray<'a>> {
        if bytes.len() < MIN_DOCUMENT_SIZE {
            return Err(Error::InvalidInput("an array needs at least 5 bytes"));
        }
        Ok(RawArray {
            body: RawBody::index_array(bytes, 0, None)?,
        })
    }

    /// Parses the array occupying `[offset, offset + length)` of the input
    /// slice.
    pub fn parse_at(bytes: &'a [u8], offset: usize, length: usize) -> Result<RawArray<'a>> {
        if length < MIN_DOCUMENT_SIZE
            || offset.checked_add(length).map_or(true, |end| end > bytes.len())
        {
            return Err(Error::InvalidInput("array range does not fit the input"));
        }
        Ok(RawArray {
            body: RawBody::index_array(bytes, offset, Some(length))?,
        })
    }

    pub(crate) fn from_body(body: RawBody<'a>) -> RawArray<'a> {
        RawArray { body }
    }

    pub(crate) fn body(&self) -> &RawBody<'a> {
        &self.body
    }

    fn expect(&self, index: usize) -> Result<usize> {
        if index < self.body.len() {
            Ok(index)
        } else {
            Err(Error::IndexOutOfBounds(index))
        }
    }

    /// Reads the INT32 element at `index`.
    pub fn get_i32(&self, index: usize) -> Result<i32> {
        self.body.read_i32(self.expect(index)?)
    }

    /// Reads the INT64 element at `index`.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        self.body.read_i64(self.expect(index)?)
    }

    /// Reads the DOUBLE element at `index`.
    pub fn get_f64(&self, index: usize) -> Result<f64> {
        self.body.read_f64(self.expect(index)?)
    }

    /// Reads the BOOLEAN element at `index`.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.body.read_bool(self.expect(index)?)
    }

    /// Reads the DATE_TIME element at `index`.
    pub fn get_datetime(&self, index: usize) -> Result<i64> {
        self.body.read_datetime(self.expect(index)?)
    }

    /// Reads the text of the STRING, JAVASCRIPT or SYMBOL element at `index`.
    pub fn get_str(&self, index: usize) -> Result<&'a str> {
        self.body.read_str(self.expect(index)?)
    }

    /// Reads the OBJECT_ID element at `index` as 24 lowercase hex characters.
    pub fn get_object_id(&self, index: usize) -> Result<&str> {
        self.body.read_object_id(self.expect(index)?)
    }

    /// Reads the payload of the BINARY element at `index`.
    pub fn get_binary(&self, index: usize) -> Result<&'a [u8]> {
        self.body.read_binary(self.expect(index)?)
    }

    /// Returns the cached view over the nested DOCUMENT element at `index`.
    pub fn get_document(&self, index: usize) -> Result<&RawDocument<'a>> {
        self.body.read_document(self.expect(index)?)
    }

    /// Returns the cached view over the nested ARRAY element at `index`.
    pub fn get_array(&self, index: usize) -> Result<&RawArray<'a>> {
        self.body.read_array(self.expect(index)?)
    }

    /// Like [`RawArray::get_i32`], but any failure yields the default.
    pub fn get_i32_or(&self, index: usize, default: i32) -> i32 {
        self.get_i32(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_i64`], but any failure yields the default.
    pub fn get_i64_or(&self, index: usize, default: i64) -> i64 {
        self.get_i64(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_f64`], but any failure yields the default.
    pub fn get_f64_or(&self, index: usize, default: f64) -> f64 {
        self.get_f64(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_bool`], but any failure yields the default.
    pub fn get_bool_or(&self, index: usize, default: bool) -> bool {
        self.get_bool(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_datetime`], but any failure yields the default.
    pub fn get_datetime_or(&self, index: usize, default: i64) -> i64 {
        self.get_datetime(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_str`], but any failure yields the default.
    pub fn get_str_or(&self, index: usize, default: &'a str) -> &'a str {
        self.get_str(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_object_id`], but any failure yields the default.
    pub fn get_object_id_or<'s>(&'s self, index: usize, default: &'s str) -> &'s str {
        self.get_object_id(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_binary`], but any failure yields the default.
    pub fn get_binary_or(&self, index: usize, default: &'a [u8]) -> &'a [u8] {
        self.get_binary(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_document`], but any failure, including an
    /// out-of-range index, yields the default.
    pub fn get_document_or<'s>(
        &'s self,
        index: usize,
        default: &'s RawDocument<'a>,
    ) -> &'s RawDocument<'a> {
        self.get_document(index).unwrap_or(default)
    }

    /// Like [`RawArray::get_array`], but any failure, including an
    /// out-of-range index, yields the default.
    pub fn get_array_or<'s>(
        &'s self,
        index: usize,
        default: &'s RawArray<'a>,
    ) -> &'s RawArray<'a> {
        self.get_array(index).unwrap_or(default)
    }

    /// Decodes the element at `index` into the untyped value model. An
    /// out-of-range index is `None`.
    pub fn get(&self, index: usize) -> Result<Option<Value<'a>>> {
        if index >= self.body.len() {
            return Ok(None);
        }
        self.body.read_value(index).map(Some)
    }

    /// True when the element at `index` exists and is typed NULL or
    /// UNDEFINED.
    pub fn is_null(&self, index: usize) -> bool {
        index < self.body.len() && self.body.is_null(index)
    }

    /// The stored tag of the element at `index`, or `None` when out of
    /// range.
    pub fn element_type(&self, index: usize) -> Option<ElementType> {
        if index < self.body.len() {
            Some(self.body.tag(index))
        } else {
            None
        }
    }

    /// The number of elements in the array.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.len() == 0
    }

    /// The array bytes: the original slice when this view spans all of it,
    /// otherwise a fresh copy of the payload range.
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        self.body.to_bytes()
    }

    /// Renders the array as compact JSON-ish text.
    pub fn to_json(&self) -> Result<String> {
        let mut out = String::new();
        self.write_json(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write_json(&self, out: &mut String) -> Result<()> {
        out.push('[');
        for index in 0..self.body.len() {
            if index > 0 {
                out.push(',');
            }
            json::write_value(out, &self.body.read_value(index)?)?;
        }
        out.push(']');
        Ok(())
    }

    /// Iterates the array's elements in order.
    pub fn iter(&self) -> Items<'_, 'a> {
        Items {
            array: self,
            index: 0,
        }
    }

}

/// Iterator over the decoded elements of a [`RawArray`].
#[derive(Debug)]
pub struct Items<'v, 'a> {
    array: &'v RawArray<'a>,
    index: usize,
}

impl<'v, 'a> Iterator for Items<'v, 'a> {
    type Item = Result<Value<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.array.body.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.array.body.read_value(index))
    }
}
