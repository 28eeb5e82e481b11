//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::borrow::Cow;
use std::collections::HashSet;

use crate::document::{ElementType, MIN_DOCUMENT_SIZE};
use crate::error::{Error, Result};
use crate::json;
use crate::raw::body::RawBody;
use crate::raw::array::RawArray;
use crate::value::Value;

/// A read-only, random-access view over the bytes of a BSON document.
///
/// Parsing indexes the elements into a hash-sorted directory; no value is
/// decoded until an accessor asks for it. The view borrows the input bytes,
/// which must outlive it and every view derived from it. Nested views
/// returned by [`RawDocument::get_document`] and [`RawDocument::get_array`]
/// borrow the same root bytes and are cached, so repeated access yields the
/// same instance.
///
/// Concurrent readers need no external locking; the only synchronization is
/// the one-time publication of each cache slot.
#[derive(Debug)]
pub struct RawDocument<'a> {
    body: RawBody<'a>,
}

impl<'a> RawDocument<'a> {

    /// Parses a document spanning the entire input slice.
    pub fn parse(bytes: &'a [u8]) -> Result<RawDocument<'a>> {
        if bytes.len() < MIN_DOCUMENT_SIZE {
            return Err(Error::InvalidInput("a document needs at least 5 bytes"));
        }
        Ok(RawDocument {
            body: RawBody::index_document(bytes, 0, None)?,
        })
    }

    /// Parses the document occupying `[offset, offset + length)` of the
    /// input slice.
    pub fn parse_at(bytes: &'a [u8], offset: usize, length: usize) -> Result<RawDocument<'a>> {
        if length < MIN_DOCUMENT_SIZE
            || offset.checked_add(length).map_or(true, |end| end > bytes.len())
        {
            return Err(Error::InvalidInput("document range does not fit the input"));
        }
        Ok(RawDocument {
            body: RawBody::index_document(bytes, offset, Some(length))?,
        })
    }

    pub(crate) fn from_body(body: RawBody<'a>) -> RawDocument<'a> {
        RawDocument { body }
    }

    pub(crate) fn body(&self) -> &RawBody<'a> {
        &self.body
    }

    fn expect(&self, name: &str) -> Result<usize> {
        self.body
            .locate(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    /// Reads an INT32 field.
    pub fn get_i32(&self, name: &str) -> Result<i32> {
        self.body.read_i32(self.expect(name)?)
    }

    /// Reads an INT64 field.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.body.read_i64(self.expect(name)?)
    }

    /// Reads a DOUBLE field.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.body.read_f64(self.expect(name)?)
    }

    /// Reads a BOOLEAN field.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.body.read_bool(self.expect(name)?)
    }

    /// Reads a DATE_TIME field as milliseconds since the Unix epoch.
    pub fn get_datetime(&self, name: &str) -> Result<i64> {
        self.body.read_datetime(self.expect(name)?)
    }

    /// Reads the text of a STRING, JAVASCRIPT or SYMBOL field.
    pub fn get_str(&self, name: &str) -> Result<&'a str> {
        self.body.read_str(self.expect(name)?)
    }

    /// Reads an OBJECT_ID field as 24 lowercase hex characters.
    pub fn get_object_id(&self, name: &str) -> Result<&str> {
        self.body.read_object_id(self.expect(name)?)
    }

    /// Reads the payload of a BINARY field. The subtype is dropped; use the
    /// untyped [`RawDocument::get`] to retain it.
    pub fn get_binary(&self, name: &str) -> Result<&'a [u8]> {
        self.body.read_binary(self.expect(name)?)
    }

    /// Returns the indexed view over a nested DOCUMENT field. The view is
    /// cached: repeated calls return the same instance.
    pub fn get_document(&self, name: &str) -> Result<&RawDocument<'a>> {
        self.body.read_document(self.expect(name)?)
    }

    /// Returns the indexed view over a nested ARRAY field. The view is
    /// cached: repeated calls return the same instance.
    pub fn get_array(&self, name: &str) -> Result<&RawArray<'a>> {
        self.body.read_array(self.expect(name)?)
    }

    /// Like [`RawDocument::get_i32`], but any failure yields the default.
    pub fn get_i32_or(&self, name: &str, default: i32) -> i32 {
        self.get_i32(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_i64`], but any failure yields the default.
    pub fn get_i64_or(&self, name: &str, default: i64) -> i64 {
        self.get_i64(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_f64`], but any failure yields the default.
    pub fn get_f64_or(&self, name: &str, default: f64) -> f64 {
        self.get_f64(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_bool`], but any failure yields the default.
    pub fn get_bool_or(&self, name: &str, default: bool) -> bool {
        self.get_bool(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_datetime`], but any failure yields the default.
    pub fn get_datetime_or(&self, name: &str, default: i64) -> i64 {
        self.get_datetime(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_str`], but an absent, null-typed or
    /// differently-typed field yields the default.
    pub fn get_str_or(&self, name: &str, default: &'a str) -> &'a str {
        self.get_str(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_object_id`], but any failure yields the default.
    pub fn get_object_id_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.get_object_id(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_binary`], but any failure yields the default.
    pub fn get_binary_or(&self, name: &str, default: &'a [u8]) -> &'a [u8] {
        self.get_binary(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_document`], but any failure, including a
    /// malformed nested payload, yields the default.
    pub fn get_document_or<'s>(
        &'s self,
        name: &str,
        default: &'s RawDocument<'a>,
    ) -> &'s RawDocument<'a> {
        self.get_document(name).unwrap_or(default)
    }

    /// Like [`RawDocument::get_array`], but any failure, including a
    /// malformed nested payload, yields the default.
    pub fn get_array_or<'s>(
        &'s self,
        name: &str,
        default: &'s RawArray<'a>,
    ) -> &'s RawArray<'a> {
        self.get_array(name).unwrap_or(default)
    }

    /// Decodes a field into the untyped value model, dispatching on the
    /// stored tag. An absent field is `None`; a present NULL field is
    /// `Some(Value::Null)`.
    pub fn get(&self, name: &str) -> Result<Option<Value<'a>>> {
        match self.body.locate(name) {
            Some(index) => self.body.read_value(index).map(Some),
            None => Ok(None),
        }
    }

    /// True when the document has a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.body.locate(name).is_some()
    }

    /// True when the field is present and typed NULL or UNDEFINED.
    pub fn is_null(&self, name: &str) -> bool {
        self.body
            .locate(name)
            .map_or(false, |index| self.body.is_null(index))
    }

    /// The stored tag of the named field, or `None` when absent.
    pub fn element_type(&self, name: &str) -> Option<ElementType> {
        self.body.locate(name).map(|index| self.body.tag(index))
    }

    /// The number of elements in the document.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.len() == 0
    }

    /// The set of field names. The set is unordered by contract; names that
    /// are not valid UTF-8 are omitted.
    pub fn field_names(&self) -> HashSet<&'a str> {
        (0..self.body.len())
            .filter_map(|index| self.body.name_str(index).ok())
            .collect()
    }

    /// The document bytes: the original slice when this view spans all of
    /// it, otherwise a fresh copy of the payload range.
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        self.body.to_bytes()
    }

    /// Renders the document as compact JSON-ish text.
    pub fn to_json(&self) -> Result<String> {
        let mut out = String::new();
        self.write_json(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write_json(&self, out: &mut String) -> Result<()> {
        out.push('{');
        for index in 0..self.body.len() {
            if index > 0 {
                out.push(',');
            }
            out.push('"');
            json::escape_into(out, self.body.name_str(index)?);
            out.push_str("\":");
            json::write_value(out, &self.body.read_value(index)?)?;
        }
        out.push('}');
        Ok(())
    }

    /// Iterates the document's elements as `(name, value)` pairs. The order
    /// is the directory order, which is unspecified by contract.
    pub fn iter(&self) -> Elements<'_, 'a> {
        Elements {
            document: self,
            index: 0,
        }
    }

}

/// Iterator over the decoded elements of a [`RawDocument`].
#[derive(Debug)]
pub struct Elements<'v, 'a> {
    document: &'v RawDocument<'a>,
    index: usize,
}

impl<'v, 'a> Iterator for Elements<'v, 'a> {
    type Item = Result<(&'a str, Value<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.document.body.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let body = &self.document.body;
        let element = body
            .name_str(index)
            .and_then(|name| Ok((name, body.read_value(index)?)));
        Some(element)
    }
}
