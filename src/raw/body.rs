//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! The shared composition behind both indexed views: the borrowed bytes, the
//! payload range, the element directory and the lazy cache, together with
//! the by-descriptor typed reads that the document and array surfaces
//! dispatch into.

use std::borrow::Cow;

use crate::document::{ElementType, MIN_DOCUMENT_SIZE};
use crate::error::{Error, Result};
use crate::raw::array::RawArray;
use crate::raw::cache::{Cached, ElementCache};
use crate::raw::document::RawDocument;
use crate::raw::index::{self, ElementDescriptor};
use crate::raw::parser;
use crate::value::Value;

#[derive(Debug)]
pub(crate) struct RawBody<'a> {
    /// The root byte slice. Nested views derived through the cache borrow
    /// this same slice, not their parent view.
    data: &'a [u8],
    /// Start of the payload range within `data`.
    offset: usize,
    /// Length of the payload range.
    length: usize,
    /// The element directory: hash-sorted for documents, source order for
    /// arrays.
    fields: Box<[ElementDescriptor]>,
    cache: ElementCache<'a>,
}

impl<'a> RawBody<'a> {

    /// Indexes a document range and sorts its directory by name hash.
    pub(crate) fn index_document(
        data: &'a [u8],
        offset: usize,
        length: Option<usize>,
    ) -> Result<RawBody<'a>> {
        RawBody::index(data, offset, length, true)
    }

    /// Indexes an array range, keeping the directory in source order so the
    /// descriptor index doubles as the logical element index.
    pub(crate) fn index_array(
        data: &'a [u8],
        offset: usize,
        length: Option<usize>,
    ) -> Result<RawBody<'a>> {
        RawBody::index(data, offset, length, false)
    }

    fn index(
        data: &'a [u8],
        offset: usize,
        length: Option<usize>,
        sorted: bool,
    ) -> Result<RawBody<'a>> {
        let declared = parser::int32_at(data, offset)?;
        if declared < MIN_DOCUMENT_SIZE as i32 {
            return Err(Error::malformed(format!(
                "length prefix {} at offset {} is negative or implausible",
                declared, offset,
            )));
        }
        let length = length.unwrap_or(declared as usize);
        offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "document at offset {} crosses end of input", offset,
                ))
            })?;

        let mut fields = index::index_elements(data, offset, length)?;
        if sorted {
            index::sort_by_hash(&mut fields);
        }
        Ok(RawBody {
            data,
            offset,
            length,
            fields: fields.into_boxed_slice(),
            cache: ElementCache::new(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn tag(&self, index: usize) -> ElementType {
        self.fields[index].tag
    }

    pub(crate) fn name_bytes(&self, index: usize) -> &'a [u8] {
        self.fields[index].name_bytes(self.data)
    }

    pub(crate) fn name_str(&self, index: usize) -> Result<&'a str> {
        std::str::from_utf8(self.name_bytes(index)).map_err(|_| {
            Error::malformed("element name is not valid UTF-8".to_string())
        })
    }

    pub(crate) fn locate(&self, name: &str) -> Option<usize> {
        index::locate(&self.fields, self.data, name)
    }

    pub(crate) fn is_null(&self, index: usize) -> bool {
        matches!(self.tag(index), ElementType::Null | ElementType::Undefined)
    }

    /// Returns the original slice when the view spans all of it, otherwise a
    /// fresh copy of the payload range.
    pub(crate) fn to_bytes(&self) -> Cow<'a, [u8]> {
        if self.offset == 0 && self.length == self.data.len() {
            Cow::Borrowed(self.data)
        } else {
            Cow::Owned(self.data[self.offset..self.offset + self.length].to_vec())
        }
    }

    fn expect_tag(&self, index: usize, tag: ElementType) -> Result<&ElementDescriptor> {
        let descriptor = &self.fields[index];
        if descriptor.tag == tag {
            Ok(descriptor)
        } else {
            Err(Error::TypeMismatch(tag))
        }
    }

    pub(crate) fn read_i32(&self, index: usize) -> Result<i32> {
        let descriptor = self.expect_tag(index, ElementType::Int32)?;
        parser::int32_at(self.data, descriptor.value_start())
    }

    pub(crate) fn read_i64(&self, index: usize) -> Result<i64> {
        let descriptor = self.expect_tag(index, ElementType::Int64)?;
        parser::int64_at(self.data, descriptor.value_start())
    }

    pub(crate) fn read_f64(&self, index: usize) -> Result<f64> {
        let descriptor = self.expect_tag(index, ElementType::Double)?;
        parser::double_at(self.data, descriptor.value_start())
    }

    pub(crate) fn read_bool(&self, index: usize) -> Result<bool> {
        let descriptor = self.expect_tag(index, ElementType::Boolean)?;
        Ok(parser::byte_at(self.data, descriptor.value_start())? != 0)
    }

    pub(crate) fn read_datetime(&self, index: usize) -> Result<i64> {
        let descriptor = self.expect_tag(index, ElementType::DateTime)?;
        parser::int64_at(self.data, descriptor.value_start())
    }

    /// Reads the text of a STRING, JAVASCRIPT or SYMBOL element. The decoded
    /// borrow is cached so UTF-8 validation runs once per element.
    pub(crate) fn read_str(&self, index: usize) -> Result<&'a str> {
        let descriptor = &self.fields[index];
        match descriptor.tag {
            ElementType::String | ElementType::JavaScript | ElementType::Symbol => {}
            _ => return Err(Error::TypeMismatch(ElementType::String)),
        }
        let cached = self.cache.slot(index, self.fields.len()).get_or_try_init(|| {
            parser::string_at(self.data, descriptor.value_start(), descriptor.value_end())
                .map(Cached::Str)
        })?;
        match cached {
            Cached::Str(text) => Ok(text),
            _ => unreachable!("slot holds the variant of its element tag"),
        }
    }

    pub(crate) fn read_object_id(&self, index: usize) -> Result<&str> {
        let descriptor = self.expect_tag(index, ElementType::ObjectId)?;
        let cached = self.cache.slot(index, self.fields.len()).get_or_try_init(|| {
            parser::object_id_at(self.data, descriptor.value_start()).map(Cached::ObjectId)
        })?;
        match cached {
            Cached::ObjectId(id) => Ok(id),
            _ => unreachable!("slot holds the variant of its element tag"),
        }
    }

    /// Returns the binary payload as a borrow of the document bytes. The
    /// subtype byte is skipped over; `Value::Binary` retains it.
    pub(crate) fn read_binary(&self, index: usize) -> Result<&'a [u8]> {
        let descriptor = self.expect_tag(index, ElementType::Binary)?;
        parser::binary_at(self.data, descriptor.value_start(), descriptor.value_end())
            .map(|(_, payload)| payload)
    }

    /// Returns the cached view over a nested document, materializing it on
    /// first access. Repeated calls return the same instance.
    pub(crate) fn read_document(&self, index: usize) -> Result<&RawDocument<'a>> {
        let descriptor = self.expect_tag(index, ElementType::Document)?;
        let cached = self.cache.slot(index, self.fields.len()).get_or_try_init(|| {
            let body = RawBody::index_document(
                self.data,
                descriptor.value_start(),
                Some(descriptor.value_size as usize),
            )?;
            Ok(Cached::Document(RawDocument::from_body(body)))
        })?;
        match cached {
            Cached::Document(document) => Ok(document),
            _ => unreachable!("slot holds the variant of its element tag"),
        }
    }

    /// Returns the cached view over a nested array, materializing it on
    /// first access. Repeated calls return the same instance.
    pub(crate) fn read_array(&self, index: usize) -> Result<&RawArray<'a>> {
        let descriptor = self.expect_tag(index, ElementType::Array)?;
        let cached = self.cache.slot(index, self.fields.len()).get_or_try_init(|| {
            let body = RawBody::index_array(
                self.data,
                descriptor.value_start(),
                Some(descriptor.value_size as usize),
            )?;
            Ok(Cached::Array(RawArray::from_body(body)))
        })?;
        match cached {
            Cached::Array(array) => Ok(array),
            _ => unreachable!("slot holds the variant of its element tag"),
        }
    }

    /// Decodes the element at `index` into the untyped value model. Nested
    /// views produced here are fresh instances owned by the returned value;
    /// the identity-preserving path is `read_document`/`read_array`.
    pub(crate) fn read_value(&self, index: usize) -> Result<Value<'a>> {
        let descriptor = self.fields[index];
        let start = descriptor.value_start();
        let end = descriptor.value_end();
        let value = match descriptor.tag {
            ElementType::Double =>
                Value::Double(parser::double_at(self.data, start)?),
            ElementType::String =>
                Value::String(self.read_str(index)?),
            ElementType::JavaScript =>
                Value::JavaScript(self.read_str(index)?),
            ElementType::Symbol =>
                Value::Symbol(self.read_str(index)?),
            ElementType::Document => {
                let body = RawBody::index_document(
                    self.data, start, Some(descriptor.value_size as usize),
                )?;
                Value::Document(RawDocument::from_body(body))
            }
            ElementType::Array => {
                let body = RawBody::index_array(
                    self.data, start, Some(descriptor.value_size as usize),
                )?;
                Value::Array(RawArray::from_body(body))
            }
            ElementType::Binary => {
                let (subtype, bytes) = parser::binary_at(self.data, start, end)?;
                Value::Binary { subtype, bytes }
            }
            ElementType::Undefined =>
                Value::Undefined,
            ElementType::ObjectId =>
                Value::ObjectId(parser::object_id_at(self.data, start)?),
            ElementType::Boolean =>
                Value::Boolean(parser::byte_at(self.data, start)? != 0),
            ElementType::DateTime =>
                Value::DateTime(parser::int64_at(self.data, start)?),
            ElementType::Null =>
                Value::Null,
            ElementType::Regex => {
                let (pattern, options) = parser::regex_at(self.data, start, end)?;
                Value::Regex { pattern, options }
            }
            ElementType::JavaScriptWithScope =>
                Value::CodeWithScope(&self.data[start..end]),
            ElementType::Int32 =>
                Value::Int32(parser::int32_at(self.data, start)?),
            ElementType::Timestamp =>
                Value::Timestamp(parser::uint64_at(self.data, start)?),
            ElementType::Int64 =>
                Value::Int64(parser::int64_at(self.data, start)?),
            ElementType::Decimal128 =>
                Value::Decimal128(parser::decimal128_at(self.data, start)?),
            ElementType::MinKey =>
                Value::MinKey,
            ElementType::MaxKey =>
                Value::MaxKey,
        };
        Ok(value)
    }

}
