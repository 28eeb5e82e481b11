//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod regex;

use serde::Deserialize;
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess};
use serde::de::value::BorrowedStrDeserializer;

use crate::document::ElementType;
use crate::error::{Error, Result};
use crate::raw::body::RawBody;
use crate::raw::RawDocument;
use crate::value::Value;

/// Deserializer binding Rust values onto a BSON document.
///
/// Decoding runs through the indexed view, so strings and binary payloads
/// are handed to the visitor as borrows of the input bytes.
#[derive(Debug)]
pub struct Deserializer<'de> {
    /// The bytes which represent the totality of the input document.
    input: &'de [u8],
}

impl<'de> Deserializer<'de> {
    /// Designated initializer for a document deserializer.
    pub fn from_slice(input: &'de [u8]) -> Self {
        Deserializer { input }
    }
}

/// Support for deserializing any supported type from a BSON document.
pub fn from_slice<'a, T>(bytes: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_slice(bytes);
    T::deserialize(&mut deserializer)
}

impl<'de, 'b> de::Deserializer<'de> for &'b mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // Index the document and process its elements through a map access
        // object; a BSON stream is a document at the top level.
        let document = RawDocument::parse(self.input)?;
        visitor.visit_map(DocumentMap::new(document.body()))
    }

    serde::forward_to_deserialize_any! {
        bool
        u8 u16 u32 u64 u128
        i8 i16 i32 i64 i128
        f32 f64
        char str string
        seq map
        bytes byte_buf
        enum
        struct
        unit unit_struct
        tuple tuple_struct
        newtype_struct
        ignored_any
        option
        identifier
    }

}

/// Deserializer for a single element of an indexed view.
#[derive(Debug)]
struct ElementDeserializer<'v, 'de> {
    body: &'v RawBody<'de>,
    index: usize,
}

impl<'v, 'de> de::Deserializer<'de> for ElementDeserializer<'v, 'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.body.tag(self.index) {

            // Scalars map directly onto visitor primitives.
            ElementType::Double =>
                visitor.visit_f64(self.body.read_f64(self.index)?),
            ElementType::Boolean =>
                visitor.visit_bool(self.body.read_bool(self.index)?),
            ElementType::Int32 =>
                visitor.visit_i32(self.body.read_i32(self.index)?),
            ElementType::Int64 =>
                visitor.visit_i64(self.body.read_i64(self.index)?),
            ElementType::DateTime =>
                visitor.visit_i64(self.body.read_datetime(self.index)?),

            // Text borrows the document bytes for the whole deserialization.
            ElementType::String | ElementType::JavaScript | ElementType::Symbol =>
                visitor.visit_borrowed_str(self.body.read_str(self.index)?),

            ElementType::ObjectId =>
                visitor.visit_str(self.body.read_object_id(self.index)?),

            ElementType::Binary =>
                visitor.visit_borrowed_bytes(self.body.read_binary(self.index)?),

            ElementType::Null | ElementType::Undefined =>
                visitor.visit_unit(),

            // Composites recurse through their cached nested views.
            ElementType::Document => {
                let document = self.body.read_document(self.index)?;
                visitor.visit_map(DocumentMap::new(document.body()))
            }
            ElementType::Array => {
                let array = self.body.read_array(self.index)?;
                visitor.visit_seq(ArraySeq::new(array.body()))
            }

            // A regex is deserialized as a Regex type via map access object.
            ElementType::Regex => match self.body.read_value(self.index)? {
                Value::Regex { pattern, options } => {
                    let deserializer = regex::RegexDeserializer::new(pattern, options);
                    visitor.visit_map(deserializer)
                }
                _ => Err(de::Error::custom("regex element decoded to another value")),
            },

            ElementType::Timestamp => match self.body.read_value(self.index)? {
                Value::Timestamp(value) => visitor.visit_u64(value),
                _ => Err(de::Error::custom("timestamp element decoded to another value")),
            },

            ElementType::Decimal128 => match self.body.read_value(self.index)? {
                Value::Decimal128(bytes) => visitor.visit_bytes(&bytes),
                _ => Err(de::Error::custom("decimal128 element decoded to another value")),
            },

            ElementType::JavaScriptWithScope => match self.body.read_value(self.index)? {
                Value::CodeWithScope(payload) => visitor.visit_borrowed_bytes(payload),
                _ => Err(de::Error::custom("code element decoded to another value")),
            },

            // The key sentinels carry no value.
            ElementType::MinKey | ElementType::MaxKey =>
                visitor.visit_unit(),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.body.is_null(self.index) {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    serde::forward_to_deserialize_any! {
        bool
        u8 u16 u32 u64 u128
        i8 i16 i32 i64 i128
        f32 f64
        char str string
        seq map
        bytes byte_buf
        enum
        struct
        unit unit_struct
        tuple tuple_struct
        newtype_struct
        ignored_any
        identifier
    }

}

/// Access object to process the elements of a document view.
struct DocumentMap<'v, 'de> {
    body: &'v RawBody<'de>,
    index: usize,
}

impl<'v, 'de> DocumentMap<'v, 'de> {
    fn new(body: &'v RawBody<'de>) -> Self {
        DocumentMap { body, index: 0 }
    }
}

impl<'v, 'de> MapAccess<'de> for DocumentMap<'v, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if self.index >= self.body.len() {
            return Ok(None);
        }
        let name = self.body.name_str(self.index)?;
        seed.deserialize(BorrowedStrDeserializer::new(name)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let index = self.index;
        self.index += 1;
        seed.deserialize(ElementDeserializer {
            body: self.body,
            index,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.body.len() - self.index)
    }
}

/// Access object to process the elements of an array view.
struct ArraySeq<'v, 'de> {
    body: &'v RawBody<'de>,
    index: usize,
}

impl<'v, 'de> ArraySeq<'v, 'de> {
    fn new(body: &'v RawBody<'de>) -> Self {
        ArraySeq { body, index: 0 }
    }
}

impl<'v, 'de> SeqAccess<'de> for ArraySeq<'v, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if self.index >= self.body.len() {
            return Ok(None);
        }
        let index = self.index;
        self.index += 1;
        seed.deserialize(ElementDeserializer {
            body: self.body,
            index,
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.body.len() - self.index)
    }
}
