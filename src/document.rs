//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The BSON document format.
//!
//! Constants and structures defined in this module represent the on-wire
//! layout of a BSON document.
//!
//! A document is a flat little-endian byte stream:
//!
//! 1. A 4-byte total length prefix (including the prefix and terminator).
//! 2. Zero or more elements, each `<tag byte> <cstring name> <payload>`.
//! 3. A single 0x00 terminator byte.
//!
//! Arrays share the document layout; their element names are the decimal
//! UTF-8 renderings of the element indices.
//!
//! # References
//!
//! 1. https://bsonspec.org/spec.html

/// The number of bytes in the smallest possible document: a 4-byte length
/// prefix followed by the terminator.
pub const MIN_DOCUMENT_SIZE: usize = 5;

/// The number of bytes in an ObjectId payload.
pub const OBJECT_ID_SIZE: usize = 12;

/// BSON element tag.
///
/// Each element in a document opens with one of these marker bytes. The tag
/// determines the payload layout, which is everything the indexer needs to
/// compute an element's span without decoding its value.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[repr(u8)]
pub enum ElementType {
    /// A 64-bit IEEE 754 floating point value.
    Double = 0x01,
    /// A length-prefixed UTF-8 string.
    String = 0x02,
    /// An embedded document.
    Document = 0x03,
    /// An embedded array (a document with decimal-integer names).
    Array = 0x04,
    /// A subtyped binary blob.
    Binary = 0x05,
    /// The deprecated undefined value; no payload.
    Undefined = 0x06,
    /// A 12-byte ObjectId.
    ObjectId = 0x07,
    /// A single-byte boolean.
    Boolean = 0x08,
    /// A 64-bit signed count of milliseconds since the Unix epoch.
    DateTime = 0x09,
    /// The null value; no payload.
    Null = 0x0A,
    /// A regular expression: two back-to-back cstrings (pattern, options).
    Regex = 0x0B,
    /// A length-prefixed JavaScript code string.
    JavaScript = 0x0D,
    /// A length-prefixed symbol string (deprecated).
    Symbol = 0x0E,
    /// JavaScript code with a scope document, prefixed by its total length.
    JavaScriptWithScope = 0x0F,
    /// A 32-bit signed integer.
    Int32 = 0x10,
    /// A 64-bit internal timestamp.
    Timestamp = 0x11,
    /// A 64-bit signed integer.
    Int64 = 0x12,
    /// A 128-bit IEEE 754-2008 decimal value.
    Decimal128 = 0x13,
    /// The minimum key sentinel; no payload.
    MinKey = 0xFF,
    /// The maximum key sentinel; no payload.
    MaxKey = 0x7F,
}

/// The payload layout associated with an element tag.
///
/// The layout tells the indexer how to compute the size of a payload from at
/// most one length read, without decoding the value itself.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum PayloadLayout {
    /// The payload occupies exactly the given number of bytes.
    Fixed(usize),
    /// A 4-byte length `L` followed by `L` bytes of UTF-8 text including a
    /// trailing NUL; `L` does not count the length field itself.
    LengthPrefixedText,
    /// A 4-byte length `L` where `L` counts the entire payload including the
    /// length field (documents, arrays, code-with-scope).
    LengthInclusive,
    /// A 4-byte length `L`, a 1-byte subtype, then `L` bytes of data.
    Binary,
    /// Two back-to-back NUL-terminated cstrings.
    CStringPair,
}

impl ElementType {

    /// Maps a raw tag byte onto the element type it identifies. Bytes outside
    /// the closed tag set yield `None` and render the document malformed.
    pub fn from_byte(byte: u8) -> Option<ElementType> {
        use ElementType::*;
        match byte {
            0x01 => Some(Double),
            0x02 => Some(String),
            0x03 => Some(Document),
            0x04 => Some(Array),
            0x05 => Some(Binary),
            0x06 => Some(Undefined),
            0x07 => Some(ObjectId),
            0x08 => Some(Boolean),
            0x09 => Some(DateTime),
            0x0A => Some(Null),
            0x0B => Some(Regex),
            0x0D => Some(JavaScript),
            0x0E => Some(Symbol),
            0x0F => Some(JavaScriptWithScope),
            0x10 => Some(Int32),
            0x11 => Some(Timestamp),
            0x12 => Some(Int64),
            0x13 => Some(Decimal128),
            0xFF => Some(MinKey),
            0x7F => Some(MaxKey),
            _ => None,
        }
    }

    /// The payload layout used to size an element of this type.
    pub fn layout(self) -> PayloadLayout {
        use ElementType::*;
        match self {
            Double | DateTime | Timestamp | Int64 =>
                PayloadLayout::Fixed(8),
            Int32 =>
                PayloadLayout::Fixed(4),
            Boolean =>
                PayloadLayout::Fixed(1),
            ObjectId =>
                PayloadLayout::Fixed(OBJECT_ID_SIZE),
            Decimal128 =>
                PayloadLayout::Fixed(16),
            Undefined | Null | MinKey | MaxKey =>
                PayloadLayout::Fixed(0),
            String | JavaScript | Symbol =>
                PayloadLayout::LengthPrefixedText,
            Document | Array | JavaScriptWithScope =>
                PayloadLayout::LengthInclusive,
            Binary =>
                PayloadLayout::Binary,
            Regex =>
                PayloadLayout::CStringPair,
        }
    }

    /// The canonical tag name, as it appears in error messages.
    pub fn name(self) -> &'static str {
        use ElementType::*;
        match self {
            Double => "DOUBLE",
            String => "STRING",
            Document => "DOCUMENT",
            Array => "ARRAY",
            Binary => "BINARY",
            Undefined => "UNDEFINED",
            ObjectId => "OBJECT_ID",
            Boolean => "BOOLEAN",
            DateTime => "DATE_TIME",
            Null => "NULL",
            Regex => "REGEX",
            JavaScript => "JAVASCRIPT",
            Symbol => "SYMBOL",
            JavaScriptWithScope => "JAVASCRIPT_W_SCOPE",
            Int32 => "INT32",
            Timestamp => "TIMESTAMP",
            Int64 => "INT64",
            Decimal128 => "DECIMAL128",
            MinKey => "MIN_KEY",
            MaxKey => "MAX_KEY",
        }
    }

}
