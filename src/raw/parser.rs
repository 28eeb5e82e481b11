//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Wire primitives: little-endian scalar reads, cstring span extraction,
//! length-prefixed string extraction, ObjectId hex formatting and subtyped
//! binary extraction.
//!
//! Every function here is a pure read over `(bytes, offset)`. The nom
//! combinators do the actual recognition; failures are folded into
//! `MalformedBson` so callers never see a nom error type.

use nom::{
    bytes::complete::{tag, take_till},
    number::complete::{le_f64, le_i32, le_i64, le_u64, le_u8},
    sequence::terminated,
};

use crate::document::OBJECT_ID_SIZE;
use crate::error::{Error, Result};

type NomError<'a> = nom::error::Error<&'a [u8]>;

fn truncated(what: &'static str, at: usize) -> Error {
    Error::malformed(format!("{} at offset {} crosses end of input", what, at))
}

/// Reads a little-endian 32-bit signed integer at the given offset.
pub(crate) fn int32_at(data: &[u8], at: usize) -> Result<i32> {
    let input = data.get(at..).ok_or_else(|| truncated("int32", at))?;
    le_i32::<_, NomError>(input)
        .map(|(_, value)| value)
        .map_err(|_| truncated("int32", at))
}

/// Reads a little-endian 64-bit signed integer at the given offset.
pub(crate) fn int64_at(data: &[u8], at: usize) -> Result<i64> {
    let input = data.get(at..).ok_or_else(|| truncated("int64", at))?;
    le_i64::<_, NomError>(input)
        .map(|(_, value)| value)
        .map_err(|_| truncated("int64", at))
}

/// Reads a little-endian 64-bit unsigned integer at the given offset.
pub(crate) fn uint64_at(data: &[u8], at: usize) -> Result<u64> {
    let input = data.get(at..).ok_or_else(|| truncated("uint64", at))?;
    le_u64::<_, NomError>(input)
        .map(|(_, value)| value)
        .map_err(|_| truncated("uint64", at))
}

/// Reads a little-endian 64-bit IEEE 754 value at the given offset.
pub(crate) fn double_at(data: &[u8], at: usize) -> Result<f64> {
    let input = data.get(at..).ok_or_else(|| truncated("double", at))?;
    le_f64::<_, NomError>(input)
        .map(|(_, value)| value)
        .map_err(|_| truncated("double", at))
}

/// Reads a single byte at the given offset.
pub(crate) fn byte_at(data: &[u8], at: usize) -> Result<u8> {
    let input = data.get(at..).ok_or_else(|| truncated("byte", at))?;
    le_u8::<_, NomError>(input)
        .map(|(_, value)| value)
        .map_err(|_| truncated("byte", at))
}

/// Extracts the span of a NUL-terminated cstring starting at the given
/// offset, bounded by `end`. The returned slice excludes the terminator.
pub(crate) fn cstring_at(data: &[u8], at: usize, end: usize) -> Result<&[u8]> {
    let input = data
        .get(at..end)
        .ok_or_else(|| truncated("cstring", at))?;
    terminated(take_till::<_, _, NomError>(|byte| byte == 0x00), tag(&[0x00][..]))(input)
        .map(|(_, span)| span)
        .map_err(|_| Error::malformed(format!("unterminated cstring at offset {}", at)))
}

/// Extracts a length-prefixed UTF-8 string starting at the given offset,
/// bounded by `end`. The prefix counts the text bytes plus a trailing NUL;
/// the returned slice excludes both the prefix and the NUL.
pub(crate) fn string_at(data: &[u8], at: usize, end: usize) -> Result<&str> {
    let length = int32_at(data, at)?;
    if length < 1 {
        return Err(Error::malformed(format!(
            "string at offset {} declares implausible length {}", at, length,
        )));
    }
    let text_start = at + 4;
    let text_end = text_start + length as usize - 1;
    if text_end >= end || data.get(text_end) != Some(&0x00) {
        return Err(Error::malformed(format!(
            "string at offset {} is not NUL-terminated within its span", at,
        )));
    }
    std::str::from_utf8(&data[text_start..text_end])
        .map_err(|_| Error::malformed(format!("invalid UTF-8 in string at offset {}", at)))
}

/// Formats the 12 ObjectId payload bytes at the given offset as 24 lowercase
/// hex characters.
pub(crate) fn object_id_at(data: &[u8], at: usize) -> Result<String> {
    let payload = data
        .get(at..at + OBJECT_ID_SIZE)
        .ok_or_else(|| truncated("object id", at))?;
    Ok(hex::encode(payload))
}

/// Extracts the subtype and data span of a binary payload starting at the
/// given offset, bounded by `end`.
pub(crate) fn binary_at(data: &[u8], at: usize, end: usize) -> Result<(u8, &[u8])> {
    let length = int32_at(data, at)?;
    if length < 0 {
        return Err(Error::malformed(format!(
            "binary at offset {} declares negative length {}", at, length,
        )));
    }
    let subtype = byte_at(data, at + 4)?;
    let data_start = at + 5;
    let data_end = data_start + length as usize;
    if data_end > end {
        return Err(truncated("binary", at));
    }
    Ok((subtype, &data[data_start..data_end]))
}

/// Extracts the pattern and options cstrings of a regular expression payload
/// starting at the given offset, bounded by `end`.
pub(crate) fn regex_at(data: &[u8], at: usize, end: usize) -> Result<(&str, &str)> {
    let pattern = cstring_at(data, at, end)?;
    let options = cstring_at(data, at + pattern.len() + 1, end)?;
    let pattern = std::str::from_utf8(pattern)
        .map_err(|_| Error::malformed(format!("invalid UTF-8 in regex at offset {}", at)))?;
    let options = std::str::from_utf8(options)
        .map_err(|_| Error::malformed(format!("invalid UTF-8 in regex at offset {}", at)))?;
    Ok((pattern, options))
}

/// Copies the 16 bytes of a decimal128 payload at the given offset.
pub(crate) fn decimal128_at(data: &[u8], at: usize) -> Result<[u8; 16]> {
    let payload = data
        .get(at..at + 16)
        .ok_or_else(|| truncated("decimal128", at))?;
    let mut value = [0u8; 16];
    value.copy_from_slice(payload);
    Ok(value)
}
