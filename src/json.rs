//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Compact JSON-ish rendering shared by the indexed and builder-backed
//! views.
//!
//! The output is a boundary format, not canonical JSON: values without a
//! stable JSON shape (binary, decimal128, code-with-scope, the key
//! sentinels) render as the `<unsupported>` token. Callers wanting stable
//! renderings of those use higher-level codecs.

use crate::error::Result;
use crate::value::Value;

/// The token emitted for values this rendering does not support.
pub(crate) const UNSUPPORTED: &str = "<unsupported>";

/// Appends `text` with `"`, `\`, newline, carriage return and tab escaped.
pub(crate) fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}

/// Appends `text` as a quoted, escaped JSON string.
pub(crate) fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    escape_into(out, text);
    out.push('"');
}

/// Renders one decoded element value from an indexed view.
pub(crate) fn write_value(out: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Double(value) =>
            out.push_str(&value.to_string()),
        Value::String(text) | Value::JavaScript(text) | Value::Symbol(text) =>
            write_quoted(out, text),
        Value::Document(document) =>
            document.write_json(out)?,
        Value::Array(array) =>
            array.write_json(out)?,
        Value::ObjectId(id) =>
            write_quoted(out, id),
        Value::Boolean(value) =>
            out.push_str(if *value { "true" } else { "false" }),
        Value::DateTime(millis) =>
            out.push_str(&millis.to_string()),
        Value::Null | Value::Undefined =>
            out.push_str("null"),
        Value::Regex { pattern, options } => {
            let mut text = String::with_capacity(pattern.len() + options.len() + 2);
            text.push('/');
            text.push_str(pattern);
            text.push('/');
            text.push_str(options);
            write_quoted(out, &text);
        }
        Value::Int32(value) =>
            out.push_str(&value.to_string()),
        Value::Int64(value) =>
            out.push_str(&value.to_string()),
        Value::Timestamp(value) =>
            out.push_str(&value.to_string()),
        Value::Binary { .. }
        | Value::CodeWithScope(_)
        | Value::Decimal128(_)
        | Value::MinKey
        | Value::MaxKey =>
            out.push_str(UNSUPPORTED),
    }
    Ok(())
}
