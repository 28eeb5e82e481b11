//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::fmt::{self, Display};

use serde::de;

use crate::document::ElementType;

pub type Result<T> = std::result::Result<T, Error>;

/// BSON decoding and document construction error.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Constructed from deserialization errors.
    Message(String),
    /// The input handed to `parse` cannot possibly hold a document.
    InvalidInput(&'static str),
    /// The byte stream violates the document layout: an unknown element tag,
    /// an element spanning past the declared document end, or a length prefix
    /// that is negative or implausible.
    MalformedBson(String),
    /// A strict typed getter was invoked on a field with a different tag.
    /// Carries the tag the getter required.
    TypeMismatch(ElementType),
    /// A strict typed getter was invoked for a name the document lacks.
    FieldNotFound(String),
    /// A strict array getter was invoked past the end of the array.
    IndexOutOfBounds(usize),
    /// `build()` was called on a builder that has already produced its value.
    IllegalState(&'static str),
}

impl Error {
    /// Shorthand for a `MalformedBson` with a formatted message.
    pub(crate) fn malformed(message: impl Into<String>) -> Error {
        Error::MalformedBson(message.into())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) =>
                formatter.write_str(msg),
            Error::InvalidInput(msg) =>
                write!(formatter, "invalid input: {}", msg),
            Error::MalformedBson(msg) =>
                write!(formatter, "malformed document: {}", msg),
            Error::TypeMismatch(expected) =>
                write!(formatter, "not {}", expected.name()),
            Error::FieldNotFound(name) =>
                write!(formatter, "no field named \"{}\"", name),
            Error::IndexOutOfBounds(index) =>
                write!(formatter, "index {} is out of bounds", index),
            Error::IllegalState(msg) =>
                write!(formatter, "illegal state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{ElementType, Error};

    #[test]
    fn test_type_mismatch_names_the_expected_tag() {
        assert_eq!(Error::TypeMismatch(ElementType::Int32).to_string(), "not INT32");
        assert_eq!(Error::TypeMismatch(ElementType::ObjectId).to_string(), "not OBJECT_ID");
        assert_eq!(Error::TypeMismatch(ElementType::DateTime).to_string(), "not DATE_TIME");
    }

    #[test]
    fn test_field_not_found_names_the_field() {
        assert_eq!(
            Error::FieldNotFound(String::from("age")).to_string(),
            "no field named \"age\"",
        );
    }
}
