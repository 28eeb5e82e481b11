//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Serde does not provide a regular expression type.
//! As such, the wire regex type is mapped onto a custom Regex structure.
//! This is achieved by having it represented during deserialization as a
//! structure with a special name and fields, similar to the way the TOML
//! crate approaches dates.

use serde::de;

use std::fmt;

use crate::value::Regex;

/// Name of the Regex structure.
pub const STRUCT_NAME: &str = "$__lazybson_private_Regex";

/// Name of the pattern field in the structure.
pub const PATTERN_FIELD: &str = "$__lazybson_private_Regex_pattern";

/// Name of the options field in the structure.
pub const OPTIONS_FIELD: &str = "$__lazybson_private_Regex_options";

/// Custom deserializer for the Regex pseudo-structure.
impl<'de> de::Deserialize<'de> for Regex {
    fn deserialize<D>(deserializer: D) -> Result<Regex, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct RegexVisitor;

        // Process the structure as a map.
        impl<'de> de::Visitor<'de> for RegexVisitor {
            type Value = Regex;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a regular expression")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Regex, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let pattern = match visitor.next_key::<RegexField>()? {
                    Some(RegexField::Pattern) => visitor.next_value::<String>()?,
                    _ => return Err(de::Error::custom("regex pattern field not found")),
                };
                let options = match visitor.next_key::<RegexField>()? {
                    Some(RegexField::Options) => visitor.next_value::<String>()?,
                    _ => return Err(de::Error::custom("regex options field not found")),
                };
                Ok(Regex { pattern, options })
            }
        }

        // Deserialize the Regex structure with the special name and fields.
        deserializer.deserialize_struct(
            STRUCT_NAME,
            &[PATTERN_FIELD, OPTIONS_FIELD],
            RegexVisitor,
        )
    }
}

enum RegexField {
    Pattern,
    Options,
}

/// Deserializes the custom regex struct fields.
impl<'de> de::Deserialize<'de> for RegexField {
    fn deserialize<D>(deserializer: D) -> Result<RegexField, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = RegexField;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a valid regex field")
            }

            fn visit_str<E>(self, s: &str) -> Result<RegexField, E>
            where
                E: de::Error,
            {
                if s == PATTERN_FIELD {
                    Ok(RegexField::Pattern)
                } else if s == OPTIONS_FIELD {
                    Ok(RegexField::Options)
                } else {
                    Err(de::Error::custom("expected field with custom name"))
                }
            }
        }

        deserializer.deserialize_identifier(FieldVisitor)
    }
}

/// Access object to provide a Map around the Regex pseudo-structure.
pub(crate) struct RegexDeserializer<'de> {
    pattern: &'de str,
    options: &'de str,
    served: usize,
}

impl<'de> RegexDeserializer<'de> {
    pub(crate) fn new(pattern: &'de str, options: &'de str) -> Self {
        RegexDeserializer {
            pattern,
            options,
            served: 0,
        }
    }
}

impl<'de> de::MapAccess<'de> for RegexDeserializer<'de> {
    type Error = crate::error::Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: de::DeserializeSeed<'de>,
    {
        use serde::de::IntoDeserializer;
        match self.served {
            0 => seed.deserialize(PATTERN_FIELD.into_deserializer()).map(Some),
            1 => seed.deserialize(OPTIONS_FIELD.into_deserializer()).map(Some),
            _ => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        use serde::de::value::BorrowedStrDeserializer;
        let text = if self.served == 0 {
            self.pattern
        } else {
            self.options
        };
        self.served += 1;
        seed.deserialize(BorrowedStrDeserializer::new(text))
    }
}
