//! Attribute option record
//!
//! Recognized options get a typed field each. Anything else is carried
//! through untouched in `extra`, ordered by key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::types::Value;

/// Option keys with dedicated fields
pub const REQUIRED_KEY: &str = "required";
pub const DEFAULT_KEY: &str = "default";
pub const VALUES_KEY: &str = "values";
pub const EXAMPLES_KEY: &str = "examples";

/// Decoded attribute options.
///
/// A `Some` field means the key was present, whatever its value. An explicit
/// JSON `null` for `default` is `Some(Value::Null)`, not `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrOptions {
    #[serde(
        default,
        deserialize_with = "present_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<bool>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub values: Option<Value>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub examples: Option<Value>,

    /// Unrecognized options
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A present `required` must hold a boolean; `null` is rejected like any
/// other non-boolean.
fn present_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    bool::deserialize(deserializer).map(Some)
}

/// Maps a present key to `Some`, including an explicit null.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl AttrOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = Some(Value::List(values));
        self
    }

    pub fn with_examples(mut self, examples: Vec<Value>) -> Self {
        self.examples = Some(Value::List(examples));
        self
    }

    /// Sets any option by key, routing recognized keys to their fields.
    ///
    /// Returns the value back if `required` is given a non-boolean.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), Value> {
        match key {
            REQUIRED_KEY => match value.as_bool() {
                Some(b) => self.required = Some(b),
                None => return Err(value),
            },
            DEFAULT_KEY => self.default = Some(value),
            VALUES_KEY => self.values = Some(value),
            EXAMPLES_KEY => self.examples = Some(value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// True if `key` is present, recognized or not
    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            REQUIRED_KEY => self.required.is_some(),
            DEFAULT_KEY => self.default.is_some(),
            VALUES_KEY => self.values.is_some(),
            EXAMPLES_KEY => self.examples.is_some(),
            _ => self.extra.contains_key(key),
        }
    }

    /// Present options in canonical order: recognized keys first, then
    /// unrecognized keys sorted.
    pub fn entries(&self) -> Vec<(&str, Value)> {
        let mut entries = Vec::with_capacity(4 + self.extra.len());
        if let Some(required) = self.required {
            entries.push((REQUIRED_KEY, Value::Bool(required)));
        }
        if let Some(v) = &self.default {
            entries.push((DEFAULT_KEY, v.clone()));
        }
        if let Some(v) = &self.values {
            entries.push((VALUES_KEY, v.clone()));
        }
        if let Some(v) = &self.examples {
            entries.push((EXAMPLES_KEY, v.clone()));
        }
        for (k, v) in &self.extra {
            entries.push((k.as_str(), v.clone()));
        }
        entries
    }

    /// Number of present options
    pub fn len(&self) -> usize {
        [
            self.required.is_some(),
            self.default.is_some(),
            self.values.is_some(),
            self.examples.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
            + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options as submitted: already decoded, or in serialized binary form.
///
/// In JSON the decoded form is an object and the binary form is a base64
/// string.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOptions {
    Decoded(AttrOptions),
    Encoded(Vec<u8>),
}

impl Default for RawOptions {
    fn default() -> Self {
        RawOptions::Decoded(AttrOptions::default())
    }
}

impl From<AttrOptions> for RawOptions {
    fn from(options: AttrOptions) -> Self {
        RawOptions::Decoded(options)
    }
}

impl From<Vec<u8>> for RawOptions {
    fn from(bytes: Vec<u8>) -> Self {
        RawOptions::Encoded(bytes)
    }
}

impl<'de> Deserialize<'de> for RawOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Encoded(String),
            Decoded(AttrOptions),
        }

        // An explicit null reads like a missing key
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(RawOptions::default()),
            Some(Repr::Decoded(options)) => Ok(RawOptions::Decoded(options)),
            Some(Repr::Encoded(text)) => STANDARD
                .decode(text.as_bytes())
                .map(RawOptions::Encoded)
                .map_err(|e| serde::de::Error::custom(format!("options are not valid base64: {}", e))),
        }
    }
}
