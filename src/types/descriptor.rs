//! Structure descriptors
//!
//! A descriptor declares a structure that attributes may reference through
//! the `struct` type tag. Descriptors are plain data: the field list and each
//! field's default value. The empty instance of a structure is the instance
//! holding every field's default.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::value::{StructInstance, Value};

/// A single declared field of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    /// Field name
    pub name: String,
    /// Value the field holds in the empty instance
    #[serde(default)]
    pub default: Value,
}

impl StructField {
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Declared structure eligible for `struct`-typed attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDescriptor {
    /// Registered structure name
    pub name: String,
    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<StructField>,
}

impl StructDescriptor {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Add a field with the given default
    pub fn with_field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.fields.push(StructField::new(name, default));
        self
    }

    /// Validates the descriptor itself (not an instance)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("struct name must not be empty".into());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err("field names must not be empty".into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }
        }

        Ok(())
    }

    /// The canonical zero-value instance of this structure
    pub fn empty_instance(&self) -> Value {
        let fields: BTreeMap<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();
        Value::Struct(StructInstance::new(self.name.clone(), fields))
    }

    /// Returns true if `value` is an instance of this structure.
    ///
    /// An instance must carry this structure's name and exactly the
    /// declared field set; field values are not inspected.
    pub fn is_instance(&self, value: &Value) -> bool {
        match value {
            Value::Struct(inst) => {
                inst.name == self.name
                    && inst.fields.len() == self.fields.len()
                    && self.fields.iter().all(|f| inst.fields.contains_key(&f.name))
            }
            _ => false,
        }
    }
}
