//! Attribute values
//!
//! The value model covers everything an option (`default`, `values`,
//! `examples`) may hold:
//! - null, boolean, 64-bit integer, 64-bit float
//! - string and atom (a bare symbolic name, distinct from a string)
//! - list, string-keyed map
//! - struct instance (a named map whose fields are fixed by a registered descriptor)
//!
//! JSON representation: plain JSON maps onto the obvious variants.
//! `{"$atom": "name"}` is an atom and `{"$struct": "Name", "fields": {..}}`
//! is a struct instance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};
use std::collections::BTreeMap;

const ATOM_KEY: &str = "$atom";
const STRUCT_KEY: &str = "$struct";
const FIELDS_KEY: &str = "fields";

/// A dynamically typed attribute value.
///
/// Equality is strict and structural: `Integer(1)` is not equal to
/// `Float(1.0)`, an atom is never equal to a string with the same text, and
/// floats compare by bit pattern (so `NaN == NaN` and `0.0 != -0.0`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Atom(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Struct(StructInstance),
}

/// An instance of a registered structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructInstance {
    /// Registered structure name
    pub name: String,
    /// Field values keyed by field name
    pub fields: BTreeMap<String, Value>,
}

impl StructInstance {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Creates an atom value
    pub fn atom(name: impl Into<String>) -> Self {
        Value::Atom(name.into())
    }

    /// Creates a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Returns the value kind for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Atom(_) => "atom",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    /// Returns the list elements if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // u64 beyond i64::MAX and all fractional numbers
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => from_json_object(obj),
        }
    }
}

fn from_json_object(mut obj: Map<String, serde_json::Value>) -> Value {
    if obj.len() == 1 {
        if let Some(serde_json::Value::String(name)) = obj.get(ATOM_KEY) {
            return Value::Atom(name.clone());
        }
    }

    let is_struct = matches!(obj.get(STRUCT_KEY), Some(serde_json::Value::String(_)))
        && obj.keys().all(|k| k == STRUCT_KEY || k == FIELDS_KEY)
        && obj.get(FIELDS_KEY).map_or(true, |f| f.is_object());

    if is_struct {
        let name = match obj.remove(STRUCT_KEY) {
            Some(serde_json::Value::String(name)) => name,
            _ => String::new(),
        };
        let fields = match obj.remove(FIELDS_KEY) {
            Some(serde_json::Value::Object(fields)) => fields
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
            _ => BTreeMap::new(),
        };
        return Value::Struct(StructInstance { name, fields });
    }

    Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            // JSON has no NaN or infinity
            Value::Float(f) => Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Atom(name) => {
                let mut obj = Map::new();
                obj.insert(ATOM_KEY.into(), serde_json::Value::String(name));
                serde_json::Value::Object(obj)
            }
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::Struct(inst) => {
                let fields: Map<String, serde_json::Value> =
                    inst.fields.into_iter().map(|(k, v)| (k, v.into())).collect();
                let mut obj = Map::new();
                obj.insert(STRUCT_KEY.into(), serde_json::Value::String(inst.name));
                obj.insert(FIELDS_KEY.into(), serde_json::Value::Object(fields));
                serde_json::Value::Object(obj)
            }
        }
    }
}
