//! Declared attribute type tags
//!
//! The tag set is closed. `struct` is special: its predicate depends on the
//! structure named by the attribute, not on the tag alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::TypeError;

/// Closed set of type tags an attribute may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Any value
    Any,
    /// UTF-8 string
    String,
    /// Symbolic name
    Atom,
    /// true / false
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Ordered sequence of values
    List,
    /// String-keyed map (struct instances included)
    Map,
    /// Map of pass-through markup attributes
    Global,
    /// Instance of a registered structure
    Struct,
}

impl TypeTag {
    /// Every tag, in declaration order
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Any,
        TypeTag::String,
        TypeTag::Atom,
        TypeTag::Boolean,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::List,
        TypeTag::Map,
        TypeTag::Global,
        TypeTag::Struct,
    ];

    /// Returns the tag as written in attribute definitions
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::String => "string",
            TypeTag::Atom => "atom",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::List => "list",
            TypeTag::Map => "map",
            TypeTag::Global => "global",
            TypeTag::Struct => "struct",
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, TypeTag::Struct)
    }
}

impl FromStr for TypeTag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| TypeError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
