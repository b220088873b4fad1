//! Validation error types
//!
//! Error codes (accumulated, one per offending field or element):
//! - ATTR_MISSING_REQUIRED_FIELD
//! - ATTR_INVALID_NAME_FORMAT
//! - ATTR_UNKNOWN_TYPE
//! - ATTR_STRUCT_NOT_FOUND
//! - ATTR_NON_EMPTY_LIST_REQUIRED
//! - ATTR_MUTUALLY_EXCLUSIVE_OPTIONS
//! - ATTR_VALUE_NOT_IN_ALLOWED_SET
//! - ATTR_TYPE_MISMATCH
//! - ATTR_STRUCT_DEFAULT_MISMATCH
//!
//! Precondition failure (aborts the call, nothing accumulated):
//! - ATTR_MALFORMED_OPTIONS

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use thiserror::Error;

use crate::options::CodecError;

/// Kinds of field-scoped validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required attribute field absent or empty
    MissingRequiredField,
    /// Name contains a character outside the allowed class
    InvalidNameFormat,
    /// Type tag outside the closed set
    UnknownType,
    /// Struct name not registered
    StructNotFound,
    /// `values` / `examples` empty or not a list
    NonEmptyListRequired,
    /// Two options that cannot be combined
    MutuallyExclusiveOptions,
    /// Default not among the allowed values
    ValueNotInAllowedSet,
    /// Value does not satisfy the declared type
    TypeMismatch,
    /// Struct default is not the empty instance
    StructDefaultMismatch,
}

impl ErrorKind {
    /// Returns the stable wire code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "ATTR_MISSING_REQUIRED_FIELD",
            ErrorKind::InvalidNameFormat => "ATTR_INVALID_NAME_FORMAT",
            ErrorKind::UnknownType => "ATTR_UNKNOWN_TYPE",
            ErrorKind::StructNotFound => "ATTR_STRUCT_NOT_FOUND",
            ErrorKind::NonEmptyListRequired => "ATTR_NON_EMPTY_LIST_REQUIRED",
            ErrorKind::MutuallyExclusiveOptions => "ATTR_MUTUALLY_EXCLUSIVE_OPTIONS",
            ErrorKind::ValueNotInAllowedSet => "ATTR_VALUE_NOT_IN_ALLOWED_SET",
            ErrorKind::TypeMismatch => "ATTR_TYPE_MISMATCH",
            ErrorKind::StructDefaultMismatch => "ATTR_STRUCT_DEFAULT_MISMATCH",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Attribute fields an error can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    TypeTag,
    StructName,
    Default,
    Values,
    Examples,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::TypeTag => "type_tag",
            Field::StructName => "struct_name",
            Field::Default => "default",
            Field::Values => "values",
            Field::Examples => "examples",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field-scoped validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: Field) -> Self {
        Self::new(field, ErrorKind::MissingRequiredField, "can't be blank")
    }

    pub fn type_mismatch(field: Field, expected: impl fmt::Display, actual: &str) -> Self {
        Self::new(
            field,
            ErrorKind::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.kind, self.message)
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 3)?;
        state.serialize_field("field", self.field.as_str())?;
        state.serialize_field("code", self.kind.code())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Precondition failures that abort a validation call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("Malformed options: {0}")]
    MalformedOptions(#[from] CodecError),
}

impl ValidateError {
    /// Returns the stable wire code
    pub fn code(&self) -> &'static str {
        match self {
            ValidateError::MalformedOptions(e) => e.code(),
        }
    }
}

/// Result type for validation calls
pub type ValidateResult<T> = Result<T, ValidateError>;
