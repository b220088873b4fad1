//! Attribute input and accepted definition

use serde::{Deserialize, Serialize};

use super::errors::FieldError;
use crate::options::{AttrOptions, RawOptions};
use crate::types::TypeTag;

/// An attribute definition as submitted by the authoring layer.
///
/// Every field may be absent; presence is checked by validation. Empty
/// strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeInput {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, alias = "type")]
    pub type_tag: Option<String>,

    #[serde(default)]
    pub struct_name: Option<String>,

    #[serde(default)]
    pub options: RawOptions,

    /// Owning slot, not interpreted
    #[serde(default)]
    pub slot_id: Option<String>,
}

impl AttributeInput {
    /// Create an input with a name and type tag
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_tag: Some(type_tag.into()),
            ..Self::default()
        }
    }

    pub fn with_struct_name(mut self, struct_name: impl Into<String>) -> Self {
        self.struct_name = Some(struct_name.into());
        self
    }

    pub fn with_options(mut self, options: impl Into<RawOptions>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_slot_id(mut self, slot_id: impl Into<String>) -> Self {
        self.slot_id = Some(slot_id.into());
        self
    }

    pub(crate) fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub(crate) fn type_tag(&self) -> Option<&str> {
        non_blank(&self.type_tag)
    }

    pub(crate) fn struct_name(&self) -> Option<&str> {
        non_blank(&self.struct_name)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// An accepted attribute definition, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub type_tag: TypeTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,
    pub options: AttrOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
}

/// Outcome of validating one attribute input.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Valid(AttributeDefinition),
    /// Field errors in rule order
    Invalid(Vec<FieldError>),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    /// The accepted definition, if valid
    pub fn definition(&self) -> Option<&AttributeDefinition> {
        match self {
            Verdict::Valid(def) => Some(def),
            Verdict::Invalid(_) => None,
        }
    }

    /// Field errors; empty if valid
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Verdict::Valid(_) => &[],
            Verdict::Invalid(errors) => errors,
        }
    }
}
