//! Type registry
//!
//! Maps each type tag to a value predicate and resolves structure
//! references through a [`StructResolver`]. The registry is built once at
//! startup and read-only afterwards, so it can be shared between threads
//! without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::descriptor::StructDescriptor;
use super::errors::{TypeError, TypeResult};
use super::resolver::StructResolver;
use super::tag::TypeTag;
use super::value::Value;

/// Value predicate for a primitive type tag
pub type Predicate = fn(&Value) -> bool;

fn is_any(_: &Value) -> bool {
    true
}

fn is_string(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

fn is_atom(v: &Value) -> bool {
    matches!(v, Value::Atom(_))
}

fn is_boolean(v: &Value) -> bool {
    matches!(v, Value::Bool(_))
}

fn is_integer(v: &Value) -> bool {
    matches!(v, Value::Integer(_))
}

fn is_float(v: &Value) -> bool {
    matches!(v, Value::Float(_))
}

fn is_list(v: &Value) -> bool {
    matches!(v, Value::List(_))
}

fn is_map(v: &Value) -> bool {
    matches!(v, Value::Map(_) | Value::Struct(_))
}

fn is_global(v: &Value) -> bool {
    matches!(v, Value::Map(_))
}

/// Resolves type tags and structure references for validation.
pub struct TypeRegistry {
    predicates: HashMap<TypeTag, Predicate>,
    resolver: Box<dyn StructResolver>,
}

impl TypeRegistry {
    /// Creates a registry with the built-in predicates.
    pub fn new(resolver: impl StructResolver + 'static) -> Self {
        let predicates: [(TypeTag, Predicate); 9] = [
            (TypeTag::Any, is_any),
            (TypeTag::String, is_string),
            (TypeTag::Atom, is_atom),
            (TypeTag::Boolean, is_boolean),
            (TypeTag::Integer, is_integer),
            (TypeTag::Float, is_float),
            (TypeTag::List, is_list),
            (TypeTag::Map, is_map),
            (TypeTag::Global, is_global),
        ];

        Self {
            predicates: predicates.into_iter().collect(),
            resolver: Box::new(resolver),
        }
    }

    /// Replaces the predicate of a primitive tag.
    ///
    /// The `struct` predicate depends on the referenced structure and
    /// cannot be replaced.
    pub fn with_predicate(mut self, tag: TypeTag, predicate: Predicate) -> TypeResult<Self> {
        if tag.is_struct() {
            return Err(TypeError::ReservedTag(tag.as_str().to_string()));
        }
        self.predicates.insert(tag, predicate);
        Ok(self)
    }

    /// Resolves a raw type tag.
    pub fn resolve_type(&self, tag: &str) -> TypeResult<TypeTag> {
        tag.parse()
    }

    /// Resolves a structure name to its descriptor.
    pub fn resolve_struct(&self, name: &str) -> TypeResult<Arc<StructDescriptor>> {
        self.resolver
            .resolve(name)
            .ok_or_else(|| TypeError::StructNotFound(name.to_string()))
    }

    /// Returns true if `value` satisfies `tag`.
    ///
    /// For `struct` the value must be an instance of the structure named by
    /// `struct_name`; an absent or unresolvable name matches nothing.
    pub fn matches(&self, tag: TypeTag, struct_name: Option<&str>, value: &Value) -> bool {
        if tag.is_struct() {
            return struct_name
                .and_then(|name| self.resolver.resolve(name))
                .map_or(false, |descriptor| descriptor.is_instance(value));
        }

        self.predicates
            .get(&tag)
            .map_or(false, |predicate| predicate(value))
    }

    /// The canonical empty instance of a structure.
    pub fn empty_instance(&self, descriptor: &StructDescriptor) -> Value {
        descriptor.empty_instance()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.predicates.keys().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("predicates", &tags)
            .finish_non_exhaustive()
    }
}
