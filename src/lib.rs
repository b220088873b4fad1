//! slotattr - A strict, deterministic validator for slot attribute definitions
//!
//! An attribute definition names a value a component slot accepts, its
//! type tag, and options such as a default or an allowed value set.
//! Validation never coerces: a definition is accepted as submitted or
//! rejected with every field error found.

pub mod cli;
pub mod observability;
pub mod options;
pub mod types;
pub mod validation;

pub use options::{AttrOptions, OptionsCodec, RawOptions};
pub use types::{StructCatalog, StructDescriptor, TypeRegistry, TypeTag, Value};
pub use validation::{AttributeDefinition, AttributeInput, AttributeValidator, Verdict};
