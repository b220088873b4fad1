//! Type registry subsystem
//!
//! Resolves declared type tags to value predicates and structure
//! references to descriptors.
//!
//! # Design Principles
//!
//! - Closed set of type tags
//! - Structures resolve by catalog lookup only, never by evaluation
//! - Populated once at startup, read-only afterwards
//! - No coercion: a predicate accepts or rejects a value as given

mod descriptor;
mod errors;
mod registry;
mod resolver;
mod tag;
mod value;

pub use descriptor::{StructDescriptor, StructField};
pub use errors::{CatalogError, CatalogResult, TypeError, TypeResult};
pub use registry::{Predicate, TypeRegistry};
pub use resolver::{StructCatalog, StructResolver};
pub use tag::TypeTag;
pub use value::{StructInstance, Value};
