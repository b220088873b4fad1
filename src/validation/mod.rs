//! Attribute validation subsystem
//!
//! Decides whether an attribute definition is internally consistent and
//! type-correct.
//!
//! # Design Principles
//!
//! - Fixed rule order, explicit per-rule gating
//! - Errors accumulate; only corrupt options abort a call
//! - No coercion or transformation of values
//! - Deterministic validation

mod definition;
mod errors;
mod rules;
mod validator;

pub use definition::{AttributeDefinition, AttributeInput, Verdict};
pub use errors::{ErrorKind, Field, FieldError, ValidateError, ValidateResult};
pub use rules::{Accumulator, Check, Gating, Rule, RuleContext, RuleSet, NAME_PATTERN};
pub use validator::AttributeValidator;
