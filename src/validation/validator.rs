//! Attribute definition validator
//!
//! Validation semantics:
//! - Options are decoded first; corrupt options abort the call
//! - The standard rule set runs in fixed order
//! - Rule errors are accumulated, never raised
//! - The verdict carries either the accepted definition or every error
//!
//! Validation is pure and deterministic. The validator holds no mutable
//! state and may be shared between threads.

use std::sync::Arc;

use super::definition::{AttributeDefinition, AttributeInput, Verdict};
use super::errors::ValidateResult;
use super::rules::{RuleContext, RuleSet};
use crate::observability::{Event, Logger};
use crate::options::OptionsCodec;
use crate::types::TypeRegistry;

/// Validates attribute definitions against a type registry.
#[derive(Debug, Clone)]
pub struct AttributeValidator {
    registry: Arc<TypeRegistry>,
    rules: RuleSet,
}

impl AttributeValidator {
    /// Creates a validator with the standard rule set.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            rules: RuleSet::standard(),
        }
    }

    /// Returns the registry this validator resolves types against.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the rules in execution order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validates one attribute input.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::MalformedOptions` if the raw options cannot
    /// be decoded. No rule runs in that case. Semantically invalid input is
    /// never an error; it yields `Verdict::Invalid`.
    pub fn validate(&self, input: &AttributeInput) -> ValidateResult<Verdict> {
        let name = input.name().unwrap_or("");
        Logger::trace(Event::ValidationStart, &[("name", name)]);

        let options = OptionsCodec::decode(&input.options).map_err(|e| {
            let reason = e.to_string();
            Logger::warn(
                Event::OptionsMalformed,
                &[("name", name), ("reason", reason.as_str())],
            );
            e
        })?;

        let ctx = RuleContext::new(input, &options, &self.registry);
        let acc = self.rules.run(&ctx);

        if acc.is_valid() {
            if let (Some(name), Some(type_tag)) = (ctx.name, ctx.type_tag) {
                Logger::info(
                    Event::ValidationAccepted,
                    &[("name", name), ("type_tag", type_tag.as_str())],
                );
                return Ok(Verdict::Valid(AttributeDefinition {
                    name: name.to_string(),
                    type_tag,
                    struct_name: ctx.struct_name.map(str::to_string),
                    options: options.clone(),
                    slot_id: input.slot_id.clone(),
                }));
            }
        }

        let errors = acc.into_errors();
        let count = errors.len().to_string();
        let first = errors.first().map_or("", |e| e.kind.code());
        Logger::info(
            Event::ValidationRejected,
            &[("name", name), ("errors", count.as_str()), ("first", first)],
        );

        Ok(Verdict::Invalid(errors))
    }
}
