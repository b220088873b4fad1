//! Validation rules
//!
//! Fixed rule order:
//! 1. required_fields
//! 2. name_format
//! 3. struct_name_required
//! 4. struct_name_resolves
//! 5. examples_non_empty
//! 6. values_non_empty
//! 7. exclusive_options
//! 8. default_in_values (gated)
//! 9. default_matches_type
//! 10. struct_default_is_empty (gated)
//! 11. examples_match_type (gated)
//! 12. values_match_type (gated)
//!
//! A gated rule runs only while no earlier rule has recorded an error.
//! Gated rules assume the shape established by earlier rules; running them on
//! an already-invalid definition would report cascading errors.

use regex::Regex;
use std::sync::OnceLock;

use super::definition::AttributeInput;
use super::errors::{ErrorKind, Field, FieldError};
use crate::options::AttrOptions;
use crate::types::{TypeRegistry, TypeTag, Value};

/// Allowed attribute name characters
pub const NAME_PATTERN: &str = r"^[A-Za-z0-9_!?]+$";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"))
}

/// Everything a rule may inspect for one validation call.
pub struct RuleContext<'a> {
    pub name: Option<&'a str>,
    /// Type tag as submitted
    pub raw_type_tag: Option<&'a str>,
    /// Type tag if it is in the closed set
    pub type_tag: Option<TypeTag>,
    pub struct_name: Option<&'a str>,
    pub options: &'a AttrOptions,
    pub registry: &'a TypeRegistry,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        input: &'a AttributeInput,
        options: &'a AttrOptions,
        registry: &'a TypeRegistry,
    ) -> Self {
        let raw_type_tag = input.type_tag();
        Self {
            name: input.name(),
            raw_type_tag,
            type_tag: raw_type_tag.and_then(|t| registry.resolve_type(t).ok()),
            struct_name: input.struct_name(),
            options,
            registry,
        }
    }

    /// Human-readable expected type for mismatch messages
    fn expected(&self, tag: TypeTag) -> String {
        match (tag, self.struct_name) {
            (TypeTag::Struct, Some(name)) => format!("struct {}", name),
            _ => tag.as_str().to_string(),
        }
    }

    fn matches(&self, tag: TypeTag, value: &Value) -> bool {
        self.registry.matches(tag, self.struct_name, value)
    }
}

/// When a rule runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gating {
    /// Runs regardless of earlier errors
    Always,
    /// Runs only while no error has been recorded
    WhileValid,
}

/// Rule body: returns zero or more field errors
pub type Check = fn(&RuleContext<'_>) -> Vec<FieldError>;

/// A named validation rule
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub gating: Gating,
    check: Check,
}

impl Rule {
    pub const fn new(name: &'static str, gating: Gating, check: Check) -> Self {
        Self {
            name,
            gating,
            check,
        }
    }

    pub fn is_gated(&self) -> bool {
        self.gating == Gating::WhileValid
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("gating", &self.gating)
            .finish()
    }
}

/// Errors recorded so far plus the validity flag gated rules consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    errors: Vec<FieldError>,
    valid: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            valid: true,
        }
    }

    /// Applies one rule. A gated rule leaves an invalid accumulator unchanged.
    pub fn apply(mut self, rule: &Rule, ctx: &RuleContext<'_>) -> Self {
        if rule.is_gated() && !self.valid {
            return self;
        }

        let errors = (rule.check)(ctx);
        if !errors.is_empty() {
            self.valid = false;
            self.errors.extend(errors);
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered list of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The standard attribute rule set
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Rule::new("required_fields", Gating::Always, required_fields),
                Rule::new("name_format", Gating::Always, name_format),
                Rule::new("struct_name_required", Gating::Always, struct_name_required),
                Rule::new("struct_name_resolves", Gating::Always, struct_name_resolves),
                Rule::new("examples_non_empty", Gating::Always, examples_non_empty),
                Rule::new("values_non_empty", Gating::Always, values_non_empty),
                Rule::new("exclusive_options", Gating::Always, exclusive_options),
                Rule::new("default_in_values", Gating::WhileValid, default_in_values),
                Rule::new("default_matches_type", Gating::Always, default_matches_type),
                Rule::new("struct_default_is_empty", Gating::WhileValid, struct_default_is_empty),
                Rule::new("examples_match_type", Gating::WhileValid, examples_match_type),
                Rule::new("values_match_type", Gating::WhileValid, values_match_type),
            ],
        }
    }

    /// Folds every rule over the context, in order
    pub fn run(&self, ctx: &RuleContext<'_>) -> Accumulator {
        self.rules
            .iter()
            .fold(Accumulator::new(), |acc, rule| acc.apply(rule, ctx))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn required_fields(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if ctx.name.is_none() {
        errors.push(FieldError::missing(Field::Name));
    }

    match (ctx.raw_type_tag, ctx.type_tag) {
        (None, _) => errors.push(FieldError::missing(Field::TypeTag)),
        (Some(raw), None) => errors.push(FieldError::new(
            Field::TypeTag,
            ErrorKind::UnknownType,
            format!("unknown type '{}'", raw),
        )),
        (Some(_), Some(_)) => {}
    }

    errors
}

fn name_format(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    match ctx.name {
        Some(name) if !name_pattern().is_match(name) => vec![FieldError::new(
            Field::Name,
            ErrorKind::InvalidNameFormat,
            "must contain only letters, digits, underscores, ! and ?",
        )],
        _ => Vec::new(),
    }
}

fn struct_name_required(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    if ctx.type_tag == Some(TypeTag::Struct) && ctx.struct_name.is_none() {
        return vec![FieldError::missing(Field::StructName)];
    }
    Vec::new()
}

fn struct_name_resolves(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    match ctx.struct_name {
        Some(name) if ctx.registry.resolve_struct(name).is_err() => vec![FieldError::new(
            Field::StructName,
            ErrorKind::StructNotFound,
            format!("struct '{}' is not registered", name),
        )],
        _ => Vec::new(),
    }
}

fn non_empty_list(field: Field, value: Option<&Value>) -> Vec<FieldError> {
    match value {
        Some(v) if v.as_list().map_or(true, <[Value]>::is_empty) => vec![FieldError::new(
            field,
            ErrorKind::NonEmptyListRequired,
            "must be a non-empty list",
        )],
        _ => Vec::new(),
    }
}

fn examples_non_empty(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    non_empty_list(Field::Examples, ctx.options.examples.as_ref())
}

fn values_non_empty(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    non_empty_list(Field::Values, ctx.options.values.as_ref())
}

fn exclusive_options(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    let opts = ctx.options;
    let mut errors = Vec::new();

    if opts.required.is_some() && opts.default.is_some() {
        errors.push(FieldError::new(
            Field::Default,
            ErrorKind::MutuallyExclusiveOptions,
            "cannot be combined with required",
        ));
    }
    if opts.values.is_some() && opts.examples.is_some() {
        errors.push(FieldError::new(
            Field::Examples,
            ErrorKind::MutuallyExclusiveOptions,
            "cannot be combined with values",
        ));
    }

    errors
}

fn default_in_values(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    let opts = ctx.options;
    match (&opts.default, opts.values.as_ref().and_then(Value::as_list)) {
        (Some(default), Some(values)) if !values.contains(default) => vec![FieldError::new(
            Field::Default,
            ErrorKind::ValueNotInAllowedSet,
            "must be one of the allowed values",
        )],
        _ => Vec::new(),
    }
}

fn default_matches_type(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    // Missing or unknown tags were reported by required_fields
    match (ctx.type_tag, &ctx.options.default) {
        (Some(tag), Some(default)) if !ctx.matches(tag, default) => vec![
            FieldError::type_mismatch(Field::Default, ctx.expected(tag), default.type_name()),
        ],
        _ => Vec::new(),
    }
}

fn struct_default_is_empty(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    let (Some(name), Some(default)) = (ctx.struct_name, &ctx.options.default) else {
        return Vec::new();
    };
    let Ok(descriptor) = ctx.registry.resolve_struct(name) else {
        return Vec::new();
    };

    if *default != ctx.registry.empty_instance(&descriptor) {
        return vec![FieldError::new(
            Field::Default,
            ErrorKind::StructDefaultMismatch,
            format!("must equal the empty {} instance", name),
        )];
    }
    Vec::new()
}

fn elements_match_type(ctx: &RuleContext<'_>, field: Field, list: Option<&Value>) -> Vec<FieldError> {
    let (Some(tag), Some(items)) = (ctx.type_tag, list.and_then(Value::as_list)) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !ctx.matches(tag, item))
        .map(|(i, item)| {
            FieldError::new(
                field,
                ErrorKind::TypeMismatch,
                format!(
                    "element {}: expected {}, got {}",
                    i,
                    ctx.expected(tag),
                    item.type_name()
                ),
            )
        })
        .collect()
}

fn examples_match_type(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    elements_match_type(ctx, Field::Examples, ctx.options.examples.as_ref())
}

fn values_match_type(ctx: &RuleContext<'_>) -> Vec<FieldError> {
    elements_match_type(ctx, Field::Values, ctx.options.values.as_ref())
}
