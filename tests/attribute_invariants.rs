//! Attribute Invariant Tests
//!
//! Tests for attribute validation invariants:
//! - Required attribute fields must be present
//! - Names use only letters, digits, `_`, `!` and `?`
//! - Struct attributes reference a registered structure
//! - Option combinations are consistent
//! - Type matching is exact
//! - Validation is deterministic and shareable across threads

use std::fs;
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value as Json};
use slotattr::types::{StructCatalog, StructDescriptor, TypeRegistry, Value};
use slotattr::validation::{AttributeInput, AttributeValidator, ErrorKind, Field, Verdict};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_validator() -> AttributeValidator {
    let mut catalog = StructCatalog::new();
    catalog
        .register(
            StructDescriptor::new("Link", Vec::new())
                .with_field("href", Value::string(""))
                .with_field("label", Value::Null),
        )
        .unwrap();
    AttributeValidator::new(Arc::new(TypeRegistry::new(catalog)))
}

fn validate(validator: &AttributeValidator, input: Json) -> Verdict {
    let input: AttributeInput = serde_json::from_value(input).unwrap();
    validator.validate(&input).unwrap()
}

fn error_pairs(verdict: &Verdict) -> Vec<(Field, ErrorKind)> {
    verdict.errors().iter().map(|e| (e.field, e.kind)).collect()
}

fn count_kind(verdict: &Verdict, kind: ErrorKind) -> usize {
    verdict.errors().iter().filter(|e| e.kind == kind).count()
}

// =============================================================================
// Reference Scenarios
// =============================================================================

/// A required string attribute is accepted as submitted.
#[test]
fn test_required_string_is_valid() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "title", "type_tag": "string", "options": {"required": true}}),
    );

    let def = verdict.definition().expect("should be valid");
    assert_eq!(def.name, "title");
    assert_eq!(def.options.required, Some(true));
}

/// A space in the name is rejected on `name`.
#[test]
fn test_name_with_space_is_invalid() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "bad name", "type_tag": "string", "options": {}}),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Name, ErrorKind::InvalidNameFormat)]
    );
}

/// A struct attribute without a struct name is rejected on `struct_name`.
#[test]
fn test_struct_without_struct_name() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "x", "type_tag": "struct", "struct_name": null, "options": {}}),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::StructName, ErrorKind::MissingRequiredField)]
    );
}

/// A default outside the allowed values is rejected on `default`.
#[test]
fn test_default_not_in_values() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "count",
            "type_tag": "integer",
            "options": {"values": [1, 2, 3], "default": 5}
        }),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Default, ErrorKind::ValueNotInAllowedSet)]
    );
}

/// `required` and `default` together are rejected on `default`.
#[test]
fn test_required_with_default() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "flag",
            "type_tag": "boolean",
            "options": {"required": true, "default": true}
        }),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Default, ErrorKind::MutuallyExclusiveOptions)]
    );
}

// =============================================================================
// Required Field Tests
// =============================================================================

/// Missing name and type are both reported.
#[test]
fn test_missing_name_and_type() {
    let validator = setup_validator();
    let verdict = validate(&validator, json!({"options": {}}));

    assert_eq!(
        error_pairs(&verdict),
        vec![
            (Field::Name, ErrorKind::MissingRequiredField),
            (Field::TypeTag, ErrorKind::MissingRequiredField),
        ]
    );
}

/// Empty strings count as absent.
#[test]
fn test_empty_name_is_missing() {
    let validator = setup_validator();
    let verdict = validate(&validator, json!({"name": "", "type_tag": "string"}));

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Name, ErrorKind::MissingRequiredField)]
    );
}

/// An unknown type tag is reported on `type_tag` and skips type checks.
#[test]
fn test_unknown_type_tag() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "x", "type_tag": "decimal", "options": {"default": 1}}),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::TypeTag, ErrorKind::UnknownType)]
    );
}

// =============================================================================
// Struct Tests
// =============================================================================

/// A non-struct attribute never errors on a missing struct name.
#[test]
fn test_null_struct_name_ok_for_non_struct_tags() {
    let validator = setup_validator();
    for tag in ["any", "string", "atom", "boolean", "integer", "float", "list", "map", "global"] {
        let verdict = validate(&validator, json!({"name": "x", "type_tag": tag}));
        assert!(
            verdict.errors().iter().all(|e| e.field != Field::StructName),
            "tag {} reported struct_name",
            tag
        );
    }
}

/// Missing struct name is reported whatever else is wrong.
#[test]
fn test_missing_struct_name_independent_of_other_errors() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "bad name",
            "type_tag": "struct",
            "options": {"values": [], "examples": [1]}
        }),
    );

    assert!(error_pairs(&verdict).contains(&(Field::StructName, ErrorKind::MissingRequiredField)));
}

/// Unregistered structures are rejected.
#[test]
fn test_unknown_struct_name() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "x", "type_tag": "struct", "struct_name": "Button"}),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::StructName, ErrorKind::StructNotFound)]
    );
}

/// A struct default must be the empty instance.
#[test]
fn test_struct_default_must_be_empty_instance() {
    let validator = setup_validator();

    let empty = json!({"$struct": "Link", "fields": {"href": "", "label": null}});
    let verdict = validate(
        &validator,
        json!({"name": "link", "type_tag": "struct", "struct_name": "Link", "options": {"default": empty}}),
    );
    assert!(verdict.is_valid());

    let filled = json!({"$struct": "Link", "fields": {"href": "/home", "label": null}});
    let verdict = validate(
        &validator,
        json!({"name": "link", "type_tag": "struct", "struct_name": "Link", "options": {"default": filled}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Default, ErrorKind::StructDefaultMismatch)]
    );
}

/// Structures loaded from a descriptor directory resolve.
#[test]
fn test_struct_catalog_from_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("card.json"),
        json!({"name": "Card", "fields": [{"name": "title", "default": ""}]}).to_string(),
    )
    .unwrap();

    let mut catalog = StructCatalog::new();
    assert_eq!(catalog.load_dir(tmp.path()).unwrap(), 1);
    let validator = AttributeValidator::new(Arc::new(TypeRegistry::new(catalog)));

    let verdict = validate(
        &validator,
        json!({"name": "card", "type_tag": "struct", "struct_name": "Card"}),
    );
    assert!(verdict.is_valid());
}

// =============================================================================
// Option Combination Tests
// =============================================================================

/// `values` and `examples` together are rejected on `examples`.
#[test]
fn test_values_with_examples() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "size",
            "type_tag": "atom",
            "options": {"values": [{"$atom": "sm"}], "examples": [{"$atom": "lg"}]}
        }),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Examples, ErrorKind::MutuallyExclusiveOptions)]
    );
}

/// `required: false` still excludes `default`.
#[test]
fn test_required_false_with_default() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "n", "type_tag": "integer", "options": {"required": false, "default": 1}}),
    );

    assert_eq!(count_kind(&verdict, ErrorKind::MutuallyExclusiveOptions), 1);
}

/// Empty lists are rejected for `values` and `examples`.
#[test]
fn test_empty_lists_rejected() {
    let validator = setup_validator();

    let verdict = validate(
        &validator,
        json!({"name": "n", "type_tag": "integer", "options": {"values": []}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Values, ErrorKind::NonEmptyListRequired)]
    );

    let verdict = validate(
        &validator,
        json!({"name": "n", "type_tag": "integer", "options": {"examples": "1"}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Examples, ErrorKind::NonEmptyListRequired)]
    );
}

/// Membership is not checked once an earlier rule has failed.
#[test]
fn test_membership_gated_by_earlier_errors() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "bad name",
            "type_tag": "integer",
            "options": {"values": [1, 2], "default": 5}
        }),
    );

    assert_eq!(count_kind(&verdict, ErrorKind::ValueNotInAllowedSet), 0);
}

/// Element type checks are not run once an earlier rule has failed.
#[test]
fn test_element_checks_gated_by_earlier_errors() {
    let validator = setup_validator();

    let verdict = validate(
        &validator,
        json!({"name": "bad name", "type_tag": "integer", "options": {"values": ["a", true]}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Name, ErrorKind::InvalidNameFormat)]
    );

    let verdict = validate(
        &validator,
        json!({"name": "bad name", "type_tag": "string", "options": {"examples": [1, 2]}}),
    );
    assert_eq!(count_kind(&verdict, ErrorKind::TypeMismatch), 0);
}

/// The empty-instance check is not run once an earlier rule has failed.
#[test]
fn test_struct_default_check_gated_by_earlier_errors() {
    let validator = setup_validator();
    let filled = json!({"$struct": "Link", "fields": {"href": "/home", "label": null}});
    let verdict = validate(
        &validator,
        json!({
            "name": "bad name",
            "type_tag": "struct",
            "struct_name": "Link",
            "options": {"default": filled}
        }),
    );

    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Name, ErrorKind::InvalidNameFormat)]
    );
}

/// A present `required` must be a boolean; `null` does not hide the key.
#[test]
fn test_required_null_is_rejected() {
    let result: Result<AttributeInput, _> = serde_json::from_value(json!({
        "name": "n",
        "type_tag": "integer",
        "options": {"required": null, "default": 1}
    }));

    assert!(result.is_err());
}

/// `"options": null` reads as no options.
#[test]
fn test_null_options_are_empty() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "title", "type_tag": "string", "options": null}),
    );

    let def = verdict.definition().expect("should be valid");
    assert!(def.options.is_empty());
}

/// Unrecognized option keys pass through to the accepted definition.
#[test]
fn test_extra_options_pass_through() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "title", "type_tag": "string", "options": {"doc": "Heading text"}}),
    );

    let def = verdict.definition().expect("should be valid");
    assert_eq!(def.options.extra.get("doc"), Some(&Value::string("Heading text")));
}

// =============================================================================
// Type Matching Tests
// =============================================================================

/// Each non-matching list element yields exactly one type mismatch.
#[test]
fn test_one_mismatch_per_bad_element() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "level",
            "type_tag": "integer",
            "options": {"values": [1, "two", 3, true, 4.5]}
        }),
    );

    assert_eq!(verdict.errors().len(), 3);
    assert!(verdict
        .errors()
        .iter()
        .all(|e| e.field == Field::Values && e.kind == ErrorKind::TypeMismatch));
}

/// Example mismatches are all accumulated.
#[test]
fn test_example_mismatches_accumulate() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({"name": "label", "type_tag": "string", "options": {"examples": [1, 2, "ok"]}}),
    );

    assert_eq!(count_kind(&verdict, ErrorKind::TypeMismatch), 2);
}

/// Integer and float are distinct.
#[test]
fn test_no_numeric_coercion() {
    let validator = setup_validator();

    let verdict = validate(
        &validator,
        json!({"name": "ratio", "type_tag": "float", "options": {"default": 1}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Default, ErrorKind::TypeMismatch)]
    );

    let verdict = validate(
        &validator,
        json!({"name": "count", "type_tag": "integer", "options": {"default": 1.0}}),
    );
    assert_eq!(
        error_pairs(&verdict),
        vec![(Field::Default, ErrorKind::TypeMismatch)]
    );
}

/// Strings are not atoms.
#[test]
fn test_atom_requires_atom_values() {
    let validator = setup_validator();

    let verdict = validate(
        &validator,
        json!({"name": "variant", "type_tag": "atom", "options": {"default": "primary"}}),
    );
    assert_eq!(count_kind(&verdict, ErrorKind::TypeMismatch), 1);

    let verdict = validate(
        &validator,
        json!({"name": "variant", "type_tag": "atom", "options": {"default": {"$atom": "primary"}}}),
    );
    assert!(verdict.is_valid());
}

/// `any` accepts every value.
#[test]
fn test_any_accepts_everything() {
    let validator = setup_validator();
    let verdict = validate(
        &validator,
        json!({
            "name": "rest",
            "type_tag": "any",
            "options": {"examples": [null, 1, "s", [1], {"k": 2}, {"$atom": "a"}]}
        }),
    );

    assert!(verdict.is_valid());
}

// =============================================================================
// Determinism and Concurrency Tests
// =============================================================================

/// Same input validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let validator = setup_validator();
    let input = json!({
        "name": "bad name",
        "type_tag": "integer",
        "options": {"required": true, "default": "x", "values": [1], "examples": [2]}
    });

    let first = validate(&validator, input.clone());
    for _ in 0..100 {
        assert_eq!(validate(&validator, input.clone()), first);
    }
}

/// One validator serves many threads.
#[test]
fn test_concurrent_validation() {
    let validator = Arc::new(setup_validator());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let name = format!("attr_{}", i);
                let verdict = validate(
                    &validator,
                    json!({"name": name, "type_tag": "integer", "options": {"values": [i], "default": i}}),
                );
                verdict.is_valid()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
