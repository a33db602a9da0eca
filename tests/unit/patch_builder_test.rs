//! Update-patch builder
//!
//! A patch holds exactly the fields present in the payload, in schema order,
//! with their normalized values.

#[path = "../helpers/mod.rs"]
mod helpers;

use cane_registry::associations::ASSOCIATION_SCHEMA;
use cane_registry::core::SqlValue;
use cane_registry::planters::PLANTER_SCHEMA;
use cane_registry::repository::schema::{FieldDescriptor, FieldKind};
use cane_registry::repository::{build_patch, normalize, Payload};
use helpers::*;
use proptest::prelude::*;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[test]
fn test_single_field_patch() {
    let payload = Payload::new().with("farm_size", 12.5);
    let values = normalize(&PLANTER_SCHEMA, &payload).unwrap();
    let patch = build_patch(&PLANTER_SCHEMA, &values).unwrap();

    assert_eq!(patch.columns, vec!["farm_size"]);
    assert_eq!(patch.values, vec![SqlValue::Decimal(dec!(12.5))]);
    assert_eq!(patch.assignments(), "farm_size = ?");
}

#[test]
fn test_patch_follows_schema_order_and_columns() {
    let payload = Payload::new()
        .with("dues_frequency", "annual")
        .with("member_count", 40)
        .with("name", "  Bogo Planters  ");
    let values = normalize(&ASSOCIATION_SCHEMA, &payload).unwrap();
    let patch = build_patch(&ASSOCIATION_SCHEMA, &values).unwrap();

    assert_eq!(patch.columns, vec!["name", "total_members", "dues_frequency"]);
    assert_eq!(
        patch.values,
        vec![
            SqlValue::Text("Bogo Planters".into()),
            SqlValue::Int(40),
            SqlValue::Text("annually".into()),
        ]
    );
    assert_eq!(patch.assignments(), "name = ?, total_members = ?, dues_frequency = ?");
}

#[test]
fn test_empty_date_becomes_null() {
    let payload = Payload::new().with("date_established", "");
    let values = normalize(&ASSOCIATION_SCHEMA, &payload).unwrap();
    let patch = build_patch(&ASSOCIATION_SCHEMA, &values).unwrap();

    assert_eq!(patch.columns, vec!["date_established"]);
    assert_eq!(patch.values, vec![SqlValue::Null]);
}

#[test]
fn test_empty_patch_is_request_error() {
    let values = normalize(&PLANTER_SCHEMA, &Payload::new()).unwrap();
    let message = assert_request_error(build_patch(&PLANTER_SCHEMA, &values));
    assert!(message.contains("No planter fields"));
}

/// A value every field of the given kind accepts
fn sample_value(field: &FieldDescriptor) -> Value {
    match field.kind {
        FieldKind::Text => json!("x"),
        FieldKind::Email => json!("planter@example.com"),
        FieldKind::Integer | FieldKind::Reference => json!(1),
        FieldKind::Decimal | FieldKind::Latitude | FieldKind::Longitude => json!(10),
        FieldKind::Date => json!("2024-01-31"),
        FieldKind::Bool => json!(true),
        FieldKind::Enum(values) => json!(values[0]),
    }
}

proptest! {
    #[test]
    fn prop_patch_holds_exactly_the_present_fields(
        mask in proptest::collection::vec(any::<bool>(), PLANTER_SCHEMA.fields.len())
    ) {
        let mut payload = Payload::new();
        let mut expected = Vec::new();
        for (field, present) in PLANTER_SCHEMA.fields.iter().zip(&mask) {
            if *present {
                payload = payload.with(field.name, sample_value(field));
                expected.push(field.column);
            }
        }

        let values = normalize(&PLANTER_SCHEMA, &payload).unwrap();
        match build_patch(&PLANTER_SCHEMA, &values) {
            Ok(patch) => {
                prop_assert_eq!(patch.columns, expected);
            }
            Err(err) => {
                prop_assert!(expected.is_empty());
                prop_assert!(err.field().is_none());
            }
        }
    }
}
