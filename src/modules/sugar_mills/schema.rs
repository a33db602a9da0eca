use super::models::OperatingStatus;
use crate::core::RecordStatus;
use crate::repository::schema::{
    CrossRule, DeleteMode, EntitySchema, FieldDescriptor, FieldKind, GroupBy, StatisticsSpec,
    StatusField, SumOf, Transform,
};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::named("name", FieldKind::Text)
        .required()
        .max_len(150),
    FieldDescriptor::named("plant_code", FieldKind::Text)
        .required()
        .max_len(20)
        .unique()
        .transform(Transform::Uppercase),
    FieldDescriptor::named("location", FieldKind::Text).max_len(255),
    FieldDescriptor::named("capacity", FieldKind::Decimal)
        .required()
        .non_negative()
        .precision(12, 2),
    FieldDescriptor::named("operating_status", FieldKind::Enum(OperatingStatus::VALUES)),
    FieldDescriptor::named("contact_person", FieldKind::Text).max_len(100),
    FieldDescriptor::named("contact_number", FieldKind::Text).max_len(20),
    FieldDescriptor::named("email", FieldKind::Email)
        .max_len(255)
        .transform(Transform::Lowercase),
    FieldDescriptor::named("latitude", FieldKind::Latitude).precision(10, 7),
    FieldDescriptor::named("longitude", FieldKind::Longitude).precision(10, 7),
    FieldDescriptor::named("status", FieldKind::Enum(RecordStatus::VALUES)).required(),
];

pub const SUGAR_MILL_SCHEMA: EntitySchema = EntitySchema {
    entity: "Sugar mill",
    table: "sugar_mills",
    fields: FIELDS,
    status: StatusField {
        field: "status",
        active: "active",
        inactive: "inactive",
    },
    natural_key: "plant_code",
    search: &["name", "plant_code", "location"],
    filters: &["operating_status"],
    rules: &[CrossRule::Together(&["latitude", "longitude"])],
    delete_mode: DeleteMode::Hard,
    dependencies: &[],
    statistics: StatisticsSpec {
        groups: &[GroupBy::Field {
            key: "byOperatingStatus",
            field: "operating_status",
        }],
        sums: &[SumOf {
            key: "totalCapacity",
            field: "capacity",
        }],
    },
};
