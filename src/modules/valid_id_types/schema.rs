use super::models::IdCategory;
use crate::core::RecordStatus;
use crate::repository::schema::{
    DeleteMode, EntitySchema, FieldDescriptor, FieldKind, GroupBy, StatisticsSpec, StatusField,
};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::named("name", FieldKind::Text)
        .required()
        .max_len(100)
        .unique(),
    FieldDescriptor::named("description", FieldKind::Text).max_len(255),
    FieldDescriptor::named("category", FieldKind::Enum(IdCategory::VALUES)),
    FieldDescriptor::named("requires_expiry", FieldKind::Bool),
    FieldDescriptor::named("status", FieldKind::Enum(RecordStatus::VALUES)).required(),
];

pub const VALID_ID_TYPE_SCHEMA: EntitySchema = EntitySchema {
    entity: "Valid ID type",
    table: "valid_id_types",
    fields: FIELDS,
    status: StatusField {
        field: "status",
        active: "active",
        inactive: "inactive",
    },
    natural_key: "name",
    search: &["name", "description"],
    filters: &["category"],
    rules: &[],
    delete_mode: DeleteMode::Soft,
    dependencies: &[],
    statistics: StatisticsSpec {
        groups: &[GroupBy::Field {
            key: "byCategory",
            field: "category",
        }],
        sums: &[],
    },
};
