use super::models::Gender;
use crate::core::RecordStatus;
use crate::repository::schema::{
    CrossRule, DeleteMode, EntitySchema, FieldDescriptor, FieldKind, GroupBy, StatisticsSpec,
    StatusField, SumOf, Transform,
};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::named("first_name", FieldKind::Text)
        .required()
        .max_len(100),
    FieldDescriptor::named("middle_name", FieldKind::Text).max_len(100),
    FieldDescriptor::named("last_name", FieldKind::Text)
        .required()
        .max_len(100),
    FieldDescriptor::named("gender", FieldKind::Enum(Gender::VALUES))
        .transform(Transform::Aliases(Gender::ALIASES)),
    FieldDescriptor::named("birth_date", FieldKind::Date),
    FieldDescriptor::named("contact_number", FieldKind::Text).max_len(20),
    // Optional, but unique when given
    FieldDescriptor::named("email", FieldKind::Email)
        .max_len(255)
        .unique()
        .transform(Transform::Lowercase),
    FieldDescriptor::named("address", FieldKind::Text).max_len(255),
    FieldDescriptor::named("association_id", FieldKind::Reference),
    FieldDescriptor::named("farm_location", FieldKind::Text).max_len(255),
    FieldDescriptor::named("farm_size", FieldKind::Decimal)
        .non_negative()
        .precision(12, 2),
    FieldDescriptor::named("latitude", FieldKind::Latitude).precision(10, 7),
    FieldDescriptor::named("longitude", FieldKind::Longitude).precision(10, 7),
    FieldDescriptor::named("status", FieldKind::Enum(RecordStatus::VALUES)).required(),
];

pub const PLANTER_SCHEMA: EntitySchema = EntitySchema {
    entity: "Planter",
    table: "planters",
    fields: FIELDS,
    status: StatusField {
        field: "status",
        active: "active",
        inactive: "inactive",
    },
    natural_key: "email",
    search: &["first_name", "last_name", "email", "farm_location"],
    filters: &["association_id", "gender"],
    rules: &[CrossRule::Together(&["latitude", "longitude"])],
    delete_mode: DeleteMode::Soft,
    dependencies: &[],
    statistics: StatisticsSpec {
        groups: &[
            GroupBy::Field {
                key: "byGender",
                field: "gender",
            },
            GroupBy::Related {
                key: "byAssociation",
                field: "association_id",
                table: "associations",
                label_column: "name",
            },
        ],
        sums: &[SumOf {
            key: "totalFarmSize",
            field: "farm_size",
        }],
    },
};
