use super::models::Role;
use crate::core::RecordStatus;
use crate::repository::schema::{
    DeleteMode, EntitySchema, FieldDescriptor, FieldKind, GroupBy, StatisticsSpec, StatusField,
    Transform,
};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::named("email", FieldKind::Email)
        .required()
        .max_len(255)
        .unique()
        .transform(Transform::Lowercase),
    FieldDescriptor::named("first_name", FieldKind::Text)
        .required()
        .max_len(100),
    FieldDescriptor::named("last_name", FieldKind::Text)
        .required()
        .max_len(100),
    FieldDescriptor::named("role", FieldKind::Enum(Role::VALUES)).required(),
    FieldDescriptor::named("position", FieldKind::Text).max_len(100),
    FieldDescriptor::named("department", FieldKind::Text).max_len(100),
    FieldDescriptor::named("contact_number", FieldKind::Text).max_len(20),
    FieldDescriptor::named("avatar_path", FieldKind::Text).max_len(255),
    FieldDescriptor::new("status", "account_status", FieldKind::Enum(RecordStatus::VALUES))
        .required(),
];

pub const USER_PROFILE_SCHEMA: EntitySchema = EntitySchema {
    entity: "User profile",
    table: "user_profiles",
    fields: FIELDS,
    status: StatusField {
        field: "status",
        active: "active",
        inactive: "inactive",
    },
    natural_key: "email",
    search: &["first_name", "last_name", "email", "department"],
    filters: &["role", "department"],
    rules: &[],
    delete_mode: DeleteMode::Soft,
    dependencies: &[],
    statistics: StatisticsSpec {
        groups: &[
            GroupBy::Field {
                key: "byRole",
                field: "role",
            },
            GroupBy::Field {
                key: "byDepartment",
                field: "department",
            },
        ],
        sums: &[],
    },
};
