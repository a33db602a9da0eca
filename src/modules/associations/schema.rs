use super::models::DuesFrequency;
use crate::core::RecordStatus;
use crate::repository::schema::{
    DeleteMode, DependencyEdge, EntitySchema, FieldDescriptor, FieldKind, GroupBy,
    StatisticsSpec, StatusField, SumOf, Transform,
};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::named("name", FieldKind::Text)
        .required()
        .max_len(150)
        .unique(),
    FieldDescriptor::named("acronym", FieldKind::Text).max_len(20),
    FieldDescriptor::named("address", FieldKind::Text).max_len(255),
    FieldDescriptor::named("contact_person", FieldKind::Text).max_len(100),
    FieldDescriptor::named("contact_number", FieldKind::Text).max_len(20),
    FieldDescriptor::named("email", FieldKind::Email)
        .max_len(255)
        .transform(Transform::Lowercase),
    FieldDescriptor::named("date_established", FieldKind::Date),
    FieldDescriptor::new("member_count", "total_members", FieldKind::Integer)
        .non_negative()
        .max_value(i32::MAX as i64),
    FieldDescriptor::new("dues_amount", "membership_dues", FieldKind::Decimal)
        .non_negative()
        .precision(12, 2),
    FieldDescriptor::named("dues_frequency", FieldKind::Enum(DuesFrequency::VALUES))
        .transform(Transform::Aliases(DuesFrequency::ALIASES)),
    FieldDescriptor::named("status", FieldKind::Enum(RecordStatus::VALUES)).required(),
];

pub const ASSOCIATION_SCHEMA: EntitySchema = EntitySchema {
    entity: "Association",
    table: "associations",
    fields: FIELDS,
    status: StatusField {
        field: "status",
        active: "active",
        inactive: "inactive",
    },
    natural_key: "name",
    search: &["name", "acronym", "contact_person"],
    filters: &["dues_frequency"],
    rules: &[],
    delete_mode: DeleteMode::Soft,
    dependencies: &[
        DependencyEdge {
            category: "members",
            table: "planters",
            column: "association_id",
        },
        DependencyEdge {
            category: "equipment",
            table: "trucks",
            column: "association_id",
        },
        DependencyEdge {
            category: "equipment",
            table: "tractors",
            column: "association_id",
        },
        DependencyEdge {
            category: "equipment",
            table: "harvesters",
            column: "association_id",
        },
    ],
    statistics: StatisticsSpec {
        groups: &[GroupBy::Field {
            key: "byDuesFrequency",
            field: "dues_frequency",
        }],
        sums: &[
            SumOf {
                key: "totalMembers",
                field: "member_count",
            },
            SumOf {
                key: "totalDues",
                field: "dues_amount",
            },
        ],
    },
};
