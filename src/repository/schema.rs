//! Compile-time field schemas
//!
//! Each entity declares one `static EntitySchema`. The validation engine,
//! uniqueness checker, patch builder, list filters and statistics all iterate
//! these tables instead of carrying per-entity logic.

/// Storage column holding the store-assigned identifier
pub const ID_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Payload keys the caller may never set
pub const RESERVED_FIELDS: &[&str] = &[ID_COLUMN, CREATED_AT_COLUMN, UPDATED_AT_COLUMN];

/// Value shape of a logical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text shaped `local@domain.tld`
    Email,
    Integer,
    Decimal,
    /// Decimal degrees in [-90, 90]
    Latitude,
    /// Decimal degrees in [-180, 180]
    Longitude,
    Date,
    Bool,
    /// One of the listed canonical spellings
    Enum(&'static [&'static str]),
    /// Id of a row in another table
    Reference,
}

impl FieldKind {
    /// Human description used in conversion errors
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email address",
            FieldKind::Integer => "whole number",
            FieldKind::Decimal => "number",
            FieldKind::Latitude => "latitude",
            FieldKind::Longitude => "longitude",
            FieldKind::Date => "date (YYYY-MM-DD)",
            FieldKind::Bool => "true/false value",
            FieldKind::Enum(_) => "option",
            FieldKind::Reference => "record id",
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Email | FieldKind::Enum(_))
    }
}

/// Normalization applied to a value before validation and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    None,
    Lowercase,
    Uppercase,
    /// Case-insensitive alias → canonical spelling
    Aliases(&'static [(&'static str, &'static str)]),
}

/// One logical field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_len: Option<usize>,
    pub unique: bool,
    pub non_negative: bool,
    /// `(precision, scale)` of a fixed-point column, as in `DECIMAL(12,2)`
    pub precision: Option<(u32, u32)>,
    /// Largest magnitude an integer column holds
    pub max_value: Option<i64>,
    pub transform: Transform,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            required: false,
            max_len: None,
            unique: false,
            non_negative: false,
            precision: None,
            max_value: None,
            transform: Transform::None,
        }
    }

    /// Field whose logical name is also its column name
    pub const fn named(name: &'static str, kind: FieldKind) -> Self {
        Self::new(name, name, kind)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }

    pub const fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some((precision, scale));
        self
    }

    pub const fn max_value(mut self, max_value: i64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// "farm_size" → "Farm size"
    pub fn label(&self) -> String {
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Rule spanning several fields, checked on the merged view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossRule {
    /// Either all listed fields hold a value or none do
    Together(&'static [&'static str]),
}

/// Lifecycle status field and its two spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusField {
    pub field: &'static str,
    pub active: &'static str,
    pub inactive: &'static str,
}

/// What `delete` does for an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Flip status to inactive, keep the row
    Soft,
    /// Remove the row once no dependency edge references it
    Hard,
}

/// A related table whose rows reference the entity by foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Label reported to the caller; several edges may share one
    pub category: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

/// One count-by dimension of the statistics report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Group on a categorical field of the entity itself
    Field {
        key: &'static str,
        field: &'static str,
    },
    /// Group on a label column of the row a reference field points at
    Related {
        key: &'static str,
        field: &'static str,
        table: &'static str,
        label_column: &'static str,
    },
}

impl GroupBy {
    pub fn key(&self) -> &'static str {
        match self {
            GroupBy::Field { key, .. } | GroupBy::Related { key, .. } => key,
        }
    }
}

/// Column summed into the statistics report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumOf {
    pub key: &'static str,
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSpec {
    pub groups: &'static [GroupBy],
    pub sums: &'static [SumOf],
}

/// Full declaration of one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Display name used in messages ("Sugar mill")
    pub entity: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDescriptor],
    pub status: StatusField,
    /// Unique field used by `get_by_natural_key`
    pub natural_key: &'static str,
    /// Text fields searched by the free-text list filter
    pub search: &'static [&'static str],
    /// Fields accepted as equality filters on list
    pub filters: &'static [&'static str],
    pub rules: &'static [CrossRule],
    pub delete_mode: DeleteMode,
    pub dependencies: &'static [DependencyEdge],
    pub statistics: StatisticsSpec,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.unique)
    }

    pub fn status_field(&self) -> Option<&'static FieldDescriptor> {
        self.field(self.status.field)
    }

    pub fn status_column(&self) -> &'static str {
        self.status_field()
            .map_or(self.status.field, |field| field.column)
    }

    /// `id, <columns...>, created_at, updated_at`
    pub fn select_list(&self) -> String {
        std::iter::once(ID_COLUMN)
            .chain(self.fields.iter().map(|f| f.column))
            .chain([CREATED_AT_COLUMN, UPDATED_AT_COLUMN])
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Unique field whose column a store-reported index name refers to
    ///
    /// Index names are usually the column itself or embed it
    /// (`uq_sugar_mills_plant_code`); the longest matching column wins so
    /// `plant_code` is not mistaken for `code`.
    pub fn unique_field_for_key(&self, key: Option<&str>) -> Option<&'static FieldDescriptor> {
        let matched = key.and_then(|key| {
            let key = key.to_ascii_lowercase();
            self.unique_fields()
                .filter(|f| key.contains(f.column))
                .max_by_key(|f| f.column.len())
        });

        matched.or_else(|| self.unique_fields().next())
    }

    /// Cross-check the declaration against itself
    ///
    /// Every name the schema refers to must be one of its fields, the status
    /// field must be an enum holding both spellings, and the natural key must
    /// be unique.
    pub fn check(&self) -> Result<(), String> {
        let known = |name: &str| self.field(name).is_some();

        match self.status_field() {
            Some(FieldDescriptor {
                kind: FieldKind::Enum(values),
                ..
            }) if values.contains(&self.status.active) && values.contains(&self.status.inactive) => {
            }
            _ => return Err(format!("{}: status field is not an active/inactive enum", self.entity)),
        }

        match self.field(self.natural_key) {
            Some(field) if field.unique => {}
            _ => return Err(format!("{}: natural key must be a unique field", self.entity)),
        }

        for name in self.search.iter().chain(self.filters) {
            if !known(name) {
                return Err(format!("{}: unknown field '{}'", self.entity, name));
            }
        }

        for rule in self.rules {
            let CrossRule::Together(names) = rule;
            if let Some(name) = names.iter().find(|n| !known(n)) {
                return Err(format!("{}: rule names unknown field '{}'", self.entity, name));
            }
        }

        for group in self.statistics.groups {
            let field = match group {
                GroupBy::Field { field, .. } | GroupBy::Related { field, .. } => field,
            };
            if !known(field) {
                return Err(format!("{}: group '{}' has unknown field", self.entity, group.key()));
            }
        }

        for sum in self.statistics.sums {
            if !known(sum.field) {
                return Err(format!("{}: sum '{}' has unknown field", self.entity, sum.key));
            }
        }

        if self.fields.iter().any(|f| RESERVED_FIELDS.contains(&f.name)) {
            return Err(format!("{}: declares a reserved field", self.entity));
        }

        Ok(())
    }
}
