//! Inventory model
//!
//! The normalized representation of one point-in-time schema snapshot:
//! tables and columns keyed by their identity keys. An [`Inventory`] is pure
//! data (construction and lookup only) and is immutable once built. The
//! reconciliation engine compares two of them (a live "source" side and a
//! previously recorded "tracked" side) without caring where either came from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use std::fmt;

use mica_core::{ColumnKey, ConsumerId, ConsumerScoped, TableKey};

/// Kind of a tabular schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// An ordinary base table.
    #[default]
    BaseTable,
    /// A view.
    View,
}

impl TableKind {
    /// Get the kind identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::BaseTable => "base_table",
            TableKind::View => "view",
        }
    }

    /// Parse a kind from an information-schema style label.
    ///
    /// Accepts both the upstream `TABLE_TYPE` spellings (`BASE TABLE`,
    /// `VIEW`) and this crate's own identifiers.
    #[must_use]
    pub fn parse_str(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "BASE TABLE" | "BASE_TABLE" | "TABLE" => Some(TableKind::BaseTable),
            "VIEW" => Some(TableKind::View),
            _ => None,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render the single declared-type string from raw type metadata.
///
/// The rendering mirrors the source catalog's convention so both sides of a
/// comparison agree on the same string:
/// - `name(max)` when the reported max length is -1 (unbounded),
/// - `name(len)` when the max length is positive,
/// - otherwise `name(precision,scale)` when both are positive,
/// - otherwise `name(precision)` when only the precision is positive,
/// - otherwise the bare type name.
#[must_use]
pub fn render_data_type(
    type_name: &str,
    max_length: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> String {
    match max_length {
        Some(-1) => format!("{type_name}(max)"),
        Some(len) if len > 0 => format!("{type_name}({len})"),
        _ => match (precision, scale) {
            (Some(p), Some(s)) if p > 0 && s > 0 => format!("{type_name}({p},{s})"),
            (Some(p), _) if p > 0 => format!("{type_name}({p})"),
            _ => type_name.to_string(),
        },
    }
}

/// One table in an inventory.
///
/// Carries opaque identifiers (source object id, owning consumer) through to
/// actuation collaborators; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Identity of the table.
    pub key: TableKey,

    /// Whether this is a base table or a view.
    #[serde(default)]
    pub kind: TableKind,

    /// Number of columns the side reporting this record saw.
    #[serde(default)]
    pub column_count: u32,

    /// Source system object id, when the side carries one.
    #[serde(default)]
    pub object_id: Option<i64>,

    /// Owning downstream consumer, when one is registered for this table.
    #[serde(default)]
    pub consumer: Option<ConsumerId>,
}

impl TableRecord {
    /// Create a new table record.
    pub fn new(key: TableKey, kind: TableKind) -> Self {
        Self {
            key,
            kind,
            column_count: 0,
            object_id: None,
            consumer: None,
        }
    }

    /// Set the column count.
    #[must_use]
    pub fn with_column_count(mut self, count: u32) -> Self {
        self.column_count = count;
        self
    }

    /// Set the source system object id.
    #[must_use]
    pub fn with_object_id(mut self, object_id: i64) -> Self {
        self.object_id = Some(object_id);
        self
    }

    /// Set the owning consumer.
    #[must_use]
    pub fn with_consumer(mut self, consumer: ConsumerId) -> Self {
        self.consumer = Some(consumer);
        self
    }
}

impl ConsumerScoped for TableRecord {
    fn consumer(&self) -> Option<&ConsumerId> {
        self.consumer.as_ref()
    }
}

/// One column in an inventory.
///
/// Every monitored field is optional: a side may report an unset or legacy
/// record, and the comparator skips an axis that is absent on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Identity of the column.
    pub key: ColumnKey,

    /// Declared data type as a single rendered string that already encodes
    /// length/precision/scale (see [`render_data_type`]).
    #[serde(default)]
    pub data_type: Option<String>,

    /// Raw type name without length/precision decoration.
    #[serde(default)]
    pub type_name: Option<String>,

    /// Maximum length in characters; -1 means unbounded.
    #[serde(default)]
    pub max_length: Option<i32>,

    /// Numeric precision.
    #[serde(default)]
    pub precision: Option<i32>,

    /// Numeric scale.
    #[serde(default)]
    pub scale: Option<i32>,

    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: Option<bool>,

    /// Declared default value expression.
    #[serde(default)]
    pub default_value: Option<String>,

    /// 1-based position of the column within its table.
    #[serde(default)]
    pub ordinal_position: Option<u32>,

    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: Option<bool>,

    /// Owning downstream consumer, when one is registered for this column.
    #[serde(default)]
    pub consumer: Option<ConsumerId>,
}

impl ColumnRecord {
    /// Create a new column record with every field unset.
    pub fn new(key: ColumnKey) -> Self {
        Self {
            key,
            data_type: None,
            type_name: None,
            max_length: None,
            precision: None,
            scale: None,
            nullable: None,
            default_value: None,
            ordinal_position: None,
            primary_key: None,
            consumer: None,
        }
    }

    /// Set the rendered data type string directly.
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Set the raw type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the maximum length (-1 means unbounded).
    #[must_use]
    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the numeric precision.
    #[must_use]
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set the numeric scale.
    #[must_use]
    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the nullability flag.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Set the declared default value expression.
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Set the 1-based ordinal position.
    #[must_use]
    pub fn with_ordinal_position(mut self, ordinal_position: u32) -> Self {
        self.ordinal_position = Some(ordinal_position);
        self
    }

    /// Set the primary-key flag.
    #[must_use]
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    /// Set the owning consumer.
    #[must_use]
    pub fn with_consumer(mut self, consumer: ConsumerId) -> Self {
        self.consumer = Some(consumer);
        self
    }

    /// Render `data_type` from the raw type parts already set on the record.
    ///
    /// Leaves the record unchanged when no raw type name is present.
    #[must_use]
    pub fn with_rendered_data_type(mut self) -> Self {
        if let Some(type_name) = &self.type_name {
            self.data_type = Some(render_data_type(
                type_name,
                self.max_length,
                self.precision,
                self.scale,
            ));
        }
        self
    }
}

impl ConsumerScoped for ColumnRecord {
    fn consumer(&self) -> Option<&ConsumerId> {
        self.consumer.as_ref()
    }
}

/// One point-in-time schema snapshot: tables and columns keyed by identity.
///
/// Immutable once built (see [`InventoryBuilder`]). Both maps are ordered,
/// so iteration order is deterministic and reconciliation output depends
/// only on inventory contents, never on insertion order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    tables: BTreeMap<TableKey, TableRecord>,
    columns: BTreeMap<ColumnKey, ColumnRecord>,
}

impl Inventory {
    /// Start building an inventory.
    #[must_use]
    pub fn builder() -> InventoryBuilder {
        InventoryBuilder::default()
    }

    /// All tables, keyed by identity.
    #[must_use]
    pub fn tables(&self) -> &BTreeMap<TableKey, TableRecord> {
        &self.tables
    }

    /// All columns, keyed by identity.
    #[must_use]
    pub fn columns(&self) -> &BTreeMap<ColumnKey, ColumnRecord> {
        &self.columns
    }

    /// Look up one table.
    #[must_use]
    pub fn table(&self, key: &TableKey) -> Option<&TableRecord> {
        self.tables.get(key)
    }

    /// Look up one column.
    #[must_use]
    pub fn column(&self, key: &ColumnKey) -> Option<&ColumnRecord> {
        self.columns.get(key)
    }

    /// Number of tables in the snapshot.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of columns in the snapshot.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the snapshot holds no tables and no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.is_empty()
    }

    /// The columns belonging to one table, in column-name order.
    pub fn columns_of<'a>(
        &'a self,
        key: &'a TableKey,
    ) -> impl Iterator<Item = &'a ColumnRecord> + 'a {
        self.columns
            .values()
            .filter(move |record| record.key.table_key() == key)
    }

    /// Column keys whose owning table is missing from this snapshot's table
    /// mapping. A well-formed inventory yields none; the reconciler rejects
    /// an inventory with any.
    pub fn orphaned_columns(&self) -> impl Iterator<Item = &ColumnKey> + '_ {
        self.columns
            .keys()
            .filter(move |key| !self.tables.contains_key(key.table_key()))
    }
}

/// Builder for [`Inventory`].
///
/// Inserting a record whose key is already present replaces the earlier
/// record (map semantics): upstream feeds may legitimately re-emit a row.
#[derive(Debug, Clone, Default)]
pub struct InventoryBuilder {
    tables: BTreeMap<TableKey, TableRecord>,
    columns: BTreeMap<ColumnKey, ColumnRecord>,
}

impl InventoryBuilder {
    /// Add a table record.
    #[must_use]
    pub fn with_table(mut self, record: TableRecord) -> Self {
        self.tables.insert(record.key.clone(), record);
        self
    }

    /// Add a column record.
    #[must_use]
    pub fn with_column(mut self, record: ColumnRecord) -> Self {
        self.columns.insert(record.key.clone(), record);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Inventory {
        Inventory {
            tables: self.tables,
            columns: self.columns,
        }
    }
}
