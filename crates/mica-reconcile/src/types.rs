//! Change vocabulary
//!
//! The classified units a reconciliation pass produces: change kinds, the
//! monitored comparison axes, per-field diffs, and the tagged change record.

use serde::{Deserialize, Serialize};
use std::fmt;

use mica_core::{ColumnKey, ConsumerId, ConsumerScoped, TableKey};

/// Kind of a detected schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A table exists in the source inventory only.
    TableAdded,
    /// A table exists in the tracked inventory only.
    TableDeleted,
    /// A column exists in the source inventory only.
    ColumnAdded,
    /// A column exists in the tracked inventory only.
    ColumnDeleted,
    /// A column exists on both sides with differing monitored fields.
    ColumnModified,
}

impl ChangeKind {
    /// Every kind, in report category order.
    pub const ALL: [ChangeKind; 5] = [
        ChangeKind::TableAdded,
        ChangeKind::TableDeleted,
        ChangeKind::ColumnAdded,
        ChangeKind::ColumnDeleted,
        ChangeKind::ColumnModified,
    ];

    /// Get the kind identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::TableAdded => "table_added",
            ChangeKind::TableDeleted => "table_deleted",
            ChangeKind::ColumnAdded => "column_added",
            ChangeKind::ColumnDeleted => "column_deleted",
            ChangeKind::ColumnModified => "column_modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the four monitored column fields.
///
/// Comparison is per axis and independent; the order of [`FieldAxis::ORDER`]
/// is the order diffs appear in a modified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAxis {
    /// Rendered data type string.
    DataType,
    /// Whether the column accepts NULL.
    Nullability,
    /// Primary-key membership.
    PrimaryKey,
    /// 1-based position within the table.
    OrdinalPosition,
}

impl FieldAxis {
    /// Every axis, in comparison order.
    pub const ORDER: [FieldAxis; 4] = [
        FieldAxis::DataType,
        FieldAxis::Nullability,
        FieldAxis::PrimaryKey,
        FieldAxis::OrdinalPosition,
    ];

    /// Get the axis identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldAxis::DataType => "data_type",
            FieldAxis::Nullability => "nullability",
            FieldAxis::PrimaryKey => "primary_key",
            FieldAxis::OrdinalPosition => "ordinal_position",
        }
    }
}

impl fmt::Display for FieldAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A change to one monitored field of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// The axis that differs.
    pub field: FieldAxis,
    /// Value on the tracked side.
    pub old_value: String,
    /// Value on the source side.
    pub new_value: String,
}

impl FieldDiff {
    /// Create a new field diff.
    pub fn new(field: FieldAxis, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            field,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

/// Side of a comparison an inventory was supplied as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySide {
    /// The live source-of-truth snapshot.
    Source,
    /// The previously recorded snapshot.
    Tracked,
}

impl InventorySide {
    /// Get the side identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            InventorySide::Source => "source",
            InventorySide::Tracked => "tracked",
        }
    }
}

impl fmt::Display for InventorySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified unit of difference between the two inventories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// A table present in the source inventory only.
    TableAdded {
        /// Identity of the table.
        table: TableKey,
        /// Owning consumer of the table, when one is registered.
        consumer: Option<ConsumerId>,
    },
    /// A table present in the tracked inventory only.
    TableDeleted {
        /// Identity of the table.
        table: TableKey,
        /// Owning consumer of the table, when one is registered.
        consumer: Option<ConsumerId>,
    },
    /// A column present in the source inventory only.
    ColumnAdded {
        /// Identity of the column.
        column: ColumnKey,
        /// Owning consumer of the column, when one is registered.
        consumer: Option<ConsumerId>,
    },
    /// A column present in the tracked inventory only.
    ColumnDeleted {
        /// Identity of the column.
        column: ColumnKey,
        /// Owning consumer of the column, when one is registered.
        consumer: Option<ConsumerId>,
    },
    /// A column present on both sides whose monitored fields differ.
    ColumnModified {
        /// Identity of the column.
        column: ColumnKey,
        /// Differing fields, in [`FieldAxis::ORDER`].
        diffs: Vec<FieldDiff>,
        /// Owning consumer of the column, when one is registered.
        consumer: Option<ConsumerId>,
    },
}

impl ChangeRecord {
    /// Create a record for a table present only in the source inventory.
    pub fn table_added(table: TableKey, consumer: Option<ConsumerId>) -> Self {
        ChangeRecord::TableAdded { table, consumer }
    }

    /// Create a record for a table present only in the tracked inventory.
    pub fn table_deleted(table: TableKey, consumer: Option<ConsumerId>) -> Self {
        ChangeRecord::TableDeleted { table, consumer }
    }

    /// Create a record for a column present only in the source inventory.
    pub fn column_added(column: ColumnKey, consumer: Option<ConsumerId>) -> Self {
        ChangeRecord::ColumnAdded { column, consumer }
    }

    /// Create a record for a column present only in the tracked inventory.
    pub fn column_deleted(column: ColumnKey, consumer: Option<ConsumerId>) -> Self {
        ChangeRecord::ColumnDeleted { column, consumer }
    }

    /// Create a record for a column whose monitored fields differ.
    pub fn column_modified(
        column: ColumnKey,
        diffs: Vec<FieldDiff>,
        consumer: Option<ConsumerId>,
    ) -> Self {
        ChangeRecord::ColumnModified {
            column,
            diffs,
            consumer,
        }
    }

    /// The kind of this record.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeRecord::TableAdded { .. } => ChangeKind::TableAdded,
            ChangeRecord::TableDeleted { .. } => ChangeKind::TableDeleted,
            ChangeRecord::ColumnAdded { .. } => ChangeKind::ColumnAdded,
            ChangeRecord::ColumnDeleted { .. } => ChangeKind::ColumnDeleted,
            ChangeRecord::ColumnModified { .. } => ChangeKind::ColumnModified,
        }
    }

    /// The table this record concerns. For column records this is the
    /// column's owning table.
    #[must_use]
    pub fn table_key(&self) -> &TableKey {
        match self {
            ChangeRecord::TableAdded { table, .. } | ChangeRecord::TableDeleted { table, .. } => {
                table
            }
            ChangeRecord::ColumnAdded { column, .. }
            | ChangeRecord::ColumnDeleted { column, .. }
            | ChangeRecord::ColumnModified { column, .. } => column.table_key(),
        }
    }

    /// The column this record concerns, when it is column granular.
    #[must_use]
    pub fn column_key(&self) -> Option<&ColumnKey> {
        match self {
            ChangeRecord::TableAdded { .. } | ChangeRecord::TableDeleted { .. } => None,
            ChangeRecord::ColumnAdded { column, .. }
            | ChangeRecord::ColumnDeleted { column, .. }
            | ChangeRecord::ColumnModified { column, .. } => Some(column),
        }
    }

    /// The field diffs carried by a modified record, empty otherwise.
    #[must_use]
    pub fn diffs(&self) -> &[FieldDiff] {
        match self {
            ChangeRecord::ColumnModified { diffs, .. } => diffs,
            _ => &[],
        }
    }
}

impl ConsumerScoped for ChangeRecord {
    fn consumer(&self) -> Option<&ConsumerId> {
        match self {
            ChangeRecord::TableAdded { consumer, .. }
            | ChangeRecord::TableDeleted { consumer, .. }
            | ChangeRecord::ColumnAdded { consumer, .. }
            | ChangeRecord::ColumnDeleted { consumer, .. }
            | ChangeRecord::ColumnModified { consumer, .. } => consumer.as_ref(),
        }
    }
}
