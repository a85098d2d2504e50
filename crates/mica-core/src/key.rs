//! Identity keys for schema objects
//!
//! Keys are opaque exact-match strings: no case folding, no trimming. The
//! source system's collation decides what counts as the same name, so two
//! keys are the same object iff their parts are byte-identical.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error produced when building an identity key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A key part (schema, table, or column name) was empty.
    #[error("invalid identifier: {part} name is empty")]
    InvalidIdentifier { part: &'static str },
}

/// Result type for key construction.
pub type KeyResult<T> = Result<T, KeyError>;

/// Identity of a table: the ordered pair (schema name, table name).
///
/// Ordering is lexicographic over (schema, table), which gives ordered
/// inventory maps a stable, deterministic iteration order.
///
/// # Example
///
/// ```
/// use mica_core::TableKey;
///
/// let key = TableKey::new("dbo", "Accounts")?;
/// assert_eq!(key.schema(), "dbo");
/// assert_eq!(key.table(), "Accounts");
/// assert_eq!(key.to_string(), "dbo.Accounts");
/// # Ok::<(), mica_core::KeyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableKey {
    schema: String,
    table: String,
}

impl TableKey {
    /// Build a table key from raw name strings.
    ///
    /// Fails with [`KeyError::InvalidIdentifier`] if either name is empty.
    /// The strings are preserved exactly as supplied.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> KeyResult<Self> {
        let schema = schema.into();
        let table = table.into();
        if schema.is_empty() {
            return Err(KeyError::InvalidIdentifier { part: "schema" });
        }
        if table.is_empty() {
            return Err(KeyError::InvalidIdentifier { part: "table" });
        }
        Ok(Self { schema, table })
    }

    /// Schema name exactly as supplied.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Table name exactly as supplied.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Identity of a column: its owning [`TableKey`] plus the column name.
///
/// Ordering is lexicographic over (table key, column), so the columns of one
/// table sort together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    #[serde(flatten)]
    table: TableKey,
    column: String,
}

impl ColumnKey {
    /// Build a column key from raw name strings.
    ///
    /// Fails with [`KeyError::InvalidIdentifier`] if any part is empty.
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> KeyResult<Self> {
        Self::for_table(TableKey::new(schema, table)?, column)
    }

    /// Build a column key under an existing table key.
    pub fn for_table(table: TableKey, column: impl Into<String>) -> KeyResult<Self> {
        let column = column.into();
        if column.is_empty() {
            return Err(KeyError::InvalidIdentifier { part: "column" });
        }
        Ok(Self { table, column })
    }

    /// The owning table's key.
    #[must_use]
    pub fn table_key(&self) -> &TableKey {
        &self.table
    }

    /// Schema name exactly as supplied.
    #[must_use]
    pub fn schema(&self) -> &str {
        self.table.schema()
    }

    /// Table name exactly as supplied.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.table()
    }

    /// Column name exactly as supplied.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}
