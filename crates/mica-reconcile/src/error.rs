//! Reconciliation error types

use thiserror::Error;

use mica_core::ColumnKey;

use crate::types::InventorySide;

/// Errors a reconciliation pass can produce.
///
/// The engine performs no I/O; the only failure on the comparison path is a
/// precondition violation by the collaborator that built an inventory.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// An inventory contains a column whose owning table is missing from
    /// the same inventory's table mapping.
    #[error("malformed {side} inventory: column {column} references a table missing from the same inventory")]
    MalformedInventory {
        /// Which side of the comparison the inventory was supplied as.
        side: InventorySide,
        /// The first offending column, in key order.
        column: ColumnKey,
    },

    /// The change report could not be serialized.
    #[error("failed to serialize change report: {source}")]
    ReportSerialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
