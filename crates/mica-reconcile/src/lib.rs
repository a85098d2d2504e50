//! # Reconciliation Engine
//!
//! Compares two schema inventories and produces a deterministic change
//! report.
//!
//! This crate provides:
//! - Three-way key partitioning over tables and columns
//! - Per-axis field comparison for matched column pairs
//! - Impacted-consumer aggregation with no-double-reporting exclusions
//! - A stable report rendering for catalogs and ticket trackers
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐      ┌────────────┐
//! │   Source   │      │  Tracked   │
//! │  Inventory │      │  Inventory │
//! └─────┬──────┘      └──────┬─────┘
//!       └─────────┬──────────┘
//!                 ▼
//!          ┌─────────────┐
//!          │ Table Diff  │ (1)
//!          └──────┬──────┘
//!                 ▼
//!          ┌─────────────┐
//!          │  Exclusion  │ (2)
//!          │   Seeding   │
//!          └──────┬──────┘
//!                 ▼
//!          ┌─────────────┐      ┌────────────┐
//!          │ Column Diff │─────►│   Field    │ (3)
//!          └──────┬──────┘      │ Comparator │
//!                 ▼             └────────────┘
//!          ┌─────────────┐
//!          │   Impact    │ (4)
//!          │ Aggregation │
//!          └──────┬──────┘
//!                 ▼
//!          ┌─────────────┐
//!          │ChangeReport │
//!          └─────────────┘
//! ```
//!
//! ## Features
//!
//! - **Deterministic output**: Same inventories in, same report out
//! - **No double reporting**: Added/deleted tables subsume their column detail
//! - **Idempotent impact set**: A consumer is named once however often it is hit
//! - **Value-threaded state**: Each run owns its report; runs parallelize freely
//!
//! ## Example
//!
//! ```
//! use mica_connector::{ColumnRecord, Inventory, TableKind, TableRecord};
//! use mica_core::{ColumnKey, TableKey};
//! use mica_reconcile::{ChangeKind, Reconciler, ReportEmitter};
//!
//! let source = Inventory::builder()
//!     .with_table(TableRecord::new(
//!         TableKey::new("dbo", "Accounts")?,
//!         TableKind::BaseTable,
//!     ))
//!     .with_column(
//!         ColumnRecord::new(ColumnKey::new("dbo", "Accounts", "id")?).with_data_type("int"),
//!     )
//!     .build();
//! let tracked = Inventory::builder().build();
//!
//! let report = Reconciler::new().run(&source, &tracked)?;
//! assert_eq!(report.summary().total, 1);
//! assert_eq!(report.records_of_kind(ChangeKind::TableAdded).len(), 1);
//!
//! let json = ReportEmitter::to_json(&report)?;
//! assert!(json.contains("table_added"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod comparator;
pub mod differ;
pub mod engine;
pub mod error;
pub mod impact;
pub mod report;
pub mod types;

// Change vocabulary
pub use types::{ChangeKind, ChangeRecord, FieldAxis, FieldDiff, InventorySide};

// Error handling
pub use error::{ReconcileError, ReconcileResult};

// Set partitioning
pub use differ::{partition_keys, KeySets};

// Field comparison
pub use comparator::compare_columns;

// Impact tracking
pub use impact::ImpactTracker;

// Orchestration
pub use engine::{Reconciler, ReconcilerConfig};

// Reporting
pub use report::{ChangeReport, ChangeSummary, ReportEmitter};
