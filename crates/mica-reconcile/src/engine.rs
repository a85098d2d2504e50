//! Reconciler
//!
//! Drives one reconciliation pass over a source and a tracked inventory in
//! four ordered phases:
//!
//! 1. Table diff: added and deleted tables become records.
//! 2. Exclusion seeding: consumers named by phase 1 records are marked
//!    handled and the added/deleted tables marked subsumed, so their column
//!    detail is not double-reported.
//! 3. Column diff: added and deleted columns become records; columns present
//!    on both sides go through the field comparator. Columns covered by
//!    phase 2 are skipped.
//! 4. Impact aggregation: consumers named by phase 3 records join the
//!    impacted set.
//!
//! The pass is synchronous and performs no I/O; each run owns its report and
//! tracker, so independent runs may execute in parallel.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use mica_connector::{ColumnRecord, Inventory};
use mica_core::{ConsumerScoped, RunId};

use crate::comparator::compare_columns;
use crate::differ::partition_keys;
use crate::error::{ReconcileError, ReconcileResult};
use crate::impact::ImpactTracker;
use crate::report::ChangeReport;
use crate::types::{ChangeRecord, InventorySide};

/// Policy knobs for one reconciler instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Keep per-column records for tables that are themselves added or
    /// deleted, instead of letting the table-level record subsume them.
    /// Off by default, matching the no-double-reporting contract.
    #[serde(default)]
    pub include_subsumed_columns: bool,
}

/// The reconciliation engine.
///
/// Stateless between runs; `run` may be called any number of times and
/// concurrently from multiple threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler with an explicit configuration.
    #[must_use]
    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Run one reconciliation pass.
    ///
    /// Verifies both inventories before emitting anything: a column whose
    /// owning table is missing from the same inventory fails the whole pass
    /// with [`ReconcileError::MalformedInventory`] and no records.
    pub fn run(&self, source: &Inventory, tracked: &Inventory) -> ReconcileResult<ChangeReport> {
        verify_inventory(source, InventorySide::Source)?;
        verify_inventory(tracked, InventorySide::Tracked)?;

        let run_id = RunId::new();
        tracing::info!(
            run_id = %run_id,
            source_tables = source.table_count(),
            source_columns = source.column_count(),
            tracked_tables = tracked.table_count(),
            tracked_columns = tracked.column_count(),
            "Starting reconciliation pass"
        );

        let mut report = ChangeReport::new(Utc::now());
        let mut tracker = ImpactTracker::new();

        // Phase 1: table diff
        let table_sets = partition_keys(source.tables(), tracked.tables());
        for &key in &table_sets.added {
            if let Some(record) = source.table(key) {
                report.push(ChangeRecord::table_added(key.clone(), record.consumer.clone()));
            }
        }
        for &key in &table_sets.removed {
            if let Some(record) = tracked.table(key) {
                report.push(ChangeRecord::table_deleted(
                    key.clone(),
                    record.consumer.clone(),
                ));
            }
        }
        tracing::debug!(
            run_id = %run_id,
            added = table_sets.added.len(),
            deleted = table_sets.removed.len(),
            common = table_sets.common.len(),
            "Table diff complete"
        );

        // Phase 2: exclusion seeding
        for record in report.tables_added().iter().chain(report.tables_deleted()) {
            if self.config.include_subsumed_columns {
                tracker.record_from(record);
            } else {
                tracker.mark_table_subsumed(record.table_key());
                if let Some(consumer) = record.consumer() {
                    tracker.mark_handled(consumer);
                }
            }
        }

        // Phase 3: column diff
        let column_sets = partition_keys(source.columns(), tracked.columns());
        for &key in &column_sets.added {
            if let Some(record) = source.column(key) {
                if is_excluded(&tracker, record) {
                    continue;
                }
                report.push(ChangeRecord::column_added(
                    key.clone(),
                    record.consumer.clone(),
                ));
            }
        }
        for &key in &column_sets.removed {
            if let Some(record) = tracked.column(key) {
                if is_excluded(&tracker, record) {
                    continue;
                }
                report.push(ChangeRecord::column_deleted(
                    key.clone(),
                    record.consumer.clone(),
                ));
            }
        }
        for &key in &column_sets.common {
            if let (Some(source_record), Some(tracked_record)) =
                (source.column(key), tracked.column(key))
            {
                if is_excluded(&tracker, source_record) || is_excluded(&tracker, tracked_record) {
                    continue;
                }
                let diffs = compare_columns(source_record, tracked_record);
                if !diffs.is_empty() {
                    let consumer = source_record
                        .consumer
                        .clone()
                        .or_else(|| tracked_record.consumer.clone());
                    report.push(ChangeRecord::column_modified(key.clone(), diffs, consumer));
                }
            }
        }
        tracing::debug!(
            run_id = %run_id,
            added = report.columns_added().len(),
            deleted = report.columns_deleted().len(),
            modified = report.columns_modified().len(),
            "Column diff complete"
        );

        // Phase 4: impact aggregation
        for record in report
            .columns_added()
            .iter()
            .chain(report.columns_deleted())
            .chain(report.columns_modified())
        {
            tracker.record_from(record);
        }
        report.set_impacted_consumers(tracker.into_impacted());

        tracing::info!(
            run_id = %run_id,
            total = report.summary().total,
            impacted = report.impacted_consumers().len(),
            "Reconciliation pass complete"
        );
        Ok(report)
    }
}

/// Whether a column's detail is already covered by a phase 2 exclusion.
fn is_excluded(tracker: &ImpactTracker, record: &ColumnRecord) -> bool {
    if tracker.is_table_subsumed(record.key.table_key()) {
        return true;
    }
    record
        .consumer
        .as_ref()
        .is_some_and(|consumer| tracker.is_handled(consumer))
}

/// Reject an inventory whose columns reference tables it does not hold.
fn verify_inventory(inventory: &Inventory, side: InventorySide) -> ReconcileResult<()> {
    if let Some(column) = inventory.orphaned_columns().next() {
        return Err(ReconcileError::MalformedInventory {
            side,
            column: column.clone(),
        });
    }
    Ok(())
}
