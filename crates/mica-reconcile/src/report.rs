//! Change report
//!
//! The aggregate output of one reconciliation pass: per-kind record
//! sequences, summary counters, and the impacted-consumer set, plus the
//! emitter that renders it for downstream consumption.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use mica_connector::TicketDraft;
use mica_core::ConsumerId;

use crate::error::ReconcileResult;
use crate::types::{ChangeKind, ChangeRecord};

/// Per-kind counters for one report.
///
/// `total` always equals the sum of the five kind counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Number of tables added.
    pub tables_added: u32,
    /// Number of tables deleted.
    pub tables_deleted: u32,
    /// Number of columns added (outside subsumed tables).
    pub columns_added: u32,
    /// Number of columns deleted (outside subsumed tables).
    pub columns_deleted: u32,
    /// Number of columns modified.
    pub columns_modified: u32,
    /// Total records across all kinds.
    pub total: u32,
}

impl ChangeSummary {
    /// The counter for one kind.
    #[must_use]
    pub fn count_for(&self, kind: ChangeKind) -> u32 {
        match kind {
            ChangeKind::TableAdded => self.tables_added,
            ChangeKind::TableDeleted => self.tables_deleted,
            ChangeKind::ColumnAdded => self.columns_added,
            ChangeKind::ColumnDeleted => self.columns_deleted,
            ChangeKind::ColumnModified => self.columns_modified,
        }
    }
}

/// The full, immutable output of one reconciliation pass.
///
/// Fully determined by the two input inventories; the detection timestamp
/// is informational metadata and takes no part in any comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    detected_at: DateTime<Utc>,
    summary: ChangeSummary,
    tables_added: Vec<ChangeRecord>,
    tables_deleted: Vec<ChangeRecord>,
    columns_added: Vec<ChangeRecord>,
    columns_deleted: Vec<ChangeRecord>,
    columns_modified: Vec<ChangeRecord>,
    impacted_consumers: BTreeSet<ConsumerId>,
}

impl ChangeReport {
    /// Create an empty report carrying the given detection timestamp.
    #[must_use]
    pub fn new(detected_at: DateTime<Utc>) -> Self {
        Self {
            detected_at,
            summary: ChangeSummary::default(),
            tables_added: Vec::new(),
            tables_deleted: Vec::new(),
            columns_added: Vec::new(),
            columns_deleted: Vec::new(),
            columns_modified: Vec::new(),
            impacted_consumers: BTreeSet::new(),
        }
    }

    /// Append a record to its kind's sequence and bump the counters.
    pub(crate) fn push(&mut self, record: ChangeRecord) {
        match record.kind() {
            ChangeKind::TableAdded => {
                self.summary.tables_added += 1;
                self.tables_added.push(record);
            }
            ChangeKind::TableDeleted => {
                self.summary.tables_deleted += 1;
                self.tables_deleted.push(record);
            }
            ChangeKind::ColumnAdded => {
                self.summary.columns_added += 1;
                self.columns_added.push(record);
            }
            ChangeKind::ColumnDeleted => {
                self.summary.columns_deleted += 1;
                self.columns_deleted.push(record);
            }
            ChangeKind::ColumnModified => {
                self.summary.columns_modified += 1;
                self.columns_modified.push(record);
            }
        }
        self.summary.total += 1;
    }

    /// Replace the impacted-consumer set.
    pub(crate) fn set_impacted_consumers(&mut self, consumers: BTreeSet<ConsumerId>) {
        self.impacted_consumers = consumers;
    }

    /// When the pass ran.
    #[must_use]
    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// The per-kind counters.
    #[must_use]
    pub fn summary(&self) -> &ChangeSummary {
        &self.summary
    }

    /// Tables present in the source inventory only.
    #[must_use]
    pub fn tables_added(&self) -> &[ChangeRecord] {
        &self.tables_added
    }

    /// Tables present in the tracked inventory only.
    #[must_use]
    pub fn tables_deleted(&self) -> &[ChangeRecord] {
        &self.tables_deleted
    }

    /// Columns present in the source inventory only.
    #[must_use]
    pub fn columns_added(&self) -> &[ChangeRecord] {
        &self.columns_added
    }

    /// Columns present in the tracked inventory only.
    #[must_use]
    pub fn columns_deleted(&self) -> &[ChangeRecord] {
        &self.columns_deleted
    }

    /// Columns whose monitored fields differ between the sides.
    #[must_use]
    pub fn columns_modified(&self) -> &[ChangeRecord] {
        &self.columns_modified
    }

    /// The record sequence for one kind.
    #[must_use]
    pub fn records_of_kind(&self, kind: ChangeKind) -> &[ChangeRecord] {
        match kind {
            ChangeKind::TableAdded => &self.tables_added,
            ChangeKind::TableDeleted => &self.tables_deleted,
            ChangeKind::ColumnAdded => &self.columns_added,
            ChangeKind::ColumnDeleted => &self.columns_deleted,
            ChangeKind::ColumnModified => &self.columns_modified,
        }
    }

    /// All records, in kind category order.
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.tables_added
            .iter()
            .chain(&self.tables_deleted)
            .chain(&self.columns_added)
            .chain(&self.columns_deleted)
            .chain(&self.columns_modified)
    }

    /// The consumers impacted by any record, in sorted order.
    #[must_use]
    pub fn impacted_consumers(&self) -> &BTreeSet<ConsumerId> {
        &self.impacted_consumers
    }

    /// Whether the pass detected anything at all.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.total > 0
    }
}

/// Renders a [`ChangeReport`] for downstream consumption.
///
/// Pure and side-effect free; handing the rendering to a tracker or catalog
/// is an actuation collaborator's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEmitter;

impl ReportEmitter {
    /// Render the report as pretty-printed JSON.
    ///
    /// Field order follows the report's declaration order and absent
    /// optional values appear as explicit nulls.
    pub fn to_json(report: &ChangeReport) -> ReconcileResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Render the report as a JSON value tree.
    ///
    /// Object keys in the resulting value iterate in sorted order; use
    /// [`to_json`](Self::to_json) when the declared field order matters.
    pub fn to_value(report: &ChangeReport) -> ReconcileResult<serde_json::Value> {
        Ok(serde_json::to_value(report)?)
    }

    /// Render the report as a ticket draft for an external tracker.
    #[must_use]
    pub fn ticket_draft(report: &ChangeReport) -> TicketDraft {
        let summary = report.summary();
        let title = format!("Schema changes detected ({} total)", summary.total);

        let mut lines = vec![
            format!(
                "Detected at: {}",
                report
                    .detected_at()
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            format!("Tables added: {}", summary.tables_added),
            format!("Tables deleted: {}", summary.tables_deleted),
            format!("Columns added: {}", summary.columns_added),
            format!("Columns deleted: {}", summary.columns_deleted),
            format!("Columns modified: {}", summary.columns_modified),
            format!("Total changes: {}", summary.total),
        ];

        if !report.impacted_consumers().is_empty() {
            lines.push(String::new());
            lines.push("Impacted consumers:".to_string());
            for consumer in report.impacted_consumers() {
                lines.push(format!("- {consumer}"));
            }
        }

        TicketDraft::new(title, lines.join("\n"))
            .with_impacted_consumers(report.impacted_consumers().iter().cloned().collect())
    }
}
