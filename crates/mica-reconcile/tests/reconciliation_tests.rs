//! End-to-end Reconciliation Tests
//!
//! Exercises the whole pipeline through the public API:
//! - Classifying a realistic drift between two inventories
//! - Report stability across repeated runs
//! - Handing a report to a ticket tracker collaborator
//! - Applying a report through a catalog writer collaborator
//! - The subsumed-column policy switch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mica_connector::async_trait;
use mica_connector::{
    CatalogResult, CatalogWriter, Collaborator, ColumnRecord, Inventory, TableKind, TableRecord,
    TicketDraft, TicketId, TicketSink,
};
use mica_core::{ColumnKey, ConsumerId, TableKey};
use mica_reconcile::{
    ChangeKind, ChangeRecord, ChangeReport, Reconciler, ReconcilerConfig, ReportEmitter,
};

// =============================================================================
// Fixtures
// =============================================================================

fn table_key(schema: &str, table: &str) -> TableKey {
    TableKey::new(schema, table).unwrap()
}

fn column_key(schema: &str, table: &str, column: &str) -> ColumnKey {
    ColumnKey::new(schema, table, column).unwrap()
}

fn table(schema: &str, name: &str) -> TableRecord {
    TableRecord::new(table_key(schema, name), TableKind::BaseTable)
}

fn column(schema: &str, table: &str, name: &str, data_type: &str) -> ColumnRecord {
    ColumnRecord::new(column_key(schema, table, name)).with_data_type(data_type)
}

/// The live catalog after a release: one new table, a widened column, a new
/// audit column, and the legacy export table dropped.
fn source_inventory() -> Inventory {
    Inventory::builder()
        .with_table(table("dbo", "Accounts"))
        .with_column(
            column("dbo", "Accounts", "account_id", "int")
                .with_primary_key(true)
                .with_ordinal_position(1),
        )
        .with_column(
            column("dbo", "Accounts", "balance", "decimal(18,2)")
                .with_nullable(false)
                .with_ordinal_position(2)
                .with_consumer(ConsumerId::new("etl.accounts")),
        )
        .with_column(
            column("dbo", "Accounts", "updated_at", "datetime")
                .with_ordinal_position(3)
                .with_consumer(ConsumerId::new("bi.dashboard")),
        )
        .with_table(table("dbo", "Orders").with_consumer(ConsumerId::new("etl.orders")))
        .with_column(column("dbo", "Orders", "order_id", "int").with_primary_key(true))
        .with_table(table("audit", "Log"))
        .with_column(column("audit", "Log", "entry_id", "bigint"))
        .build()
}

/// What the metadata service still believes the catalog looks like.
fn tracked_inventory() -> Inventory {
    Inventory::builder()
        .with_table(table("dbo", "Accounts"))
        .with_column(
            column("dbo", "Accounts", "account_id", "int")
                .with_primary_key(true)
                .with_ordinal_position(1),
        )
        .with_column(
            column("dbo", "Accounts", "balance", "decimal(10,2)")
                .with_nullable(false)
                .with_ordinal_position(2)
                .with_consumer(ConsumerId::new("etl.accounts")),
        )
        .with_table(table("dbo", "LegacyExports").with_consumer(ConsumerId::new("etl.exports")))
        .with_column(column("dbo", "LegacyExports", "row_id", "int"))
        .with_table(table("audit", "Log"))
        .with_column(column("audit", "Log", "entry_id", "bigint"))
        .build()
}

fn drift_report() -> ChangeReport {
    Reconciler::new()
        .run(&source_inventory(), &tracked_inventory())
        .unwrap()
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_full_pass_classifies_every_kind() {
    let report = drift_report();
    let summary = report.summary();

    assert_eq!(summary.tables_added, 1);
    assert_eq!(summary.tables_deleted, 1);
    assert_eq!(summary.columns_added, 1);
    assert_eq!(summary.columns_deleted, 0);
    assert_eq!(summary.columns_modified, 1);
    assert_eq!(summary.total, 4);

    assert_eq!(
        report.tables_added()[0].table_key(),
        &table_key("dbo", "Orders")
    );
    assert_eq!(
        report.tables_deleted()[0].table_key(),
        &table_key("dbo", "LegacyExports")
    );

    // dbo.Orders' own column is subsumed by the table-level record.
    assert_eq!(
        report.columns_added()[0].column_key(),
        Some(&column_key("dbo", "Accounts", "updated_at"))
    );

    let modified = &report.columns_modified()[0];
    assert_eq!(
        modified.column_key(),
        Some(&column_key("dbo", "Accounts", "balance"))
    );
    assert_eq!(modified.diffs()[0].old_value, "decimal(10,2)");
    assert_eq!(modified.diffs()[0].new_value, "decimal(18,2)");
}

#[test]
fn test_full_pass_aggregates_consumers_once() {
    let report = drift_report();

    let impacted: Vec<&str> = report
        .impacted_consumers()
        .iter()
        .map(ConsumerId::as_str)
        .collect();
    assert_eq!(
        impacted,
        vec!["bi.dashboard", "etl.accounts", "etl.exports", "etl.orders"]
    );
}

#[test]
fn test_untouched_schema_produces_nothing() {
    let inventory = tracked_inventory();
    let report = Reconciler::new().run(&inventory, &inventory).unwrap();

    assert!(!report.has_changes());
    assert!(report.impacted_consumers().is_empty());
}

#[test]
fn test_report_is_stable_between_runs() {
    let first = ReportEmitter::to_value(&drift_report()).unwrap();
    let second = ReportEmitter::to_value(&drift_report()).unwrap();

    // Only the detection timestamp may differ between two passes.
    let strip = |mut value: serde_json::Value| {
        value.as_object_mut().unwrap().remove("detected_at");
        value
    };
    assert_eq!(strip(first), strip(second));
}

#[test]
fn test_subsumed_column_policy_switch() {
    let source = source_inventory();
    let tracked = tracked_inventory();

    let quiet = Reconciler::new().run(&source, &tracked).unwrap();
    let verbose = Reconciler::with_config(ReconcilerConfig {
        include_subsumed_columns: true,
    })
    .run(&source, &tracked)
    .unwrap();

    // The added dbo.Orders column and the deleted LegacyExports column
    // surface only under the verbose policy.
    assert_eq!(quiet.summary().total, 4);
    assert_eq!(verbose.summary().total, 6);
    assert_eq!(verbose.summary().columns_added, 2);
    assert_eq!(verbose.summary().columns_deleted, 1);
}

// =============================================================================
// Ticket tracker collaborator
// =============================================================================

struct RecordingTracker {
    opened: Mutex<Vec<TicketDraft>>,
    updated: Mutex<Vec<(TicketId, TicketDraft)>>,
}

impl RecordingTracker {
    fn new() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Collaborator for RecordingTracker {
    fn display_name(&self) -> &str {
        "recording-tracker"
    }

    async fn test_connection(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[async_trait]
impl TicketSink for RecordingTracker {
    async fn open_ticket(&self, draft: &TicketDraft) -> CatalogResult<TicketId> {
        let mut opened = self.opened.lock().unwrap();
        opened.push(draft.clone());
        Ok(TicketId::new(opened.len() as u64))
    }

    async fn update_ticket(&self, ticket: TicketId, draft: &TicketDraft) -> CatalogResult<()> {
        self.updated.lock().unwrap().push((ticket, draft.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn test_report_flows_into_a_ticket() {
    let tracker = RecordingTracker::new();
    let draft = ReportEmitter::ticket_draft(&drift_report());

    let ticket = tracker.upsert_ticket(None, &draft).await.unwrap();
    assert_eq!(ticket, TicketId::new(1));

    let opened = tracker.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].title, "Schema changes detected (4 total)");
    assert!(opened[0].body.contains("Tables added: 1"));
    assert!(opened[0].body.contains("Columns modified: 1"));
    assert!(opened[0].body.contains("- etl.exports"));
    assert_eq!(opened[0].impacted_consumers.len(), 4);
}

#[tokio::test]
async fn test_known_ticket_is_refreshed_not_reopened() {
    let tracker = RecordingTracker::new();
    let draft = ReportEmitter::ticket_draft(&drift_report());

    let ticket = tracker
        .upsert_ticket(Some(TicketId::new(1077)), &draft)
        .await
        .unwrap();

    assert_eq!(ticket, TicketId::new(1077));
    assert!(tracker.opened.lock().unwrap().is_empty());
    assert_eq!(tracker.updated.lock().unwrap().len(), 1);
}

// =============================================================================
// Catalog writer collaborator
// =============================================================================

#[derive(Default)]
struct CountingWriter {
    tables_created: AtomicUsize,
    tables_deleted: AtomicUsize,
    columns_created: AtomicUsize,
    columns_updated: AtomicUsize,
    columns_deleted: AtomicUsize,
}

#[async_trait]
impl Collaborator for CountingWriter {
    fn display_name(&self) -> &str {
        "counting-writer"
    }

    async fn test_connection(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CatalogWriter for CountingWriter {
    async fn create_table(&self, _record: &TableRecord) -> CatalogResult<()> {
        self.tables_created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_table(&self, _key: &TableKey) -> CatalogResult<()> {
        self.tables_deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_column(&self, _record: &ColumnRecord) -> CatalogResult<()> {
        self.columns_created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_column(&self, _record: &ColumnRecord) -> CatalogResult<()> {
        self.columns_updated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_column(&self, _key: &ColumnKey) -> CatalogResult<()> {
        self.columns_deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Push every record of a report into a tracked catalog, sourcing payloads
/// from the inventory that still holds them.
async fn apply_report(
    writer: &impl CatalogWriter,
    source: &Inventory,
    report: &ChangeReport,
) -> CatalogResult<()> {
    for record in report.records() {
        match record {
            ChangeRecord::TableAdded { table, .. } => {
                if let Some(payload) = source.table(table) {
                    writer.create_table(payload).await?;
                }
            }
            ChangeRecord::TableDeleted { table, .. } => {
                writer.delete_table(table).await?;
            }
            ChangeRecord::ColumnAdded { column, .. } => {
                if let Some(payload) = source.column(column) {
                    writer.create_column(payload).await?;
                }
            }
            ChangeRecord::ColumnDeleted { column, .. } => {
                writer.delete_column(column).await?;
            }
            ChangeRecord::ColumnModified { column, .. } => {
                if let Some(payload) = source.column(column) {
                    writer.update_column(payload).await?;
                }
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_report_drives_catalog_writes() {
    let source = source_inventory();
    let report = drift_report();
    let writer = CountingWriter::default();

    apply_report(&writer, &source, &report).await.unwrap();

    assert_eq!(writer.tables_created.load(Ordering::SeqCst), 1);
    assert_eq!(writer.tables_deleted.load(Ordering::SeqCst), 1);
    assert_eq!(writer.columns_created.load(Ordering::SeqCst), 1);
    assert_eq!(writer.columns_updated.load(Ordering::SeqCst), 1);
    assert_eq!(writer.columns_deleted.load(Ordering::SeqCst), 0);

    let summary = report.summary();
    assert_eq!(
        summary.count_for(ChangeKind::TableAdded),
        writer.tables_created.load(Ordering::SeqCst) as u32
    );
}
