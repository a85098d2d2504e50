//! Collaborator traits
//!
//! Capability-based trait definitions for the systems the reconciliation
//! engine works with: catalogs that produce inventories, catalogs that
//! accept entity writes, and ticket trackers that receive change reports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use mica_core::{ColumnKey, ConsumerId, TableKey};

use crate::error::CatalogResult;
use crate::inventory::{ColumnRecord, Inventory, TableRecord};

/// Base trait for all collaborators.
///
/// Provides the common surface every collaborator must implement regardless
/// of its specific capabilities.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Get the display name for this collaborator instance.
    fn display_name(&self) -> &str;

    /// Test the connection to the target system.
    ///
    /// Returns `Ok(())` if the connection is successful, or an error
    /// describing what went wrong.
    async fn test_connection(&self) -> CatalogResult<()>;

    /// Check if the collaborator is currently healthy.
    ///
    /// This is a lightweight check, different from `test_connection`
    /// which may perform a more thorough validation.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Capability for producing inventory snapshots.
///
/// Collaborators implementing this trait can translate a catalog they have
/// access to (a live database's metadata views, a metadata service's entity
/// records) into the normalized [`Inventory`] shape the engine compares.
#[async_trait]
pub trait InventorySource: Collaborator {
    /// Fetch one point-in-time inventory.
    ///
    /// # Arguments
    /// * `schemas` - Schema names to restrict the snapshot to. An empty
    ///   slice means every schema visible to the collaborator.
    async fn fetch_inventory(&self, schemas: &[String]) -> CatalogResult<Inventory>;

    /// Fetch the inventory of a single schema.
    ///
    /// This is a convenience method over [`fetch_inventory`](Self::fetch_inventory).
    async fn fetch_schema(&self, schema: &str) -> CatalogResult<Inventory> {
        self.fetch_inventory(&[schema.to_string()]).await
    }
}

/// Capability for writing entities into a tracked catalog.
///
/// Implementations address entities by the qualified-name scheme of their
/// endpoint; callers pass records and keys only.
#[async_trait]
pub trait CatalogWriter: Collaborator {
    /// Create a table entity.
    async fn create_table(&self, record: &TableRecord) -> CatalogResult<()>;

    /// Delete a table entity.
    async fn delete_table(&self, key: &TableKey) -> CatalogResult<()>;

    /// Create a column entity.
    async fn create_column(&self, record: &ColumnRecord) -> CatalogResult<()>;

    /// Update a column entity in place.
    async fn update_column(&self, record: &ColumnRecord) -> CatalogResult<()>;

    /// Delete a column entity.
    async fn delete_column(&self, key: &ColumnKey) -> CatalogResult<()>;
}

/// Identifier of a ticket in an external tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Create a ticket id from its raw value.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TicketId> for u64 {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

/// Content of a ticket to open or refresh in an external tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    /// Ticket title.
    pub title: String,
    /// Ticket body text.
    pub body: String,
    /// Consumers the underlying changes impact.
    #[serde(default)]
    pub impacted_consumers: Vec<ConsumerId>,
}

impl TicketDraft {
    /// Create a new draft with no impacted consumers.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            impacted_consumers: Vec::new(),
        }
    }

    /// Set the impacted consumers.
    #[must_use]
    pub fn with_impacted_consumers(mut self, consumers: Vec<ConsumerId>) -> Self {
        self.impacted_consumers = consumers;
        self
    }
}

/// Capability for recording change reports in an external ticket tracker.
#[async_trait]
pub trait TicketSink: Collaborator {
    /// Open a new ticket.
    ///
    /// # Returns
    /// The identifier of the created ticket.
    async fn open_ticket(&self, draft: &TicketDraft) -> CatalogResult<TicketId>;

    /// Replace the content of an existing ticket.
    async fn update_ticket(&self, ticket: TicketId, draft: &TicketDraft) -> CatalogResult<()>;

    /// Open a ticket, or refresh one that is already tracking these changes.
    ///
    /// This is a convenience method that dispatches on whether an existing
    /// ticket id is known.
    async fn upsert_ticket(
        &self,
        existing: Option<TicketId>,
        draft: &TicketDraft,
    ) -> CatalogResult<TicketId> {
        match existing {
            Some(ticket) => {
                self.update_ticket(ticket, draft).await?;
                Ok(ticket)
            }
            None => self.open_ticket(draft).await,
        }
    }
}

/// Marker trait for collaborators that support full actuation.
pub trait FullActuation: CatalogWriter + TicketSink {}

// Blanket implementation for any collaborator that implements both halves
impl<T> FullActuation for T where T: CatalogWriter + TicketSink {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::inventory::TableKind;

    // Mock inventory source for testing
    struct MockSource {
        name: String,
        healthy: Arc<AtomicBool>,
    }

    impl MockSource {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                healthy: Arc::new(AtomicBool::new(true)),
            }
        }
    }

    #[async_trait]
    impl Collaborator for MockSource {
        fn display_name(&self) -> &str {
            &self.name
        }

        async fn test_connection(&self) -> CatalogResult<()> {
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(crate::error::CatalogError::connection_failed("not healthy"))
            }
        }

        fn is_healthy(&self) -> bool {
            self.healthy.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InventorySource for MockSource {
        async fn fetch_inventory(&self, schemas: &[String]) -> CatalogResult<Inventory> {
            let all = [
                TableRecord::new(
                    TableKey::new("dbo", "Accounts").unwrap(),
                    TableKind::BaseTable,
                ),
                TableRecord::new(
                    TableKey::new("audit", "Log").unwrap(),
                    TableKind::BaseTable,
                ),
            ];

            let mut builder = Inventory::builder();
            for record in all {
                if schemas.is_empty() || schemas.iter().any(|s| s == record.key.schema()) {
                    builder = builder.with_table(record);
                }
            }
            Ok(builder.build())
        }
    }

    // Mock ticket sink that hands out sequential ids
    struct MockTicketSink {
        next_id: AtomicU64,
        updates: AtomicU64,
    }

    impl MockTicketSink {
        fn new() -> Self {
            Self {
                next_id: AtomicU64::new(1),
                updates: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl Collaborator for MockTicketSink {
        fn display_name(&self) -> &str {
            "mock-tracker"
        }

        async fn test_connection(&self) -> CatalogResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl TicketSink for MockTicketSink {
        async fn open_ticket(&self, _draft: &TicketDraft) -> CatalogResult<TicketId> {
            Ok(TicketId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
        }

        async fn update_ticket(
            &self,
            _ticket: TicketId,
            _draft: &TicketDraft,
        ) -> CatalogResult<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_source() {
        let source = MockSource::new("test");
        assert_eq!(source.display_name(), "test");
        assert!(source.is_healthy());
        assert!(source.test_connection().await.is_ok());

        let inventory = source.fetch_inventory(&[]).await.unwrap();
        assert_eq!(inventory.table_count(), 2);
    }

    #[tokio::test]
    async fn test_unhealthy_source() {
        let source = MockSource::new("test");
        source.healthy.store(false, Ordering::SeqCst);
        assert!(!source.is_healthy());
        assert!(source.test_connection().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_restricted_to_schemas() {
        let source = MockSource::new("test");
        let inventory = source.fetch_schema("audit").await.unwrap();

        assert_eq!(inventory.table_count(), 1);
        assert!(inventory
            .table(&TableKey::new("audit", "Log").unwrap())
            .is_some());
    }

    #[tokio::test]
    async fn test_upsert_ticket_opens_when_unknown() {
        let sink = MockTicketSink::new();
        let draft = TicketDraft::new("schema drift", "details");

        let ticket = sink.upsert_ticket(None, &draft).await.unwrap();
        assert_eq!(ticket, TicketId::new(1));
        assert_eq!(sink.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upsert_ticket_updates_when_known() {
        let sink = MockTicketSink::new();
        let draft = TicketDraft::new("schema drift", "details");

        let ticket = sink
            .upsert_ticket(Some(TicketId::new(42)), &draft)
            .await
            .unwrap();
        assert_eq!(ticket, TicketId::new(42));
        assert_eq!(sink.updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ticket_id_display_and_serde() {
        let id = TicketId::new(1077);
        assert_eq!(id.to_string(), "1077");
        assert_eq!(u64::from(id), 1077);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1077");
        let parsed: TicketId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_ticket_draft_builder() {
        let draft = TicketDraft::new("title", "body").with_impacted_consumers(vec![
            ConsumerId::new("etl.accounts"),
            ConsumerId::new("bi.dashboard"),
        ]);

        assert_eq!(draft.impacted_consumers.len(), 2);
    }
}
