//! # Catalog Collaborators
//!
//! Abstractions for the systems schema reconciliation talks to.
//!
//! This crate provides the normalized inventory model the engine compares,
//! plus capability traits for the collaborators around it: live catalogs
//! that produce inventories, tracked catalogs that accept entity writes,
//! and ticket trackers that receive change reports.
//!
//! ## Architecture
//!
//! The crate uses a capability-based trait system:
//!
//! - [`Collaborator`] - Base trait all collaborators implement
//! - [`InventorySource`] - Produce point-in-time inventory snapshots
//! - [`CatalogWriter`] - Create/update/delete tracked catalog entities
//! - [`TicketSink`] - Open and refresh tracking tickets
//!
//! ## Example
//!
//! ```ignore
//! use mica_connector::prelude::*;
//!
//! // Describe where the live catalog lives
//! let endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01", "finance");
//! endpoint.validate()?;
//!
//! // Fetch both sides of a comparison
//! let source = live_catalog.fetch_inventory(&[]).await?;
//! let tracked = metadata_service.fetch_inventory(&[]).await?;
//!
//! // Hand the report to a tracker
//! let ticket = tracker.upsert_ticket(known_ticket, &draft).await?;
//! ```
//!
//! ## Features
//!
//! - **Capability-based traits**: Collaborators only implement what they support
//! - **Normalized inventories**: One shape regardless of where a snapshot came from
//! - **Transient/permanent errors**: Callers can tell retryable failures apart
//! - **Feed deduplication**: Collapse re-emitted feed rows to the newest revision
//!
//! ## Crate Organization
//!
//! - [`inventory`] - Inventory model (`TableRecord`, `ColumnRecord`, builder)
//! - [`endpoint`] - Source endpoint configuration and qualified names
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - Collaborator capability traits
//! - [`dedup`] - Latest-wins feed deduplication

pub mod dedup;
pub mod endpoint;
pub mod error;
pub mod inventory;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use mica_connector::prelude::*;
/// ```
pub mod prelude {
    // Inventory model
    pub use crate::inventory::{
        render_data_type, ColumnRecord, Inventory, InventoryBuilder, TableKind, TableRecord,
    };

    // Endpoint configuration
    pub use crate::endpoint::{Endpoint, SourceDriver};

    // Error handling
    pub use crate::error::{CatalogError, CatalogResult};

    // Traits
    pub use crate::traits::{
        CatalogWriter, Collaborator, FullActuation, InventorySource, TicketDraft, TicketId,
        TicketSink,
    };

    // Deduplication
    pub use crate::dedup::latest_by_key;
}

pub use crate::endpoint::{Endpoint, SourceDriver};
pub use crate::error::{CatalogError, CatalogResult};
pub use crate::inventory::{
    render_data_type, ColumnRecord, Inventory, InventoryBuilder, TableKind, TableRecord,
};
pub use crate::traits::{
    CatalogWriter, Collaborator, FullActuation, InventorySource, TicketDraft, TicketId, TicketSink,
};

// Re-export async_trait for collaborator implementors
pub use async_trait::async_trait;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        // Verify all prelude types are accessible
        let _endpoint = Endpoint::new(SourceDriver::SqlServer, "sql01", "finance");
        let _kind = TableKind::BaseTable;
        let _inventory = Inventory::builder().build();
        let _ticket = TicketId::new(1);
        let _draft = TicketDraft::new("title", "body");
        let _rendered = render_data_type("varchar", Some(50), None, None);
    }
}
