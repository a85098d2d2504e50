//! Consumer-Scoped Records
//!
//! This module provides the trait for records that may carry an owning
//! downstream consumer.
//!
//! # Example
//!
//! ```
//! use mica_core::{ConsumerId, ConsumerScoped};
//!
//! struct PipelineBinding {
//!     name: String,
//!     consumer: Option<ConsumerId>,
//! }
//!
//! impl ConsumerScoped for PipelineBinding {
//!     fn consumer(&self) -> Option<&ConsumerId> {
//!         self.consumer.as_ref()
//!     }
//! }
//!
//! // Generic function that works with any consumer-scoped record
//! fn is_owned<T: ConsumerScoped>(record: &T) -> bool {
//!     record.consumer().is_some()
//! }
//!
//! let binding = PipelineBinding {
//!     name: "orders".to_string(),
//!     consumer: Some(ConsumerId::new("etl.orders")),
//! };
//!
//! assert!(is_owned(&binding));
//! ```

use crate::ids::ConsumerId;

/// Trait for records that may carry an owning downstream consumer.
///
/// Table and column records attach an optional consumer identifier so that
/// impact aggregation can treat both uniformly, without caring which kind of
/// schema object changed.
///
/// # Object Safety
///
/// This trait is object-safe, meaning it can be used with trait objects:
/// `Box<dyn ConsumerScoped>` or `&dyn ConsumerScoped`.
pub trait ConsumerScoped {
    /// Returns the owning consumer identifier, when one is attached.
    ///
    /// Records without a consumer (for example, objects no pipeline reads
    /// yet) return `None` and are skipped by impact aggregation.
    fn consumer(&self) -> Option<&ConsumerId>;
}
