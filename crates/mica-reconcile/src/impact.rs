//! Impact tracker
//!
//! Accumulates which downstream consumers a reconciliation pass touches and
//! which of them are already fully covered by a table-level record. One
//! tracker instance belongs to exactly one pass; runs never share one.

use std::collections::BTreeSet;

use mica_core::{ConsumerId, ConsumerScoped, TableKey};

/// Running impact state of one reconciliation pass.
///
/// Insertion is idempotent: recording the same consumer any number of times
/// leaves one entry. Consumers marked handled count as impacted too, since a
/// table-level record already named them.
#[derive(Debug, Clone, Default)]
pub struct ImpactTracker {
    impacted: BTreeSet<ConsumerId>,
    handled: BTreeSet<ConsumerId>,
    subsumed_tables: BTreeSet<TableKey>,
}

impl ImpactTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an impacted consumer.
    ///
    /// Returns `true` if the consumer was not impacted before.
    pub fn record(&mut self, consumer: &ConsumerId) -> bool {
        self.impacted.insert(consumer.clone())
    }

    /// Record the consumer of a scoped record, when it has one.
    ///
    /// Returns `true` if a consumer was present and newly recorded.
    pub fn record_from(&mut self, scoped: &impl ConsumerScoped) -> bool {
        match scoped.consumer() {
            Some(consumer) => self.record(consumer),
            None => false,
        }
    }

    /// Mark a consumer as fully covered by a table-level record.
    ///
    /// A handled consumer is impacted as well.
    pub fn mark_handled(&mut self, consumer: &ConsumerId) {
        self.handled.insert(consumer.clone());
        self.impacted.insert(consumer.clone());
    }

    /// Mark a table whose column-level detail is subsumed by its own
    /// added or deleted record.
    pub fn mark_table_subsumed(&mut self, table: &TableKey) {
        self.subsumed_tables.insert(table.clone());
    }

    /// Whether a consumer is already fully covered.
    #[must_use]
    pub fn is_handled(&self, consumer: &ConsumerId) -> bool {
        self.handled.contains(consumer)
    }

    /// Whether a table's column-level detail is subsumed.
    #[must_use]
    pub fn is_table_subsumed(&self, table: &TableKey) -> bool {
        self.subsumed_tables.contains(table)
    }

    /// The impacted consumers recorded so far, in sorted order.
    #[must_use]
    pub fn impacted(&self) -> &BTreeSet<ConsumerId> {
        &self.impacted
    }

    /// Consume the tracker, yielding the impacted set.
    #[must_use]
    pub fn into_impacted(self) -> BTreeSet<ConsumerId> {
        self.impacted
    }
}
