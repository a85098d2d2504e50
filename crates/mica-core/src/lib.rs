//! # mica-core
//!
//! Shared identity vocabulary for the mica schema reconciliation workspace.
//!
//! This crate provides:
//! - Composite identity keys for schema objects ([`TableKey`], [`ColumnKey`])
//!   with exact-string matching semantics
//! - Type-safe identifier newtypes ([`ConsumerId`], [`RunId`])
//! - The [`ConsumerScoped`] trait for records that carry an owning consumer
//!
//! # Example
//!
//! ```
//! use mica_core::{ColumnKey, TableKey};
//!
//! let table = TableKey::new("dbo", "Accounts")?;
//! let column = ColumnKey::for_table(table.clone(), "account_id")?;
//!
//! assert_eq!(column.table_key(), &table);
//! assert_eq!(column.to_string(), "dbo.Accounts.account_id");
//! # Ok::<(), mica_core::KeyError>(())
//! ```

pub mod ids;
pub mod key;
pub mod traits;

pub use ids::{ConsumerId, RunId};
pub use key::{ColumnKey, KeyError, KeyResult, TableKey};
pub use traits::ConsumerScoped;
