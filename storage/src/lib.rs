//! Storage crate: the append-only message log and derived aggregates.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – MessageRecord, UserActivity, StatsSnapshot
//! - [`message_store`] – MessageStore (SQLite, append/list/search/clear)
//! - [`aggregates`] – AggregateComputer (stats + hourly histogram)
//! - [`sqlite_pool`] – SqlitePoolManager

mod aggregates;
mod error;
mod message_store;
mod models;
mod sqlite_pool;


pub use aggregates::{AggregateComputer, HOURLY_BUCKETS};
pub use error::StorageError;
pub use message_store::{MessageStore, DEFAULT_LIST_LIMIT};
pub use models::{MessageRecord, StatsSnapshot, UserActivity};
pub use sqlite_pool::SqlitePoolManager;
