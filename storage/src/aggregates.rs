//! Aggregate computer: summary statistics and the hourly histogram.
//!
//! Stateless relative to the store: every call recomputes from SQLite. At
//! dashboard volume the O(n) recompute is cheaper to reason about than a
//! cache that has to be invalidated on every append and clear.

use chrono::{DateTime, Local, Timelike, Utc};

use crate::error::StorageError;
use crate::message_store::MessageStore;
use crate::models::StatsSnapshot;

/// Number of hour-of-day buckets in the histogram.
pub const HOURLY_BUCKETS: usize = 24;

#[derive(Clone)]
pub struct AggregateComputer {
    store: MessageStore,
}

impl AggregateComputer {
    pub fn new(store: MessageStore) -> Self {
        Self { store }
    }

    /// Counts over the whole log: total, per-status, and distinct users.
    pub async fn snapshot_stats(&self) -> Result<StatsSnapshot, StorageError> {
        let pool = self.store.pool();

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(pool)
            .await?;

        let received: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE status = 'received'")
                .fetch_one(pool)
                .await?;

        let sent: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE status = 'sent'")
            .fetch_one(pool)
            .await?;

        let failed: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE status = 'failed'")
                .fetch_one(pool)
                .await?;

        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(StatsSnapshot {
            total: total.0,
            received: received.0,
            sent: sent.0,
            failed: failed.0,
            users: users.0,
        })
    }

    /// Message volume per local hour-of-day, over the full log.
    ///
    /// Bucketing is calendar-hour over the entire history, not a rolling
    /// 24-hour window, so the buckets always sum to `snapshot_stats().total`.
    pub async fn snapshot_hourly(&self) -> Result<[i64; HOURLY_BUCKETS], StorageError> {
        let pool = self.store.pool();

        let timestamps: Vec<(DateTime<Utc>,)> =
            sqlx::query_as("SELECT created_at FROM messages")
                .fetch_all(pool)
                .await?;

        let mut buckets = [0i64; HOURLY_BUCKETS];
        for (created_at,) in timestamps {
            let hour = created_at.with_timezone(&Local).hour() as usize;
            buckets[hour] += 1;
        }

        Ok(buckets)
    }
}
