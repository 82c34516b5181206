//! Read-side façade for snapshot requests and searches.

use wflow_core::Result;

use storage::{AggregateComputer, MessageRecord, MessageStore, DEFAULT_LIST_LIMIT};

use crate::wire::{wire_messages, PushFrame};

/// How many recent messages the initial snapshot carries.
const INIT_RECENT_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct QueryService {
    store: MessageStore,
    aggregates: AggregateComputer,
}

impl QueryService {
    pub fn new(store: MessageStore, aggregates: AggregateComputer) -> Self {
        Self { store, aggregates }
    }

    /// Full snapshot sent to a viewer exactly once, right after it
    /// subscribes: the last 20 messages in chronological order, stats, and
    /// the hourly histogram.
    pub async fn initial_snapshot(&self) -> Result<PushFrame> {
        let recent = self.store.list_recent(INIT_RECENT_LIMIT, None).await?;
        let stats = self.aggregates.snapshot_stats().await?;
        let hourly = self.aggregates.snapshot_hourly().await?;

        Ok(PushFrame::Init {
            messages: wire_messages(&recent),
            stats,
            hourly,
        })
    }

    /// Filtered listing over the log; chronological order, same contract as
    /// `MessageStore::list_recent`.
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<MessageRecord>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let messages = self.store.list_recent(limit, query).await?;
        Ok(messages)
    }
}
