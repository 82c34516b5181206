//! Event ingestor: the single entry point for new message events.
//!
//! Every ingestion follows the same sequence: append to the store, recompute
//! the stats snapshot, broadcast the delta. Nothing is broadcast when the
//! append fails, so viewers only ever see committed state. The whole
//! sequence runs under one lock, so deltas leave in ingest order and a
//! viewer never sees a frame whose counts regress.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use wflow_core::{MessageStatus, Result, BOT_SENDER};

use storage::{AggregateComputer, MessageRecord, MessageStore};

use crate::registry::SubscriberRegistry;
use crate::wire::{wire_messages, PushFrame};

/// How many recent messages ride along on an `update` frame.
const UPDATE_RECENT_LIMIT: i64 = 6;

/// Sender used when a simulated event does not name one.
const DEFAULT_SENDER: &str = "+15550100";
/// Text used when a simulated event does not carry one.
const DEFAULT_TEXT: &str = "Hello from a simulated customer";
/// Text used when a simulated delivery failure does not carry one.
const DEFAULT_FAILED_TEXT: &str = "Simulated delivery failure";

#[derive(Clone)]
pub struct EventIngestor {
    store: MessageStore,
    aggregates: AggregateComputer,
    registry: Arc<SubscriberRegistry>,
    /// Serializes append, snapshot, and broadcast across concurrent
    /// ingestions: without it, a task suspended between its append and its
    /// broadcast could ship a stale frame after a later event's frame.
    sequence: Arc<Mutex<()>>,
}

impl EventIngestor {
    pub fn new(
        store: MessageStore,
        aggregates: AggregateComputer,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        Self {
            store,
            aggregates,
            registry,
            sequence: Arc::new(Mutex::new(())),
        }
    }

    /// Records an inbound message and the bot's auto-reply, then broadcasts
    /// an `update` delta to every viewer. Returns both created messages.
    ///
    /// `sender` and `text` default to simulated values when absent, matching
    /// the trigger endpoint's contract.
    pub async fn record_inbound(
        &self,
        sender: Option<String>,
        text: Option<String>,
    ) -> Result<(MessageRecord, MessageRecord)> {
        let sender = sender.unwrap_or_else(|| DEFAULT_SENDER.to_string());
        let text = text.unwrap_or_else(|| DEFAULT_TEXT.to_string());
        let reply = format!("Thanks {}! Your message has been received.", sender);

        let _guard = self.sequence.lock().await;
        let (inbound, auto_reply) = self.store.append_exchange(&sender, &text, &reply).await?;

        self.broadcast_update().await?;

        Ok((inbound, auto_reply))
    }

    /// Records an outbound attempt that did not go through, then broadcasts.
    ///
    /// Keeps the `failed` counter honest without involving a real transport.
    /// The sender defaults to the bot identity.
    pub async fn record_failed_outbound(
        &self,
        sender: Option<String>,
        text: Option<String>,
    ) -> Result<MessageRecord> {
        let sender = sender.unwrap_or_else(|| BOT_SENDER.to_string());
        let text = text.unwrap_or_else(|| DEFAULT_FAILED_TEXT.to_string());

        let _guard = self.sequence.lock().await;
        let record = self
            .store
            .append(&sender, &text, MessageStatus::Failed)
            .await?;

        self.broadcast_update().await?;

        Ok(record)
    }

    /// Empties the log and pushes a full reset frame so every viewer drops
    /// its incremental state in lockstep.
    pub async fn clear_and_notify(&self) -> Result<()> {
        let _guard = self.sequence.lock().await;
        self.store.clear_all().await?;

        let stats = self.aggregates.snapshot_stats().await?;
        let hourly = self.aggregates.snapshot_hourly().await?;
        let frame = PushFrame::Init {
            messages: Vec::new(),
            stats,
            hourly,
        };
        let delivered = self.registry.broadcast(&frame);
        info!(delivered = delivered, "Broadcast reset after clear");

        Ok(())
    }

    /// Caller must hold `sequence`.
    async fn broadcast_update(&self) -> Result<()> {
        let stats = self.aggregates.snapshot_stats().await?;
        let recent = self.store.list_recent(UPDATE_RECENT_LIMIT, None).await?;
        let frame = PushFrame::Update {
            messages: wire_messages(&recent),
            stats,
        };
        let delivered = self.registry.broadcast(&frame);
        info!(delivered = delivered, total = stats.total, "Broadcast update");
        Ok(())
    }
}
