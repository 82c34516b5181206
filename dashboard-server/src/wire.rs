//! Wire frames pushed to dashboard viewers.
//!
//! Two shapes, distinguished by the `type` tag: `init` carries the full
//! snapshot (also reused as the reset payload after a clear), `update` carries
//! the incremental delta and omits the histogram, which viewers retain from
//! the last `init`.

use chrono::Local;
use serde::{Deserialize, Serialize};
use storage::{MessageRecord, StatsSnapshot, HOURLY_BUCKETS};
use wflow_core::MessageStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushFrame {
    Init {
        messages: Vec<WireMessage>,
        stats: StatsSnapshot,
        hourly: [i64; HOURLY_BUCKETS],
    },
    Update {
        messages: Vec<WireMessage>,
        stats: StatsSnapshot,
    },
}

/// Message as rendered on the wire: `{"id","from","text","status","time"}`
/// with `time` as local `HH:MM:SS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub id: i64,
    pub from: String,
    pub text: String,
    pub status: MessageStatus,
    pub time: String,
}

impl From<&MessageRecord> for WireMessage {
    fn from(record: &MessageRecord) -> Self {
        Self {
            id: record.id,
            from: record.sender.clone(),
            text: record.content.clone(),
            status: record.status,
            time: record
                .created_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
        }
    }
}

/// Converts stored records to their wire shape, preserving order.
pub fn wire_messages(records: &[MessageRecord]) -> Vec<WireMessage> {
    records.iter().map(WireMessage::from).collect()
}
