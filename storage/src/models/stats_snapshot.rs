//! Aggregate counts over the message log.
//!
//! Returned by AggregateComputer::snapshot_stats and sent to viewers as the
//! `stats` object on the wire. `total` always equals
//! `received + sent + failed`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total: i64,
    pub received: i64,
    pub sent: i64,
    pub failed: i64,
    pub users: i64,
}

impl StatsSnapshot {
    /// All-zero snapshot, the state right after a bulk clear.
    pub fn empty() -> Self {
        Self {
            total: 0,
            received: 0,
            sent: 0,
            failed: 0,
            users: 0,
        }
    }
}
