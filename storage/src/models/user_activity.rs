//! Per-sender activity, derived from inbound messages.
//!
//! One row per distinct non-bot sender ever observed. `message_count` tracks
//! `received`-status messages only; outbound bot traffic never touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserActivity {
    pub phone: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub message_count: i64,
}
