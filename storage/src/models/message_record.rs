//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageStore. Records are
//! immutable once appended; the id comes from SQLite AUTOINCREMENT so it is
//! unique and never reused, even across a bulk clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use wflow_core::MessageStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub sender: String,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for MessageRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<MessageStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?;
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            content: row.try_get("content")?,
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}
