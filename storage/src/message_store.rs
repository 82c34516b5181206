//! Message store: the append-only persisted log plus the derived users table.
//!
//! Uses SqlitePoolManager and the models (MessageRecord, UserActivity).
//! Appends are transactional: the message insert and the user upsert commit
//! together, so readers triggered by a post-append broadcast always see
//! consistent state.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::info;
use wflow_core::{MessageStatus, BOT_SENDER};

use crate::error::StorageError;
use crate::models::{MessageRecord, UserActivity};
use crate::sqlite_pool::SqlitePoolManager;

/// Result cap for `list_recent` when the caller does not pick one.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct MessageStore {
    pool_manager: SqlitePoolManager,
}

impl MessageStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_messages_status ON messages(status)",
            "CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender)",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                phone TEXT PRIMARY KEY,
                first_seen TEXT NOT NULL,
                last_seen TEXT NOT NULL,
                message_count INTEGER NOT NULL DEFAULT 0
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_users_last_seen ON users(last_seen)",
        ];
        for statement in statements {
            sqlx::query(statement).execute(pool).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }

    pub(crate) fn pool(&self) -> &sqlx::SqlitePool {
        self.pool_manager.pool()
    }

    /// Appends one message, assigning the next id and the current timestamp.
    ///
    /// When `status` is `Received` and the sender is not the bot, the sender's
    /// activity row is created or bumped in the same transaction. Empty or
    /// whitespace-only text is rejected before any write.
    pub async fn append(
        &self,
        sender: &str,
        text: &str,
        status: MessageStatus,
    ) -> Result<MessageRecord, StorageError> {
        validate_text(text)?;

        let mut tx = self.pool_manager.pool().begin().await?;
        let record = insert_message(&mut tx, sender, text, status, Utc::now()).await?;
        if status == MessageStatus::Received && sender != BOT_SENDER {
            touch_user(&mut tx, sender, record.created_at).await?;
        }
        tx.commit().await?;

        info!(id = record.id, status = %record.status, "Appended message");
        Ok(record)
    }

    /// Appends an inbound message and the bot's auto-reply as one atomic unit.
    ///
    /// A store failure leaves neither committed; the caller never observes a
    /// half-recorded exchange.
    pub async fn append_exchange(
        &self,
        sender: &str,
        text: &str,
        reply_text: &str,
    ) -> Result<(MessageRecord, MessageRecord), StorageError> {
        validate_text(text)?;
        validate_text(reply_text)?;

        let mut tx = self.pool_manager.pool().begin().await?;
        let inbound =
            insert_message(&mut tx, sender, text, MessageStatus::Received, Utc::now()).await?;
        if sender != BOT_SENDER {
            touch_user(&mut tx, sender, inbound.created_at).await?;
        }
        let reply = insert_message(
            &mut tx,
            BOT_SENDER,
            reply_text,
            MessageStatus::Sent,
            Utc::now(),
        )
        .await?;
        tx.commit().await?;

        info!(
            inbound_id = inbound.id,
            reply_id = reply.id,
            sender = sender,
            "Recorded inbound exchange"
        );
        Ok((inbound, reply))
    }

    /// Returns up to `limit` most recent messages in chronological order
    /// (the newest `limit` are selected, then displayed oldest-first).
    ///
    /// `search` is a case-insensitive substring match against sender OR
    /// content. `limit` is clamped to at least 1.
    pub async fn list_recent(
        &self,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let limit = limit.max(1);

        let mut messages: Vec<MessageRecord> = match search {
            Some(keyword) => {
                let pattern = format!("%{}%", keyword);
                sqlx::query_as(
                    "SELECT * FROM messages WHERE sender LIKE ?1 OR content LIKE ?1 \
                     ORDER BY id DESC LIMIT ?2",
                )
                .bind(&pattern)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM messages ORDER BY id DESC LIMIT ?")
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
        };
        messages.reverse();

        Ok(messages)
    }

    /// Returns all known senders, most recently seen first.
    pub async fn list_users(&self) -> Result<Vec<UserActivity>, StorageError> {
        let pool = self.pool_manager.pool();

        let users: Vec<UserActivity> =
            sqlx::query_as("SELECT * FROM users ORDER BY last_seen DESC")
                .fetch_all(pool)
                .await?;

        Ok(users)
    }

    /// Removes all messages and all user activity in one transaction.
    ///
    /// Users are cleared together with messages so `message_count` stays
    /// consistent with the emptied log. The AUTOINCREMENT sequence is kept,
    /// so message ids are never reused after a clear.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;
        let deleted = sqlx::query("DELETE FROM messages")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        tx.commit().await?;

        info!(deleted = deleted, "Cleared message log");
        Ok(())
    }
}

fn validate_text(text: &str) -> Result<(), StorageError> {
    if text.trim().is_empty() {
        return Err(StorageError::Validation(
            "message text must not be empty".to_string(),
        ));
    }
    Ok(())
}

async fn insert_message(
    conn: &mut SqliteConnection,
    sender: &str,
    text: &str,
    status: MessageStatus,
    at: DateTime<Utc>,
) -> Result<MessageRecord, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO messages (sender, content, status, created_at) VALUES (?, ?, ?, ?)")
            .bind(sender)
            .bind(text)
            .bind(status.as_str())
            .bind(at)
            .execute(&mut *conn)
            .await?;

    Ok(MessageRecord {
        id: result.last_insert_rowid(),
        sender: sender.to_string(),
        content: text.to_string(),
        status,
        created_at: at,
    })
}

async fn touch_user(
    conn: &mut SqliteConnection,
    phone: &str,
    seen_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (phone, first_seen, last_seen, message_count)
        VALUES (?1, ?2, ?2, 1)
        ON CONFLICT(phone) DO UPDATE SET
            last_seen = excluded.last_seen,
            message_count = message_count + 1
        "#,
    )
    .bind(phone)
    .bind(seen_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
