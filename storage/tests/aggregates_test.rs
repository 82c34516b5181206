//! Integration tests for [`storage::AggregateComputer`].
//!
//! Verifies the count invariants and the hourly histogram sum property
//! against an in-memory SQLite database.

use storage::{AggregateComputer, MessageStore, StatsSnapshot};
use wflow_core::{MessageStatus, BOT_SENDER};

async fn store_with_aggregates() -> (MessageStore, AggregateComputer) {
    let store = MessageStore::new("sqlite::memory:")
        .await
        .expect("Failed to create store");
    let aggregates = AggregateComputer::new(store.clone());
    (store, aggregates)
}

/// **Test: Total always equals the sum of the per-status counts.**
///
/// **Setup:** Append a mix of received, sent, and failed messages.
/// **Action:** `snapshot_stats()`.
/// **Expected:** `total == received + sent + failed` and each count matches
/// what was appended.
#[tokio::test]
async fn test_stats_total_is_sum_of_statuses() {
    let (store, aggregates) = store_with_aggregates().await;

    for i in 0..4 {
        store
            .append("+1555", &format!("in {}", i), MessageStatus::Received)
            .await
            .expect("Failed to append");
    }
    for i in 0..3 {
        store
            .append(BOT_SENDER, &format!("out {}", i), MessageStatus::Sent)
            .await
            .expect("Failed to append");
    }
    store
        .append(BOT_SENDER, "bounced", MessageStatus::Failed)
        .await
        .expect("Failed to append");

    let stats = aggregates
        .snapshot_stats()
        .await
        .expect("Failed to snapshot stats");

    assert_eq!(stats.received, 4);
    assert_eq!(stats.sent, 3);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.total, stats.received + stats.sent + stats.failed);
    assert_eq!(stats.total, 8);
    assert_eq!(stats.users, 1);
}

/// **Test: The received-plus-reply scenario yields the expected snapshot.**
///
/// **Setup:** One inbound from "+1555" with its bot auto-reply.
/// **Action:** `snapshot_stats()` and `list_users()`.
/// **Expected:** `{total:2, received:1, sent:1, failed:0, users:1}`; one user
/// with `message_count == 1`.
#[tokio::test]
async fn test_stats_after_single_exchange() {
    let (store, aggregates) = store_with_aggregates().await;

    store
        .append_exchange("+1555", "Hello", "Thanks for reaching out!")
        .await
        .expect("Failed to append exchange");

    let stats = aggregates
        .snapshot_stats()
        .await
        .expect("Failed to snapshot stats");
    assert_eq!(
        stats,
        StatsSnapshot {
            total: 2,
            received: 1,
            sent: 1,
            failed: 0,
            users: 1,
        }
    );

    let users = store.list_users().await.expect("Failed to list users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].message_count, 1);
}

/// **Test: Hourly buckets sum to the total message count.**
///
/// **Setup:** Append several messages (all land in the current local hour).
/// **Action:** `snapshot_hourly()` and `snapshot_stats()`.
/// **Expected:** 24 buckets; their sum equals `stats.total`.
#[tokio::test]
async fn test_hourly_sums_to_total() {
    let (store, aggregates) = store_with_aggregates().await;

    for i in 0..7 {
        store
            .append("+1555", &format!("msg {}", i), MessageStatus::Received)
            .await
            .expect("Failed to append");
    }

    let hourly = aggregates
        .snapshot_hourly()
        .await
        .expect("Failed to snapshot hourly");
    let stats = aggregates
        .snapshot_stats()
        .await
        .expect("Failed to snapshot stats");

    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly.iter().sum::<i64>(), stats.total);
    assert_eq!(hourly.iter().sum::<i64>(), 7);
}

/// **Test: Stats and histogram are zero on an empty store and after clear.**
///
/// **Setup:** Append a message, then `clear_all()`.
/// **Action:** `snapshot_stats()` and `snapshot_hourly()`.
/// **Expected:** The empty snapshot; every bucket zero.
#[tokio::test]
async fn test_stats_zero_after_clear() {
    let (store, aggregates) = store_with_aggregates().await;

    store
        .append("+1555", "soon gone", MessageStatus::Received)
        .await
        .expect("Failed to append");
    store.clear_all().await.expect("Failed to clear");

    let stats = aggregates
        .snapshot_stats()
        .await
        .expect("Failed to snapshot stats");
    assert_eq!(stats, StatsSnapshot::empty());

    let hourly = aggregates
        .snapshot_hourly()
        .await
        .expect("Failed to snapshot hourly");
    assert!(hourly.iter().all(|&count| count == 0));
}
