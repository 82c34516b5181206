//! Integration tests for [`dashboard_server::SubscriberRegistry`].
//!
//! Covers best-effort broadcast, failure isolation, and self-healing
//! membership.

use dashboard_server::{PushFrame, SubscriberRegistry};
use storage::StatsSnapshot;

fn update_frame() -> PushFrame {
    PushFrame::Update {
        messages: vec![],
        stats: StatsSnapshot::empty(),
    }
}

/// **Test: A dead subscriber never blocks the others.**
///
/// **Setup:** Three subscribers; the second one's receiver is dropped.
/// **Action:** `broadcast` twice.
/// **Expected:** First broadcast delivers to 2, removes the dead one; second
/// broadcast delivers to 2 without retrying the removed subscriber.
#[tokio::test]
async fn test_broadcast_isolates_failed_subscriber() {
    let registry = SubscriberRegistry::new();

    let (_id1, mut rx1) = registry.subscribe();
    let (id2, rx2) = registry.subscribe();
    let (_id3, mut rx3) = registry.subscribe();
    assert_eq!(registry.len(), 3);

    drop(rx2); // viewer 2 is gone

    let delivered = registry.broadcast(&update_frame());
    assert_eq!(delivered, 2);
    assert_eq!(registry.len(), 2, "failed subscriber must be removed");

    let delivered = registry.broadcast(&update_frame());
    assert_eq!(delivered, 2, "removed subscriber must not be retried");

    // The healthy viewers got both frames.
    for rx in [&mut rx1, &mut rx3] {
        let first = rx.try_recv().expect("missing first frame");
        let second = rx.try_recv().expect("missing second frame");
        assert!(first.contains("\"type\":\"update\""));
        assert!(second.contains("\"type\":\"update\""));
    }

    // Unsubscribing the already-removed id is a no-op.
    registry.unsubscribe(id2);
    assert_eq!(registry.len(), 2);
}

/// **Test: Unsubscribe is idempotent.**
///
/// **Setup:** One subscriber.
/// **Action:** `unsubscribe` twice with the same id, once with a bogus id.
/// **Expected:** No panic; registry empty.
#[tokio::test]
async fn test_unsubscribe_idempotent() {
    let registry = SubscriberRegistry::new();

    let (id, _rx) = registry.subscribe();
    registry.unsubscribe(id);
    registry.unsubscribe(id);
    registry.unsubscribe(9999);

    assert!(registry.is_empty());
}

/// **Test: A subscriber only sees broadcasts issued after it joined.**
///
/// **Setup:** Broadcast once, then subscribe.
/// **Action:** Broadcast again.
/// **Expected:** The late subscriber receives exactly one frame.
#[tokio::test]
async fn test_late_subscriber_misses_earlier_broadcasts() {
    let registry = SubscriberRegistry::new();

    registry.broadcast(&update_frame());

    let (_id, mut rx) = registry.subscribe();
    let delivered = registry.broadcast(&update_frame());
    assert_eq!(delivered, 1);

    rx.try_recv().expect("missing frame");
    assert!(rx.try_recv().is_err(), "must not replay earlier broadcasts");
}

/// **Test: Broadcast to an empty registry is a no-op.**
#[tokio::test]
async fn test_broadcast_with_no_subscribers() {
    let registry = SubscriberRegistry::new();
    assert_eq!(registry.broadcast(&update_frame()), 0);
}
