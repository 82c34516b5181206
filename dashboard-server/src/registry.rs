//! Subscriber registry: the set of connected dashboard viewers.
//!
//! Broadcast serializes the frame once and walks a snapshot of the
//! membership map; subscribers whose channel is gone are collected during the
//! walk and removed afterwards, so one dead connection never blocks delivery
//! to the rest and iteration never races a removal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::wire::PushFrame;

pub type SubscriberId = u64;

type SubscriberMap = HashMap<SubscriberId, mpsc::UnboundedSender<String>>;

pub struct SubscriberRegistry {
    next_id: AtomicU64,
    subscribers: Mutex<SubscriberMap>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubscriberMap> {
        // A poisoned lock only means a panicking thread held it; the map
        // itself is still valid.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new viewer and returns its id plus the frame channel.
    ///
    /// The caller is responsible for sending the initial snapshot; the
    /// registry itself only delivers subsequent broadcasts.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(id, tx);
        debug!(subscriber = id, "Subscriber registered");
        (id, rx)
    }

    /// Removes a viewer. Idempotent: removing an unknown id is a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        if self.lock().remove(&id).is_some() {
            debug!(subscriber = id, "Subscriber removed");
        }
    }

    /// Number of currently registered viewers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sends `frame` to every registered viewer, best effort.
    ///
    /// Returns the number of successful deliveries. Failed subscribers are
    /// dropped from the registry as a side effect and are not retried on the
    /// next broadcast.
    pub fn broadcast(&self, frame: &PushFrame) -> usize {
        let payload = match serde_json::to_string(frame) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize push frame: {}", e);
                return 0;
            }
        };

        let targets: Vec<(SubscriberId, mpsc::UnboundedSender<String>)> = self
            .lock()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut failed: Vec<SubscriberId> = Vec::new();
        let mut delivered = 0;
        for (id, tx) in targets {
            if tx.send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                failed.push(id);
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.lock();
            for id in &failed {
                subscribers.remove(id);
            }
            warn!(
                dropped = failed.len(),
                remaining = subscribers.len(),
                "Dropped unreachable subscribers during broadcast"
            );
        }

        delivered
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
