//! Subscriber registry: ordered listeners notified after each commit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Entry {
    id: u64,
    listener: Listener,
}

/// Ordered collection of subscriber callbacks.
///
/// Insertion order is notification order. Notification runs on a snapshot of
/// the list, so a listener that unsubscribes itself (or any other listener)
/// mid-pass does not disrupt the pass in progress; the change takes effect
/// from the next dispatch. A listener subscribed mid-pass is likewise first
/// notified by the next dispatch.
pub(crate) struct SubscriberRegistry {
    entries: Arc<Mutex<Vec<Entry>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().push(Entry {
            id,
            listener: Arc::new(listener),
        });
        Subscription {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Invoke every currently registered listener, in subscription order.
    ///
    /// The registry lock is released before any listener runs, so listeners
    /// are free to subscribe, unsubscribe, or dispatch.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .entries
            .lock()
            .iter()
            .map(|entry| Arc::clone(&entry.listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

/// Handle returned by [`subscribe`](crate::store::Store::subscribe).
///
/// Each subscription is independent: subscribing the same callback twice
/// yields two handles that must be unsubscribed separately. Dropping the
/// handle without calling [`unsubscribe`](Subscription::unsubscribe) leaves
/// the listener registered for the lifetime of the store.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    entries: Weak<Mutex<Vec<Entry>>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().retain(|entry| entry.id != self.id);
        }
    }
}
