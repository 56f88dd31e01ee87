//! In-process publish/subscribe channel.
//!
//! Delivery is synchronous and follows subscription order. Each emit works on
//! a snapshot of the subscriber list taken before the first handler runs, so
//! handlers may subscribe or unsubscribe freely without affecting the round
//! in flight. No lock is held while a handler executes.
//!
//! Emits with no subscribers are dropped; nothing is buffered or replayed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;

/// Callback invoked for every matching emit.
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Identifier handed out by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<E> {
    id: SubscriptionId,
    event_name: String,
    handler: Handler<E>,
}

type SubscriberList<E> = Mutex<Vec<Subscriber<E>>>;

pub struct EventChannel<E> {
    subscribers: Arc<SubscriberList<E>>,
    next_id: AtomicU64,
}

impl<E: 'static> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `handler` for every future emit of `event_name`.
    ///
    /// The returned guard unsubscribes when dropped.
    pub fn subscribe<F>(&self, event_name: &str, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
        E: Send,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push(Subscriber {
            id,
            event_name: event_name.to_string(),
            handler: Arc::new(handler),
        });

        let subscribers: Weak<SubscriberList<E>> = Arc::downgrade(&self.subscribers);
        Subscription {
            id,
            unsubscribe: Some(Box::new(move |id| {
                if let Some(list) = subscribers.upgrade() {
                    list.lock().retain(|s| s.id != id);
                }
            })),
        }
    }

    /// Forward every `event_name` emit into a channel.
    ///
    /// Useful for consumers that drain events from an update loop instead of
    /// reacting inside the emitting call.
    pub fn subscribe_channel(&self, event_name: &str) -> (Subscription, Receiver<E>)
    where
        E: Clone + Send,
    {
        let (tx, rx) = unbounded::<E>();
        let subscription = self.subscribe(event_name, move |event: &E| {
            // Receiver gone: the consumer stopped listening
            let _ = tx.send(event.clone());
        });
        (subscription, rx)
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut list = self.subscribers.lock();
        let before = list.len();
        list.retain(|s| s.id != id);
        list.len() != before
    }

    /// Deliver `payload` to every current subscriber of `event_name`.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit(&self, event_name: &str, payload: &E) -> usize {
        let round: Vec<Handler<E>> = self
            .subscribers
            .lock()
            .iter()
            .filter(|s| s.event_name == event_name)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        if round.is_empty() {
            tracing::trace!(event = event_name, "emit dropped, no subscribers");
            return 0;
        }

        for handler in &round {
            handler(payload);
        }
        round.len()
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|s| s.event_name == event_name)
            .count()
    }
}

impl<E: 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a live subscription. Dropping it unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    unsubscribe: Option<Box<dyn FnOnce(SubscriptionId) + Send + Sync>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Keep the handler registered for the lifetime of the channel.
    pub fn detach(mut self) -> SubscriptionId {
        self.unsubscribe = None;
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.unsubscribe.is_some())
            .finish()
    }
}
