//! Event dispatcher for broadcasting storage events.

use crate::types::Cookie;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::types::{EventSink, SinkError, StorageEvent};

/// Internal subscriber state.
struct Subscriber {
    cookie: Cookie,
    sink: Arc<dyn EventSink>,
    /// Cleared on unsubscribe so an in-flight broadcast skips it.
    active: AtomicBool,
}

/// Outcome of handing one event to one sink.
enum Delivery {
    Delivered,
    Failed,
    /// Sink is gone or overflowed; the subscriber must be removed.
    Dropped,
}

impl Subscriber {
    fn deliver(&self, event: &StorageEvent) -> Delivery {
        if !self.active.load(Ordering::Acquire) {
            return Delivery::Delivered;
        }

        match catch_unwind(AssertUnwindSafe(|| self.sink.on_event(event))) {
            Ok(Ok(())) => Delivery::Delivered,
            Ok(Err(e @ (SinkError::Disconnected | SinkError::Full))) => {
                warn!(cookie = %self.cookie, kind = %event.kind, error = %e, "dropping subscriber");
                Delivery::Dropped
            }
            Ok(Err(e)) => {
                warn!(cookie = %self.cookie, kind = %event.kind, error = %e, "subscriber failed to take event");
                Delivery::Failed
            }
            Err(_) => {
                warn!(cookie = %self.cookie, kind = %event.kind, "subscriber panicked");
                Delivery::Failed
            }
        }
    }
}

/// Registry of subscribers plus synchronous, ordered broadcast.
///
/// The registry has its own lock, which is never held while a sink runs.
/// A sink may therefore unsubscribe itself or anyone else mid-broadcast.
pub struct EventDispatcher {
    /// Active subscribers in registration order.
    subscribers: Mutex<Vec<Arc<Subscriber>>>,
    /// Counter for generating cookies.
    next_cookie: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_cookie: AtomicU64::new(1),
        }
    }

    /// Register a sink. Cookies are never reused.
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) -> Cookie {
        let cookie = Cookie(self.next_cookie.fetch_add(1, Ordering::SeqCst));

        self.subscribers.lock().push(Arc::new(Subscriber {
            cookie,
            sink,
            active: AtomicBool::new(true),
        }));

        debug!(%cookie, "subscriber registered");
        cookie
    }

    /// Remove a subscriber. Unknown cookies are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn unsubscribe(&self, cookie: Cookie) -> bool {
        let mut subs = self.subscribers.lock();
        match subs.iter().position(|s| s.cookie == cookie) {
            Some(i) => {
                let sub = subs.remove(i);
                sub.active.store(false, Ordering::Release);
                debug!(%cookie, "subscriber removed");
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_subscribed(&self, cookie: Cookie) -> bool {
        self.subscribers.lock().iter().any(|s| s.cookie == cookie)
    }

    /// Deliver an event to every active subscriber, in registration order.
    ///
    /// A failing or panicking sink does not stop delivery to the rest.
    /// Disconnected or overflowing sinks are removed once the broadcast
    /// completes, so a subscriber never sees a gap in its stream.
    pub fn raise(&self, event: &StorageEvent) {
        let snapshot: Vec<Arc<Subscriber>> = self.subscribers.lock().clone();
        trace!(kind = %event.kind, key = %event.key, subscribers = snapshot.len(), "raise event");

        let mut dropped = Vec::new();
        for sub in &snapshot {
            if let Delivery::Dropped = sub.deliver(event) {
                dropped.push(sub.cookie);
            }
        }

        for cookie in dropped {
            self.unsubscribe(cookie);
        }
    }

    /// Send an event to a single subscriber (for replay).
    ///
    /// Returns false if the subscriber is gone or was dropped.
    pub fn send_to(&self, cookie: Cookie, event: &StorageEvent) -> bool {
        let sub = self
            .subscribers
            .lock()
            .iter()
            .find(|s| s.cookie == cookie)
            .cloned();

        match sub {
            Some(sub) => match sub.deliver(event) {
                Delivery::Dropped => {
                    self.unsubscribe(cookie);
                    false
                }
                _ => true,
            },
            None => false,
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
