//! Subscription types for live storage updates.

use crate::error::StorageError;
use crate::types::{Cookie, Value};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of change carried by a [`StorageEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PushBack,
    PushFront,
    PopBack,
    PopFront,
    Set,
    Insert,
    Delete,
    Clear,
}

impl EventKind {
    /// Wire name of the event (`push_back`, `pop_front`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PushBack => "push_back",
            EventKind::PushFront => "push_front",
            EventKind::PopBack => "pop_back",
            EventKind::PopFront => "pop_front",
            EventKind::Set => "set",
            EventKind::Insert => "insert",
            EventKind::Delete => "delete",
            EventKind::Clear => "clear",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    pub kind: EventKind,
    pub key: Value,
    pub value: Value,
    pub metadata: Value,
}

impl StorageEvent {
    pub fn new(kind: EventKind, key: Value, value: Value, metadata: Value) -> Self {
        Self {
            kind,
            key,
            value,
            metadata,
        }
    }
}

/// Why a sink could not take an event.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Receiving side is gone; the subscription is removed.
    #[error("sink disconnected")]
    Disconnected,

    /// Buffer overflowed (slow consumer); the subscription is removed.
    #[error("sink buffer full")]
    Full,

    /// Any other sink-side failure. The subscription is kept.
    #[error("sink failed: {0}")]
    Failed(String),
}

/// Receiver of storage events.
///
/// Called synchronously while the storage's write lock is held. A sink must
/// not block for long and must not call back into the storage, except for
/// `unsubscribe`.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &StorageEvent) -> Result<(), SinkError>;
}

impl<F> EventSink for F
where
    F: Fn(&StorageEvent) -> Result<(), SinkError> + Send + Sync,
{
    fn on_event(&self, event: &StorageEvent) -> Result<(), SinkError> {
        self(event)
    }
}

/// Sink that forwards events into a bounded channel.
pub struct ChannelSink {
    sender: Sender<StorageEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<StorageEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn on_event(&self, event: &StorageEvent) -> Result<(), SinkError> {
        match self.sender.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(crossbeam_channel::TrySendError::Full(_)) => Err(SinkError::Full),
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

/// Where a new subscription starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StartFrom {
    /// Only events for mutations after subscribing. No replay.
    #[default]
    Live,
    /// Replay existing elements from this index, then go live.
    Index(i64),
}

impl FromStr for StartFrom {
    type Err = StorageError;

    /// Parse a start specifier: empty means live, otherwise an integer index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(StartFrom::Live);
        }
        s.parse::<i64>()
            .map(StartFrom::Index)
            .map_err(|_| StorageError::InvalidArgument(format!("invalid start index {:?}", s)))
    }
}

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered live events before the subscriber is dropped.
    /// Values below 1 are treated as 1. Default: 1000
    pub buffer_size: usize,

    /// Where to start.
    pub start: StartFrom,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            start: StartFrom::Live,
        }
    }
}

/// Handle to a channel subscription.
pub struct SubscriptionHandle {
    pub cookie: Cookie,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StorageEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StorageEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StorageEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StorageEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<StorageEvent> {
        self.receiver.try_iter().collect()
    }
}
