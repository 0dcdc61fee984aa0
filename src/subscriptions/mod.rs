//! Subscription system for live storage updates.
//!
//! Every successful mutation raises one [`StorageEvent`], delivered
//! synchronously to each registered sink before the mutating call returns.
//!
//! Subscriptions support:
//! - Callback sinks (any `Fn(&StorageEvent) -> Result<(), SinkError>`)
//! - Bounded channel sinks with a pull-style handle
//! - Replay of existing elements from a start index, followed by live events
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe_channel(SubscriptionConfig {
//!     start: StartFrom::Index(0),
//!     ..Default::default()
//! })?;
//!
//! while let Ok(event) = handle.recv() {
//!     println!("{} {} {}", event.kind, event.key, event.value);
//! }
//! ```

mod manager;
mod types;

pub use manager::EventDispatcher;
pub use types::{
    ChannelSink, EventKind, EventSink, SinkError, StartFrom, StorageEvent, SubscriptionConfig,
    SubscriptionHandle,
};
