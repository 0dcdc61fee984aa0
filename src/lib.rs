//! # Vector Storage
//!
//! An in-memory ordered list storage that pairs every value with metadata,
//! supports python-style positional access, and streams every change to
//! subscribers.
//!
//! ## Core Concepts
//!
//! - **Records**: `(value, metadata)` pairs addressed purely by position
//! - **Indices**: non-negative from the front, negative from the end (`-1` is last)
//! - **Events**: every successful mutation is broadcast synchronously
//! - **Replay**: a subscriber may start at an index and receive the existing
//!   elements before the live stream, with no gap and no duplicate
//!
//! ## Example
//!
//! ```ignore
//! use vector_storage::{StartFrom, Storage, StoreConfig, Value, VectorStore};
//!
//! let store = VectorStore::new(StoreConfig::named("jobs"));
//! store.push_back(Value::Null, 10.into(), "m1".into())?;
//!
//! let cookie = store.subscribe(Arc::new(|event: &StorageEvent| {
//!     println!("{} at {}", event.kind, event.key);
//!     Ok(())
//! }), StartFrom::Index(0))?;
//!
//! let last = store.get_record(-1)?;
//! store.unsubscribe(cookie);
//! ```

pub mod catalog;
pub mod error;
pub mod records;
pub mod storage;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use catalog::StorageCatalog;
pub use error::{Result, StorageError};
pub use records::{resolve, resolve_start, RecordList};
pub use storage::{Storage, StorageKind};
pub use store::{StoreConfig, VectorStore};
pub use subscriptions::{
    ChannelSink, EventDispatcher, EventKind, EventSink, SinkError, StartFrom, StorageEvent,
    SubscriptionConfig, SubscriptionHandle,
};
pub use types::*;
