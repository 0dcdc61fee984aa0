//! The storage backend contract.
//!
//! Every storage kind (ordered list, map, tree) sits behind [`Storage`], so a
//! command layer can drive any of them without knowing which one it holds.
//! Operations a backend does not support fail with `Unsupported` or
//! `NotImplemented`.

use crate::error::Result;
use crate::subscriptions::{EventSink, StartFrom};
use crate::types::{Cookie, Record, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Family a backend belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    List,
    Map,
    Tree,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::List => write!(f, "list"),
            StorageKind::Map => write!(f, "map"),
            StorageKind::Tree => write!(f, "tree"),
        }
    }
}

/// Operations shared by all storage backends.
pub trait Storage: Send + Sync {
    fn name(&self) -> &str;

    /// Type string the storage was created with.
    fn storage_type(&self) -> &str;

    fn kind(&self) -> StorageKind;

    fn record_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    fn push_back(&self, key: Value, value: Value, metadata: Value) -> Result<()>;

    fn push_front(&self, key: Value, value: Value, metadata: Value) -> Result<()>;

    fn pop_back(&self) -> Result<Record>;

    fn pop_front(&self) -> Result<Record>;

    fn set(&self, index: i64, value: Value, metadata: Value) -> Result<()>;

    fn insert(&self, index: i64, value: Value, metadata: Value) -> Result<()>;

    fn delete(&self, index: i64, value: Value, metadata: Value) -> Result<()>;

    fn clear(&self) -> Result<()>;

    fn query(&self, query: &Value) -> Result<Vec<Record>>;

    fn get_record(&self, index: i64) -> Result<Record>;

    fn subscribe(&self, sink: Arc<dyn EventSink>, start: StartFrom) -> Result<Cookie>;

    fn unsubscribe(&self, cookie: Cookie);

    /// Backend-specific administrative command.
    fn command(&self, command: &str) -> Result<String>;
}
