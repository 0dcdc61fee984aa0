//! Ordered list storage tying records, index resolution and subscriptions
//! together.

use crate::error::{Result, StorageError};
use crate::records::{resolve_start, RecordList};
use crate::storage::{Storage, StorageKind};
use crate::subscriptions::{
    ChannelSink, EventDispatcher, EventKind, EventSink, StartFrom, StorageEvent,
    SubscriptionConfig, SubscriptionHandle,
};
use crate::types::{Cookie, Record, Value};
use crossbeam_channel::bounded;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Name of this storage instance.
    pub name: String,

    /// Type string reported by `storage_type()`.
    pub storage_type: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            storage_type: "vector".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// In-memory, randomly indexable ordered list storage.
///
/// One lock guards the records. Mutations and the register-then-replay step
/// of a subscription run under the write lock, and events are raised before
/// it is released, so subscribers see every change exactly once and in
/// order. Reads take the shared lock.
///
/// Sinks run while the write lock is held: they must not call back into
/// the store, except for `unsubscribe`, which only touches the subscriber
/// registry.
pub struct VectorStore {
    config: StoreConfig,

    records: RwLock<RecordList>,

    dispatcher: EventDispatcher,
}

impl VectorStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            records: RwLock::new(RecordList::new()),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Copy of every record, in position order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().iter().cloned().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.dispatcher.subscriber_count()
    }

    /// Subscribe through a bounded channel.
    ///
    /// The channel holds `buffer_size` events (at least one) on top of
    /// whatever the replay delivers, so a replay never overflows it. Once
    /// live events overflow the buffer the subscription is dropped and the
    /// receiver disconnects after draining.
    pub fn subscribe_channel(&self, config: SubscriptionConfig) -> Result<SubscriptionHandle> {
        let buffer_size = config.buffer_size.max(1);
        let (cookie, receiver) = self.subscribe_with(config.start, |replay_len| {
            let (sender, receiver) = bounded(buffer_size.saturating_add(replay_len));
            let sink: Arc<dyn EventSink> = Arc::new(ChannelSink::new(sender));
            (sink, receiver)
        })?;

        Ok(SubscriptionHandle { cookie, receiver })
    }

    /// Register a sink and replay from `start`, all under the write lock.
    ///
    /// `make_sink` receives the number of records the replay will deliver.
    fn subscribe_with<F, T>(&self, start: StartFrom, make_sink: F) -> Result<(Cookie, T)>
    where
        F: FnOnce(usize) -> (Arc<dyn EventSink>, T),
    {
        let records = self.records.write();

        let from = match start {
            StartFrom::Live => None,
            StartFrom::Index(index) => Some(resolve_start(index, records.len())?),
        };

        let replay_len = from.map_or(0, |p| records.len().saturating_sub(p));
        let (sink, extra) = make_sink(replay_len);
        let cookie = self.dispatcher.subscribe(sink);

        let mut replayed = 0usize;
        if let Some(from) = from {
            for (position, record) in records.iter_from(from) {
                let event = StorageEvent::new(
                    EventKind::PushBack,
                    Value::Int(position as i64),
                    record.value.clone(),
                    record.metadata.clone(),
                );
                if !self.dispatcher.send_to(cookie, &event) {
                    warn!(
                        storage = %self.config.name,
                        %cookie,
                        replayed,
                        expected = replay_len,
                        "subscriber dropped during replay"
                    );
                    break;
                }
                replayed += 1;
            }
        }

        debug!(
            storage = %self.config.name,
            %cookie,
            ?start,
            replayed,
            "subscribed"
        );
        Ok((cookie, extra))
    }

    fn raise(&self, kind: EventKind, key: Value, value: Value, metadata: Value) {
        self.dispatcher
            .raise(&StorageEvent::new(kind, key, value, metadata));
    }
}

impl Storage for VectorStore {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn storage_type(&self) -> &str {
        &self.config.storage_type
    }

    fn kind(&self) -> StorageKind {
        StorageKind::List
    }

    fn record_count(&self) -> usize {
        self.records.read().len()
    }

    fn push_back(&self, key: Value, value: Value, metadata: Value) -> Result<()> {
        let mut records = self.records.write();
        records.push_back(Record::new(value.clone(), metadata.clone()))?;
        self.raise(EventKind::PushBack, key, value, metadata);
        Ok(())
    }

    fn push_front(&self, key: Value, value: Value, metadata: Value) -> Result<()> {
        let mut records = self.records.write();
        records.push_front(Record::new(value.clone(), metadata.clone()))?;
        self.raise(EventKind::PushFront, key, value, metadata);
        Ok(())
    }

    fn pop_back(&self) -> Result<Record> {
        let mut records = self.records.write();
        let record = records.pop_back()?;
        self.raise(
            EventKind::PopBack,
            Value::Null,
            record.value.clone(),
            record.metadata.clone(),
        );
        Ok(record)
    }

    fn pop_front(&self) -> Result<Record> {
        let mut records = self.records.write();
        let record = records.pop_front()?;
        self.raise(
            EventKind::PopFront,
            Value::Null,
            record.value.clone(),
            record.metadata.clone(),
        );
        Ok(record)
    }

    fn set(&self, index: i64, value: Value, metadata: Value) -> Result<()> {
        let mut records = self.records.write();
        records.set(index, Record::new(value.clone(), metadata.clone()))?;
        self.raise(EventKind::Set, Value::Int(index), value, metadata);
        Ok(())
    }

    fn insert(&self, index: i64, value: Value, metadata: Value) -> Result<()> {
        let mut records = self.records.write();
        records.insert(index, Record::new(value.clone(), metadata.clone()))?;
        self.raise(EventKind::Insert, Value::Int(index), value, metadata);
        Ok(())
    }

    fn delete(&self, index: i64, value: Value, metadata: Value) -> Result<()> {
        let mut records = self.records.write();
        records.remove(index)?;
        self.raise(EventKind::Delete, Value::Int(index), value, metadata);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut records = self.records.write();
        records.clear();
        self.raise(EventKind::Clear, Value::Null, Value::Null, Value::Null);
        Ok(())
    }

    fn query(&self, _query: &Value) -> Result<Vec<Record>> {
        Err(StorageError::NotImplemented(format!(
            "query on {} storage",
            self.kind()
        )))
    }

    fn get_record(&self, index: i64) -> Result<Record> {
        self.records.read().get(index).cloned()
    }

    fn subscribe(&self, sink: Arc<dyn EventSink>, start: StartFrom) -> Result<Cookie> {
        self.subscribe_with(start, |_| (sink, ())).map(|(cookie, ())| cookie)
    }

    fn unsubscribe(&self, cookie: Cookie) {
        if !self.dispatcher.unsubscribe(cookie) {
            debug!(storage = %self.config.name, %cookie, "unsubscribe of unknown cookie ignored");
        }
    }

    fn command(&self, command: &str) -> Result<String> {
        Err(StorageError::Unsupported(format!(
            "command {:?} not supported",
            command
        )))
    }
}
