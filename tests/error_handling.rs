//! Error handling and edge case tests.

use parking_lot::Mutex;
use std::sync::Arc;
use vector_storage::{
    SinkError, StartFrom, Storage, StorageError, StorageEvent, StoreConfig, SubscriptionConfig,
    Value, VectorStore,
};

fn test_store() -> VectorStore {
    VectorStore::new(StoreConfig::named("errors"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn store_with(n: i64) -> VectorStore {
    let store = test_store();
    for i in 0..n {
        store.push_back(Value::Null, Value::Int(i), Value::Null).unwrap();
    }
    store
}

// --- Empty Collection ---

#[test]
fn test_pop_on_empty() {
    let store = test_store();
    assert!(matches!(store.pop_back(), Err(StorageError::EmptyCollection)));
    assert!(matches!(store.pop_front(), Err(StorageError::EmptyCollection)));
}

// --- Out of Range ---

#[test]
fn test_set_out_of_range() {
    let store = store_with(2);
    let result = store.set(5, Value::Int(9), "m".into());
    assert!(matches!(
        result,
        Err(StorageError::OutOfRange { index: 5, len: 2 })
    ));

    // Store untouched
    assert_eq!(store.get_record(0).unwrap().value, Value::Int(0));
    assert_eq!(store.get_record(1).unwrap().value, Value::Int(1));
}

#[test]
fn test_negative_underflow() {
    let store = store_with(3);
    assert_eq!(store.get_record(-3).unwrap().value, Value::Int(0));
    assert!(matches!(
        store.get_record(-4),
        Err(StorageError::OutOfRange { .. })
    ));
    assert!(matches!(
        store.delete(-4, Value::Null, Value::Null),
        Err(StorageError::OutOfRange { .. })
    ));
}

#[test]
fn test_insert_at_len_is_not_append() {
    let store = store_with(2);
    assert!(matches!(
        store.insert(2, Value::Int(9), Value::Null),
        Err(StorageError::OutOfRange { .. })
    ));
    assert_eq!(store.record_count(), 2);
}

#[test]
fn test_operations_on_empty_store() {
    let store = test_store();
    assert!(matches!(store.get_record(0), Err(StorageError::OutOfRange { .. })));
    assert!(matches!(
        store.set(0, Value::Int(1), Value::Null),
        Err(StorageError::OutOfRange { .. })
    ));
    assert!(matches!(
        store.insert(-1, Value::Int(1), Value::Null),
        Err(StorageError::OutOfRange { .. })
    ));
    assert!(matches!(
        store.delete(0, Value::Null, Value::Null),
        Err(StorageError::OutOfRange { .. })
    ));
}

// --- Invalid Value ---

#[test]
fn test_null_value_rejected() {
    let store = store_with(1);

    assert!(matches!(
        store.push_back(Value::Null, Value::Null, "m".into()),
        Err(StorageError::InvalidValue)
    ));
    assert!(matches!(
        store.push_front(Value::Null, Value::Null, Value::Null),
        Err(StorageError::InvalidValue)
    ));
    assert!(matches!(
        store.insert(0, Value::Null, Value::Null),
        Err(StorageError::InvalidValue)
    ));

    assert_eq!(store.record_count(), 1);
}

#[test]
fn test_value_checked_before_bounds() {
    let store = store_with(1);
    // Both invalid: the value check wins
    assert!(matches!(
        store.set(10, Value::Null, Value::Null),
        Err(StorageError::InvalidValue)
    ));
}

// --- Invalid Argument ---

#[test]
fn test_subscribe_out_of_range() {
    let store = store_with(3);
    let sink = Arc::new(|_: &StorageEvent| -> Result<(), SinkError> { Ok(()) });

    assert!(matches!(
        store.subscribe(sink.clone(), StartFrom::Index(3)),
        Err(StorageError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.subscribe(sink.clone(), StartFrom::Index(-4)),
        Err(StorageError::InvalidArgument(_))
    ));

    // Nothing was registered by the failed attempts
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_subscribe_negative_on_empty() {
    let store = test_store();
    let result = store.subscribe_channel(SubscriptionConfig {
        start: StartFrom::Index(-1),
        ..Default::default()
    });
    assert!(matches!(result, Err(StorageError::InvalidArgument(_))));
}

#[test]
fn test_malformed_start_specifier() {
    assert!(matches!(
        "first".parse::<StartFrom>(),
        Err(StorageError::InvalidArgument(_))
    ));
    assert!(matches!(
        "1.5".parse::<StartFrom>(),
        Err(StorageError::InvalidArgument(_))
    ));
}

#[test]
fn test_unsubscribe_unknown_cookie_is_noop() {
    init_tracing();
    let store = store_with(1);
    store.unsubscribe(vector_storage::Cookie(12345));
    assert_eq!(store.record_count(), 1);
}

// --- Unsupported ---

#[test]
fn test_query_not_implemented() {
    let store = store_with(2);
    assert!(matches!(
        store.query(&Value::from("x > 1")),
        Err(StorageError::NotImplemented(_))
    ));
}

#[test]
fn test_command_unsupported() {
    let store = test_store();
    let err = store.command("stats").unwrap_err();
    assert!(matches!(err, StorageError::Unsupported(_)));
    assert!(err.to_string().contains("stats"));
}

// --- Sink Failures ---

#[test]
fn test_panicking_sink_does_not_poison_store() {
    init_tracing();
    let store = test_store();
    store
        .subscribe(
            Arc::new(|_: &StorageEvent| -> Result<(), SinkError> { panic!("bad sink") }),
            StartFrom::Live,
        )
        .unwrap();

    let seen = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&seen);
    store
        .subscribe(
            Arc::new(move |_: &StorageEvent| -> Result<(), SinkError> {
                *counter.lock() += 1;
                Ok(())
            }),
            StartFrom::Live,
        )
        .unwrap();

    store.push_back(Value::Null, Value::Int(1), Value::Null).unwrap();
    store.push_back(Value::Null, Value::Int(2), Value::Null).unwrap();

    assert_eq!(*seen.lock(), 2);
    assert_eq!(store.record_count(), 2);
}
