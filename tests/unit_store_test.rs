use bytes::Bytes;
use citrinedb::core::storage::{DataValue, Store, ValueKind};

#[test]
fn set_then_get_within_ttl_returns_the_value() {
    let mut store = Store::new();
    store.set(
        Bytes::from_static(b"foo"),
        Bytes::from_static(b"bar"),
        1_000,
        Some(100),
    );
    let entry = store.get(b"foo", 1_050).unwrap();
    match &entry.data {
        DataValue::String(s) => assert_eq!(s, &Bytes::from_static(b"bar")),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn get_past_the_deadline_deletes_the_key() {
    let mut store = Store::new();
    store.set(
        Bytes::from_static(b"foo"),
        Bytes::from_static(b"bar"),
        1_000,
        Some(100),
    );
    assert!(store.get(b"foo", 1_200).is_none());
    assert!(!store.contains_key(b"foo"));
    // Subsequent reads at any time still miss.
    assert!(store.get(b"foo", 1_050).is_none());
}

#[test]
fn set_without_ttl_never_expires() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"k"), Bytes::from_static(b"v"), 0, None);
    assert!(store.get(b"k", u64::MAX).is_some());
}

#[test]
fn incr_counts_up_from_absent() {
    let mut store = Store::new();
    let key = Bytes::from_static(b"counter");
    for expected in 1..=10 {
        assert_eq!(store.incr(&key, 0).unwrap(), expected);
    }
    // The stored payload is the ascii encoding of the final value.
    match &store.get(b"counter", 0).unwrap().data {
        DataValue::String(s) => assert_eq!(s, &Bytes::from_static(b"10")),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn incr_parses_an_existing_integer_payload() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"n"), Bytes::from_static(b"41"), 0, None);
    assert_eq!(store.incr(&Bytes::from_static(b"n"), 0).unwrap(), 42);
}

#[test]
fn incr_rejects_non_integer_payloads() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"k"), Bytes::from_static(b"bar"), 0, None);
    let err = store.incr(&Bytes::from_static(b"k"), 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ERR value is not an integer or out of range"
    );
}

#[test]
fn kind_of_reports_string_stream_and_none() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"s"), Bytes::from_static(b"v"), 0, None);
    store
        .get_or_create_stream(&Bytes::from_static(b"events"), 0)
        .unwrap();

    assert_eq!(store.kind_of(b"s", 0), ValueKind::String);
    assert_eq!(store.kind_of(b"events", 0), ValueKind::Stream);
    assert_eq!(store.kind_of(b"missing", 0), ValueKind::None);
    assert_eq!(ValueKind::Stream.as_str(), "stream");
}

#[test]
fn kind_of_an_expired_key_is_none() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"k"), Bytes::from_static(b"v"), 0, Some(5));
    assert_eq!(store.kind_of(b"k", 100), ValueKind::None);
}

#[test]
fn stream_accessors_enforce_the_kind() {
    let mut store = Store::new();
    store.set(Bytes::from_static(b"k"), Bytes::from_static(b"v"), 0, None);
    assert!(store.get_stream(b"k", 0).is_err());
    assert!(
        store
            .get_or_create_stream(&Bytes::from_static(b"k"), 0)
            .is_err()
    );
    // Absent key: readable as no stream, creatable on demand.
    assert!(store.get_stream(b"nope", 0).unwrap().is_none());
    assert!(
        store
            .get_or_create_stream(&Bytes::from_static(b"nope"), 0)
            .is_ok()
    );
}
