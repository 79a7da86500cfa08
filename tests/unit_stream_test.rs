use bytes::Bytes;
use citrinedb::core::storage::{IdSpec, Stream, StreamId};
use indexmap::IndexMap;

fn fields(pairs: &[(&'static [u8], &'static [u8])]) -> IndexMap<Bytes, Bytes> {
    pairs
        .iter()
        .map(|(k, v)| (Bytes::from_static(k), Bytes::from_static(v)))
        .collect()
}

#[test]
fn id_wire_form_roundtrips() {
    let id: StreamId = "1526919030474-55".parse().unwrap();
    assert_eq!(id, StreamId::new(1526919030474, 55));
    assert_eq!(id.to_string(), "1526919030474-55");
}

#[test]
fn ids_order_numerically_not_lexicographically() {
    // "10" sorts before "2" as text; as a pair it must not.
    assert!(StreamId::new(2, 0) < StreamId::new(10, 0));
    assert!(StreamId::new(5, 2) < StreamId::new(5, 10));
}

#[test]
fn id_spec_parses_all_three_forms() {
    assert_eq!("*".parse::<IdSpec>().unwrap(), IdSpec::Auto);
    assert_eq!("7-*".parse::<IdSpec>().unwrap(), IdSpec::AutoSeq(7));
    assert_eq!(
        "7-3".parse::<IdSpec>().unwrap(),
        IdSpec::Exact(StreamId::new(7, 3))
    );
    assert!("garbage".parse::<IdSpec>().is_err());
}

#[test]
fn wildcard_seq_against_fresh_milliseconds() {
    let mut stream = Stream::new();
    assert_eq!(
        stream.append(IdSpec::AutoSeq(0), fields(&[(b"k", b"v")]), 99).unwrap(),
        StreamId::new(0, 1)
    );
    assert_eq!(
        stream.append(IdSpec::AutoSeq(1), fields(&[(b"k", b"v")]), 99).unwrap(),
        StreamId::new(1, 0)
    );
    assert_eq!(
        stream.append(IdSpec::AutoSeq(1), fields(&[(b"k", b"v")]), 99).unwrap(),
        StreamId::new(1, 1)
    );
}

#[test]
fn auto_id_uses_the_request_clock() {
    let mut stream = Stream::new();
    let id = stream
        .append(IdSpec::Auto, fields(&[(b"k", b"v")]), 123_456)
        .unwrap();
    assert_eq!(id, StreamId::new(123_456, 0));
    // Same millisecond: the sequence advances.
    let id = stream
        .append(IdSpec::Auto, fields(&[(b"k", b"v")]), 123_456)
        .unwrap();
    assert_eq!(id, StreamId::new(123_456, 1));
}

#[test]
fn successful_appends_emit_strictly_increasing_ids() {
    let mut stream = Stream::new();
    let mut last = StreamId::ZERO;
    for spec in [
        IdSpec::Exact(StreamId::new(1, 1)),
        IdSpec::AutoSeq(1),
        IdSpec::Exact(StreamId::new(3, 0)),
        IdSpec::AutoSeq(3),
        IdSpec::Auto,
    ] {
        let id = stream.append(spec, fields(&[(b"k", b"v")]), 50).unwrap();
        assert!(id > last);
        last = id;
    }
    assert_eq!(stream.last_id(), last);
}

#[test]
fn rejects_zero_and_non_monotonic_ids() {
    let mut stream = Stream::new();
    let err = stream
        .append(IdSpec::Exact(StreamId::ZERO), fields(&[(b"k", b"v")]), 0)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "ERR The ID specified in XADD must be greater than 0-0"
    );

    stream
        .append(IdSpec::Exact(StreamId::new(5, 5)), fields(&[(b"k", b"v")]), 0)
        .unwrap();
    for bad in [StreamId::new(5, 5), StreamId::new(5, 4), StreamId::new(4, 9)] {
        let err = stream
            .append(IdSpec::Exact(bad), fields(&[(b"k", b"v")]), 0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERR The ID specified in XADD is equal or smaller than the target stream top item"
        );
    }
    // Failed appends leave the stream untouched.
    assert_eq!(stream.len(), 1);
}

#[test]
fn range_covers_wildcard_entries_in_order_with_fields_intact() {
    let mut stream = Stream::new();
    stream.append(IdSpec::AutoSeq(0), fields(&[(b"k", b"v")]), 0).unwrap();
    stream.append(IdSpec::AutoSeq(1), fields(&[(b"k", b"v2")]), 0).unwrap();

    let entries = stream.range(StreamId::ZERO, StreamId::MAX);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, StreamId::new(0, 1));
    assert_eq!(entries[1].id, StreamId::new(1, 0));
    assert_eq!(
        entries[1].fields.get(&Bytes::from_static(b"k")),
        Some(&Bytes::from_static(b"v2"))
    );
}

#[test]
fn half_id_bounds_default_seq_0_at_start_and_max_at_end() {
    let mut stream = Stream::new();
    for (ms, seq) in [(1, 0), (1, 7), (2, 0), (2, 3), (3, 0)] {
        stream
            .append(IdSpec::Exact(StreamId::new(ms, seq)), fields(&[(b"k", b"v")]), 0)
            .unwrap();
    }
    // start "1" → 1-0, end "2" → 2-u32::MAX.
    let start = StreamId::parse_with_default_seq("1", 0).unwrap();
    let end = StreamId::parse_with_default_seq("2", u32::MAX).unwrap();
    let ids: Vec<StreamId> = stream.range(start, end).iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![
            StreamId::new(1, 0),
            StreamId::new(1, 7),
            StreamId::new(2, 0),
            StreamId::new(2, 3),
        ]
    );
}

#[test]
fn entries_after_excludes_the_bound_and_reads_to_the_tail() {
    let mut stream = Stream::new();
    for seq in 0..3 {
        stream
            .append(IdSpec::Exact(StreamId::new(9, seq)), fields(&[(b"k", b"v")]), 0)
            .unwrap();
    }
    let ids: Vec<StreamId> = stream
        .entries_after(StreamId::new(9, 0))
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![StreamId::new(9, 1), StreamId::new(9, 2)]);
    assert!(stream.entries_after(StreamId::new(9, 2)).is_empty());
}
