use bytes::Bytes;
use citrinedb::core::commands::command_trait::ParseCommand;
use citrinedb::core::commands::streams::xadd::XAdd;
use citrinedb::core::protocol::RespFrame;
use citrinedb::core::storage::{IdSpec, StreamId};

fn bulk(bytes: &'static [u8]) -> RespFrame {
    RespFrame::BulkString(Bytes::from_static(bytes))
}

#[tokio::test]
async fn test_xadd_parse_auto_id() {
    let args = [bulk(b"events"), bulk(b"*"), bulk(b"sensor"), bulk(b"12")];
    let xadd_command = XAdd::parse(&args).unwrap();
    assert_eq!(xadd_command.key, Bytes::from_static(b"events"));
    assert_eq!(xadd_command.id_spec, IdSpec::Auto);
    assert_eq!(
        xadd_command.fields.get(&Bytes::from_static(b"sensor")),
        Some(&Bytes::from_static(b"12"))
    );
}

#[tokio::test]
async fn test_xadd_parse_explicit_and_wildcard_ids() {
    let args = [bulk(b"s"), bulk(b"5-3"), bulk(b"k"), bulk(b"v")];
    assert_eq!(
        XAdd::parse(&args).unwrap().id_spec,
        IdSpec::Exact(StreamId::new(5, 3))
    );

    let args = [bulk(b"s"), bulk(b"5-*"), bulk(b"k"), bulk(b"v")];
    assert_eq!(XAdd::parse(&args).unwrap().id_spec, IdSpec::AutoSeq(5));
}

#[tokio::test]
async fn test_xadd_parse_preserves_field_order() {
    let args = [
        bulk(b"s"),
        bulk(b"*"),
        bulk(b"b"),
        bulk(b"1"),
        bulk(b"a"),
        bulk(b"2"),
    ];
    let xadd_command = XAdd::parse(&args).unwrap();
    let keys: Vec<&Bytes> = xadd_command.fields.keys().collect();
    assert_eq!(keys, vec![&Bytes::from_static(b"b"), &Bytes::from_static(b"a")]);
}

#[tokio::test]
async fn test_xadd_parse_odd_field_count() {
    let args = [bulk(b"s"), bulk(b"*"), bulk(b"k"), bulk(b"v"), bulk(b"extra")];
    let err = XAdd::parse(&args).unwrap_err();
    assert!(format!("{:?}", err).contains("WrongArgumentCount"));
}

#[tokio::test]
async fn test_xadd_parse_no_fields() {
    let args = [bulk(b"s"), bulk(b"*")];
    let err = XAdd::parse(&args).unwrap_err();
    assert!(format!("{:?}", err).contains("WrongArgumentCount"));
}
