use bytes::Bytes;
use citrinedb::core::CitrineError;
use citrinedb::core::commands::command_trait::ParseCommand;
use citrinedb::core::commands::string::set::Set;
use citrinedb::core::protocol::RespFrame;

fn bulk(bytes: &'static [u8]) -> RespFrame {
    RespFrame::BulkString(Bytes::from_static(bytes))
}

#[tokio::test]
async fn test_set_parse_key_value() {
    let args = [bulk(b"mykey"), bulk(b"myvalue")];
    let set_command = Set::parse(&args).unwrap();
    assert_eq!(set_command.key, Bytes::from_static(b"mykey"));
    assert_eq!(set_command.value, Bytes::from_static(b"myvalue"));
    assert_eq!(set_command.ttl_ms, None);
}

#[tokio::test]
async fn test_set_parse_with_px() {
    let args = [bulk(b"mykey"), bulk(b"myvalue"), bulk(b"PX"), bulk(b"100")];
    let set_command = Set::parse(&args).unwrap();
    assert_eq!(set_command.ttl_ms, Some(100));
}

#[tokio::test]
async fn test_set_parse_px_is_case_insensitive() {
    let args = [bulk(b"k"), bulk(b"v"), bulk(b"px"), bulk(b"250")];
    assert_eq!(Set::parse(&args).unwrap().ttl_ms, Some(250));
}

#[tokio::test]
async fn test_set_parse_unknown_option() {
    let args = [bulk(b"k"), bulk(b"v"), bulk(b"EX"), bulk(b"10")];
    let err = Set::parse(&args).unwrap_err();
    assert!(matches!(err, CitrineError::SyntaxError));
}

#[tokio::test]
async fn test_set_parse_non_numeric_ttl() {
    let args = [bulk(b"k"), bulk(b"v"), bulk(b"PX"), bulk(b"soon")];
    let err = Set::parse(&args).unwrap_err();
    assert!(matches!(err, CitrineError::NotAnInteger));
}

#[tokio::test]
async fn test_set_parse_too_few_args() {
    let args = [bulk(b"k")];
    let err = Set::parse(&args).unwrap_err();
    assert!(format!("{:?}", err).contains("WrongArgumentCount"));
}
