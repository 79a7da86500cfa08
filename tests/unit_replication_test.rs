use bytes::Bytes;
use citrinedb::core::commands::command_trait::ParseCommand;
use citrinedb::core::commands::generic::psync::Psync;
use citrinedb::core::commands::generic::replconf::Replconf;
use citrinedb::core::protocol::RespFrame;
use citrinedb::core::replication::EMPTY_SNAPSHOT;

fn bulk(bytes: &'static [u8]) -> RespFrame {
    RespFrame::BulkString(Bytes::from_static(bytes))
}

#[test]
fn empty_snapshot_constant_shape() {
    assert_eq!(EMPTY_SNAPSHOT.len(), 88);
    assert!(EMPTY_SNAPSHOT.starts_with(b"REDIS0011"));
    // EOF opcode, then an 8-byte checksum closes the payload.
    assert_eq!(EMPTY_SNAPSHOT[88 - 9], 0xff);
}

#[tokio::test]
async fn test_psync_parse_valid_args() {
    let args = [bulk(b"?"), bulk(b"-1")];
    let psync_command = Psync::parse(&args).unwrap();
    assert_eq!(psync_command.replication_id, "?");
    assert_eq!(psync_command.offset, "-1");
}

#[tokio::test]
async fn test_psync_parse_wrong_arity() {
    let args = [bulk(b"?")];
    let err = Psync::parse(&args).unwrap_err();
    assert!(format!("{:?}", err).contains("WrongArgumentCount"));
}

#[tokio::test]
async fn test_replconf_parse_subcommands() {
    let args = [bulk(b"listening-port"), bulk(b"6380")];
    let replconf = Replconf::parse(&args).unwrap();
    assert!(!replconf.is_ack());
    assert!(!replconf.is_getack());

    let args = [bulk(b"GETACK"), bulk(b"*")];
    assert!(Replconf::parse(&args).unwrap().is_getack());

    // Subcommand matching ignores case, as the original propagates it.
    let args = [bulk(b"ack"), bulk(b"154")];
    let replconf = Replconf::parse(&args).unwrap();
    assert!(replconf.is_ack());
    assert_eq!(replconf.ack_offset().unwrap(), 154);
}

#[tokio::test]
async fn test_replconf_ack_offset_must_be_numeric() {
    let args = [bulk(b"ACK"), bulk(b"lots")];
    assert!(Replconf::parse(&args).unwrap().ack_offset().is_err());
}
