use bytes::Bytes;
use citrinedb::config::Config;
use citrinedb::core::handler::transaction_handler;
use citrinedb::core::state::ServerState;
use citrinedb::core::{CitrineError, RespValue};

#[tokio::test]
async fn multi_opens_a_transaction_and_queues_raw_frames() {
    let state = ServerState::new(Config::default());
    let session = 1;

    assert!(!transaction_handler::is_active(&state, session));
    let reply = transaction_handler::begin(&state, session).unwrap();
    assert_eq!(reply, RespValue::SimpleString("OK".to_string()));
    assert!(transaction_handler::is_active(&state, session));

    let raw = Bytes::from_static(b"*3\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\n1\r\n");
    let reply = transaction_handler::enqueue(&state, session, raw.clone());
    assert_eq!(reply, RespValue::SimpleString("QUEUED".to_string()));

    let queued = transaction_handler::take_queue(&state, session).unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0], raw);
    // EXEC closed the transaction.
    assert!(!transaction_handler::is_active(&state, session));
}

#[tokio::test]
async fn nested_multi_is_an_error() {
    let state = ServerState::new(Config::default());
    transaction_handler::begin(&state, 1).unwrap();
    let err = transaction_handler::begin(&state, 1).unwrap_err();
    assert_eq!(err.to_string(), "ERR MULTI calls can not be nested");
}

#[tokio::test]
async fn discard_clears_the_queue() {
    let state = ServerState::new(Config::default());
    transaction_handler::begin(&state, 1).unwrap();
    transaction_handler::enqueue(&state, 1, Bytes::from_static(b"*1\r\n$4\r\nPING\r\n"));
    let reply = transaction_handler::discard(&state, 1).unwrap();
    assert_eq!(reply, RespValue::SimpleString("OK".to_string()));
    assert!(transaction_handler::take_queue(&state, 1).is_none());
}

#[tokio::test]
async fn exec_and_discard_without_multi_fail_with_wire_text() {
    let state = ServerState::new(Config::default());
    assert!(transaction_handler::take_queue(&state, 1).is_none());
    let err = transaction_handler::discard(&state, 1).unwrap_err();
    assert!(matches!(err, CitrineError::DiscardWithoutMulti));
    assert_eq!(err.to_string(), "ERR DISCARD without MULTI");
    assert_eq!(
        CitrineError::ExecWithoutMulti.to_string(),
        "ERR EXEC without MULTI"
    );
}

#[tokio::test]
async fn transactions_are_per_session() {
    let state = ServerState::new(Config::default());
    transaction_handler::begin(&state, 1).unwrap();
    assert!(!transaction_handler::is_active(&state, 2));
    transaction_handler::begin(&state, 2).unwrap();
    transaction_handler::discard(&state, 1).unwrap();
    assert!(transaction_handler::is_active(&state, 2));
}
