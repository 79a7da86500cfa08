use citrinedb::config::{Config, ReplicaOf};
use citrinedb::core::commands::command_trait::ExecutableCommand;
use citrinedb::core::commands::generic::info::Info;
use citrinedb::core::state::{ExecutionContext, ServerState};
use citrinedb::core::RespValue;

#[tokio::test]
async fn primary_info_lists_role_offset_and_replid() {
    let state = ServerState::new(Config::default());
    let mut store = state.store.lock().await;
    let mut ctx = ExecutionContext {
        store: &mut store,
        state: &state,
        now_ms: 0,
        session_id: 1,
    };
    let (value, _) = Info.execute(&mut ctx).await.unwrap();
    let RespValue::Map(pairs) = value else {
        panic!("expected a map reply");
    };
    assert_eq!(pairs[0], ("role".to_string(), "master".to_string()));
    assert_eq!(pairs[1].0, "master_repl_offset");
    assert_eq!(pairs[1].1, "0");
    assert_eq!(pairs[2].0, "master_replid");
    assert_eq!(pairs[2].1.len(), 40);
}

#[tokio::test]
async fn replica_info_is_just_the_role() {
    let mut config = Config::default();
    config.replica_of = Some(ReplicaOf {
        host: "127.0.0.1".to_string(),
        port: 6379,
    });
    let state = ServerState::new(config);
    let mut store = state.store.lock().await;
    let mut ctx = ExecutionContext {
        store: &mut store,
        state: &state,
        now_ms: 0,
        session_id: 1,
    };
    let (value, _) = Info.execute(&mut ctx).await.unwrap();
    assert_eq!(
        value,
        RespValue::Map(vec![("role".to_string(), "slave".to_string())])
    );
}

#[tokio::test]
async fn info_map_wire_shape() {
    let value = RespValue::Map(vec![("role".to_string(), "slave".to_string())]);
    assert_eq!(value.encode_to_vec(), b"$10\r\nrole:slave\r\n");
}
