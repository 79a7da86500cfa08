// src/core/replication/mod.rs

//! Primary/replica replication: the fullresync bootstrap and the one-way
//! fan-out of raw write frames.

pub mod propagate;
pub mod worker;

use crate::core::CitrineError;
use crate::core::state::{ServerState, SharedWriter};
use bytes::BytesMut;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// The canonical empty snapshot: what a primary with no data serves during a
/// fullresync. The payload is opaque to both sides; replicas skip it by
/// length without decoding it.
const EMPTY_SNAPSHOT_HEX: &str = "524544495330303131fa0972656469732d76657205372e322e30fa0a72656469732d62697473c040fa056374696d65c26d08bc65fa08757365642d6d656dc2b0c41000fa08616f662d62617365c000fff06e3bfec0ff5aa2";

pub static EMPTY_SNAPSHOT: Lazy<Vec<u8>> =
    Lazy::new(|| hex::decode(EMPTY_SNAPSHOT_HEX).expect("empty snapshot constant is valid hex"));

/// Answers `PSYNC ? -1`: the `+FULLRESYNC` line, then the snapshot as a
/// length-prefixed frame with *no* trailing CRLF.
///
/// No command may be fanned out to this replica until the snapshot's final
/// byte is on the wire. The handle's `snapshot_sent` flag flips while the
/// writer is still held, and frames that queued up during the transfer are
/// flushed before the writer is released, so the wire order is always
/// snapshot, then backlog, then live propagation.
pub async fn send_fullresync(
    state: &Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
    writer: &SharedWriter,
) -> Result<(), CitrineError> {
    let handle = state
        .replication
        .register_replica(session_id, addr, writer.clone());

    let mut frame = BytesMut::new();
    frame.extend_from_slice(format!("+FULLRESYNC {} 0\r\n", state.replication.replid).as_bytes());
    frame.extend_from_slice(format!("${}\r\n", EMPTY_SNAPSHOT.len()).as_bytes());
    frame.extend_from_slice(&EMPTY_SNAPSHOT);

    let mut w = writer.lock().await;
    w.write_all(&frame).await?;
    handle.snapshot_sent.store(true, Ordering::SeqCst);
    for raw in handle.take_pending() {
        w.write_all(&raw).await?;
    }
    w.flush().await?;

    info!("Completed fullresync for replica {addr} (session {session_id})");
    Ok(())
}
