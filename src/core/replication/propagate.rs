// src/core/replication/propagate.rs

//! Primary-side fan-out of raw write-command frames.

use crate::core::state::{ReplicaHandle, ServerState};
use bytes::Bytes;
use futures::future;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::warn;

/// Fans the exact inbound frame bytes of a write command out to every
/// registered replica, in parallel. Writes are best-effort: a replica whose
/// socket fails is dropped from the set.
pub async fn propagate_write(state: &Arc<ServerState>, raw: &Bytes) {
    if !state.is_primary() {
        return;
    }
    let replication = &state.replication;
    replication
        .master_repl_offset
        .fetch_add(raw.len() as u64, Ordering::Relaxed);

    if replication.replicas.is_empty() {
        return;
    }

    // Snapshot the handle set first; writing happens without holding any
    // map entry.
    let targets: Vec<(u64, Arc<ReplicaHandle>)> = replication
        .replicas
        .iter()
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();

    let writes = targets.into_iter().map(|(session_id, handle)| {
        let raw = raw.clone();
        async move {
            // A replica mid-fullresync gets the frame after its snapshot.
            if !handle.snapshot_sent.load(Ordering::SeqCst) {
                handle.queue_pending(raw);
                return (session_id, Ok(()));
            }
            let mut writer = handle.writer.lock().await;
            let result: std::io::Result<()> = async {
                use tokio::io::AsyncWriteExt;
                writer.write_all(&raw).await?;
                writer.flush().await
            }
            .await;
            (session_id, result)
        }
    });

    for (session_id, result) in future::join_all(writes).await {
        if let Err(e) = result {
            warn!("Dropping replica session {session_id} after failed propagation: {e}");
            replication.replicas.remove(&session_id);
        }
    }
}
