// src/core/state/replication.rs

//! Contains state definitions related to replication.

use bytes::Bytes;
use dashmap::DashMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::tcp::OwnedWriteHalf;

/// The write half of a connection, shared between the connection's own
/// reply path and the primary's fan-out. Everything runs on one executor,
/// so the mutex only serializes whole-frame writes.
pub type SharedWriter = Arc<tokio::sync::Mutex<OwnedWriteHalf>>;

/// Runtime information about a replica connected to this primary.
#[derive(Debug)]
pub struct ReplicaHandle {
    pub addr: SocketAddr,
    pub writer: SharedWriter,
    /// Fan-out must not reach the socket before the snapshot's final byte.
    /// Until this flips, propagated frames park in `pending`.
    pub snapshot_sent: AtomicBool,
    pending: StdMutex<Vec<Bytes>>,
    /// The last replication offset the replica acknowledged.
    pub ack_offset: AtomicU64,
}

impl ReplicaHandle {
    pub fn new(addr: SocketAddr, writer: SharedWriter) -> Self {
        Self {
            addr,
            writer,
            snapshot_sent: AtomicBool::new(false),
            pending: StdMutex::new(Vec::new()),
            ack_offset: AtomicU64::new(0),
        }
    }

    /// Parks a frame that arrived while the snapshot was still in flight.
    pub fn queue_pending(&self, raw: Bytes) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(raw);
        }
    }

    /// Drains the frames parked during snapshot delivery, in arrival order.
    pub fn take_pending(&self) -> Vec<Bytes> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

/// The central struct holding all replication-related state for both roles.
#[derive(Debug)]
pub struct ReplicationState {
    /// This server's replication ID (40 ascii characters), announced in
    /// `INFO` and in the fullresync reply.
    pub replid: String,
    /// The primary's replication offset, advanced by every fanned-out byte.
    pub master_repl_offset: AtomicU64,
    /// Connected replicas, keyed by the session id of their connection.
    pub replicas: DashMap<u64, Arc<ReplicaHandle>>,
    /// Replica role: the running count of bytes consumed from the primary
    /// link, reported in `REPLCONF ACK`.
    pub replica_processed_bytes: AtomicU64,
}

impl ReplicationState {
    pub fn new() -> Self {
        Self {
            replid: generate_replid(),
            master_repl_offset: AtomicU64::new(0),
            replicas: DashMap::new(),
            replica_processed_bytes: AtomicU64::new(0),
        }
    }

    /// Registers (or returns) the replica handle for a session.
    pub fn register_replica(
        &self,
        session_id: u64,
        addr: SocketAddr,
        writer: SharedWriter,
    ) -> Arc<ReplicaHandle> {
        self.replicas
            .entry(session_id)
            .or_insert_with(|| Arc::new(ReplicaHandle::new(addr, writer)))
            .clone()
    }
}

impl Default for ReplicationState {
    fn default() -> Self {
        Self::new()
    }
}

/// A fresh 40-character alphanumeric replication ID.
fn generate_replid() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect()
}
