// src/core/state/mod.rs

//! The explicit, owned server state, constructed once at start-up and
//! threaded through every handler. Nothing in the system is module-level
//! mutable state.

pub mod replication;

pub use replication::{ReplicaHandle, ReplicationState, SharedWriter};

use crate::config::Config;
use crate::core::storage::Store;
use crate::core::stream_blocking::StreamWaiterRegistry;
use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Per-client transaction state. Its presence in `ServerState::tx_states`
/// *is* the in-transaction flag; the queue holds the raw inbound frames in
/// arrival order.
#[derive(Debug, Default)]
pub struct TxnState {
    pub queued: VecDeque<Bytes>,
}

/// The single shared state of a running server.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    /// The store, owned by whichever task holds the lock. Mutations are
    /// non-yielding critical sections, so no task ever observes a
    /// mid-mutation store.
    pub store: Mutex<Store>,
    pub stream_waiters: StreamWaiterRegistry,
    /// In-flight transactions, keyed by session id.
    pub tx_states: DashMap<u64, TxnState>,
    pub replication: ReplicationState,
    next_session_id: AtomicU64,
}

impl ServerState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            store: Mutex::new(Store::new()),
            stream_waiters: StreamWaiterRegistry::new(),
            tx_states: DashMap::new(),
            replication: ReplicationState::new(),
            next_session_id: AtomicU64::new(0),
        })
    }

    /// The primary role is selected by the absence of a primary address.
    pub fn is_primary(&self) -> bool {
        self.config.replica_of.is_none()
    }

    pub fn next_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Everything a command needs while it runs: exclusive access to the store,
/// the shared state for wakeups and replication metadata, and the request
/// timestamp captured at read time.
pub struct ExecutionContext<'a> {
    pub store: &'a mut Store,
    pub state: &'a Arc<ServerState>,
    pub now_ms: u64,
    pub session_id: u64,
}
