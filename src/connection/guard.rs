// src/connection/guard.rs

//! A drop guard that evicts everything a session left behind.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Cleans up per-session state when the connection ends, however it ends:
/// transaction queue, blocked-XREAD wakers, and replica registration.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
}

impl ConnectionGuard {
    pub fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.state.tx_states.remove(&self.session_id).is_some() {
            debug!("Discarded lingering transaction for client {}", self.addr);
        }
        self.state.stream_waiters.remove_session(self.session_id);
        if self
            .state
            .replication
            .replicas
            .remove(&self.session_id)
            .is_some()
        {
            debug!("Deregistered replica {}", self.addr);
        }
    }
}
