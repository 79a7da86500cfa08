// src/core/handler/transaction_handler.rs

//! MULTI/EXEC/DISCARD state transitions.
//!
//! A transaction is a per-client flag plus a FIFO of raw inbound frames.
//! While the flag is set, every command except the transaction verbs is
//! queued unexecuted and acknowledged with `QUEUED`. No atomicity or
//! isolation is promised across the drained commands; `EXEC` replays them
//! as if the client had submitted them sequentially.

use crate::core::state::{ServerState, TxnState};
use crate::core::{CitrineError, RespValue};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Arc;

/// Whether the session currently has an open transaction.
pub fn is_active(state: &Arc<ServerState>, session_id: u64) -> bool {
    state.tx_states.contains_key(&session_id)
}

/// `MULTI`: opens a transaction for the session.
pub fn begin(state: &Arc<ServerState>, session_id: u64) -> Result<RespValue, CitrineError> {
    if is_active(state, session_id) {
        return Err(CitrineError::NestedMulti);
    }
    state.tx_states.insert(session_id, TxnState::default());
    Ok(RespValue::SimpleString("OK".to_string()))
}

/// Queues the raw frame of a command received inside a transaction.
pub fn enqueue(state: &Arc<ServerState>, session_id: u64, raw: Bytes) -> RespValue {
    if let Some(mut txn) = state.tx_states.get_mut(&session_id) {
        txn.queued.push_back(raw);
    }
    RespValue::SimpleString("QUEUED".to_string())
}

/// `DISCARD`: drops the transaction and its queue.
pub fn discard(state: &Arc<ServerState>, session_id: u64) -> Result<RespValue, CitrineError> {
    if state.tx_states.remove(&session_id).is_none() {
        return Err(CitrineError::DiscardWithoutMulti);
    }
    Ok(RespValue::SimpleString("OK".to_string()))
}

/// `EXEC`: closes the transaction and hands back the queue for replay.
pub fn take_queue(state: &Arc<ServerState>, session_id: u64) -> Option<VecDeque<Bytes>> {
    state
        .tx_states
        .remove(&session_id)
        .map(|(_, txn)| txn.queued)
}
