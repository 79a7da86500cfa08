// src/core/commands/streams/xread.rs

//! Implements the `XREAD` command, including the blocking form.
//!
//! `XREAD [BLOCK ms] STREAMS key [key ...] id [id ...]` — a tail read,
//! exclusive on the given IDs. Without `BLOCK`, an empty result is the null
//! bulk reply. With `BLOCK`, the dispatcher first reads synchronously; if
//! nothing is available it parks on the watched streams' wakeups until an
//! append signals one of them or the timeout elapses (0 = wait forever).
//! After a wakeup only the signalled streams are re-read.

use super::encode_entry;
use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::state::{ExecutionContext, ServerState};
use crate::core::storage::{Store, StreamId};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Represents the `XREAD` command.
#[derive(Debug, Clone)]
pub struct XRead {
    pub block_ms: Option<u64>,
    pub keys: Vec<Bytes>,
    pub starts: Vec<StreamId>,
}

impl ParseCommand for XRead {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let mut i = 0;
        let mut block_ms = None;

        if i < args.len() && extract_string(&args[i])?.eq_ignore_ascii_case("block") {
            let ttl = extract_string(args.get(i + 1).ok_or(CitrineError::SyntaxError)?)?;
            block_ms = Some(ttl.parse::<u64>()?);
            i += 2;
        }

        if i >= args.len() || !extract_string(&args[i])?.eq_ignore_ascii_case("streams") {
            return Err(CitrineError::SyntaxError);
        }
        i += 1;

        let rest = &args[i..];
        if rest.is_empty() || rest.len() % 2 != 0 {
            return Err(CitrineError::WrongArgumentCount("xread".to_string()));
        }
        let (key_args, start_args) = rest.split_at(rest.len() / 2);
        let keys = key_args
            .iter()
            .map(extract_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        let starts = start_args
            .iter()
            .map(|arg| StreamId::parse_with_default_seq(&extract_string(arg)?, 0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(XRead {
            block_ms,
            keys,
            starts,
        })
    }
}

impl XRead {
    /// One synchronous pass over the watched streams. Returns `None` when
    /// every stream's tail is empty; otherwise the full reply, which carries
    /// a `[stream, entries]` pair for every queried stream.
    fn read_tails(&self, store: &mut Store, now_ms: u64) -> Result<Option<RespValue>, CitrineError> {
        let mut per_stream = Vec::with_capacity(self.keys.len());
        let mut found = false;
        for (key, after) in self.keys.iter().zip(&self.starts) {
            let entries: Vec<RespValue> = match store.get_stream(key, now_ms)? {
                Some(stream) => stream
                    .entries_after(*after)
                    .into_iter()
                    .map(encode_entry)
                    .collect(),
                None => Vec::new(),
            };
            found |= !entries.is_empty();
            per_stream.push(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                RespValue::Array(entries),
            ]));
        }
        Ok(found.then(|| RespValue::Array(per_stream)))
    }

    /// The blocking form. Coordinates with the waiter registry: wakers are
    /// registered while the store lock is still held so an append cannot
    /// slip between the empty read and the registration, and they are
    /// removed however the wait ends.
    pub async fn execute_blocking(
        &self,
        state: &Arc<ServerState>,
        now_ms: u64,
        session_id: u64,
    ) -> Result<RespValue, CitrineError> {
        let Some(block_ms) = self.block_ms else {
            return Err(CitrineError::Internal(
                "execute_blocking requires a BLOCK option".to_string(),
            ));
        };

        let mut registration = {
            let mut store = state.store.lock().await;
            if let Some(reply) = self.read_tails(&mut store, now_ms)? {
                return Ok(reply);
            }
            state.stream_waiters.register(&self.keys, session_id)
            // The store lock drops here; from now on an append finds our wakers.
        };

        let receivers = std::mem::take(&mut registration.receivers);
        let outcome = if block_ms == 0 {
            await_any(receivers).await
        } else {
            match tokio::time::timeout(Duration::from_millis(block_ms), await_any(receivers)).await
            {
                Ok(outcome) => outcome,
                Err(_) => None,
            }
        };
        state.stream_waiters.remove(&registration);

        let Some((first, mut rest)) = outcome else {
            return Ok(RespValue::Null);
        };
        let mut signalled = vec![first];
        for receiver in rest.iter_mut() {
            if let Ok(key) = receiver.try_recv() {
                signalled.push(key);
            }
        }

        // Re-run the tail read against the signalled streams only.
        let mut store = state.store.lock().await;
        let mut per_stream = Vec::with_capacity(signalled.len());
        let mut found = false;
        for (key, after) in self.keys.iter().zip(&self.starts) {
            if !signalled.contains(key) {
                continue;
            }
            let entries: Vec<RespValue> = match store.get_stream(key, now_ms)? {
                Some(stream) => stream
                    .entries_after(*after)
                    .into_iter()
                    .map(encode_entry)
                    .collect(),
                None => Vec::new(),
            };
            found |= !entries.is_empty();
            per_stream.push(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                RespValue::Array(entries),
            ]));
        }
        if found {
            Ok(RespValue::Array(per_stream))
        } else {
            Ok(RespValue::Null)
        }
    }
}

/// Waits until any receiver yields its stream name, returning it together
/// with the still-pending receivers (so additionally-signalled streams can
/// be drained without waiting).
async fn await_any(
    mut receivers: Vec<oneshot::Receiver<Bytes>>,
) -> Option<(Bytes, Vec<oneshot::Receiver<Bytes>>)> {
    while !receivers.is_empty() {
        let (result, _, rest) = futures::future::select_all(receivers).await;
        match result {
            Ok(key) => return Some((key, rest)),
            // A dropped waker is not a signal; keep waiting on the rest.
            Err(_) => receivers = rest,
        }
    }
    None
}

#[async_trait]
impl ExecutableCommand for XRead {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let reply = self
            .read_tails(ctx.store, ctx.now_ms)?
            .unwrap_or(RespValue::Null);
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}
