// src/core/handler/command_router.rs

//! The central component for routing parsed commands to their handlers.
//!
//! The `Router` receives a parsed `Command` together with the exact inbound
//! frame bytes. It applies transaction queueing, dispatches execution
//! against the store, and hands the raw bytes of replicated writes to the
//! fan-out path — in that order, so propagation across clients follows
//! local execution order.

use super::transaction_handler;
use crate::core::commands::command_trait::{CommandFlags, WriteOutcome};
use crate::core::protocol::parse_frame;
use crate::core::replication::propagate;
use crate::core::state::{ExecutionContext, ServerState, SharedWriter};
use crate::core::{CitrineError, Command, RespValue};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

/// The response shapes a routed command can produce.
pub enum RouteResponse {
    /// A single RESP value; the common case.
    Single(RespValue),
    /// No reply at all (a replica's `REPLCONF ACK` on the primary).
    NoOp,
}

/// Routes one command for one session.
pub struct Router<'a> {
    state: &'a Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
    writer: &'a SharedWriter,
    now_ms: u64,
}

impl<'a> Router<'a> {
    pub fn new(
        state: &'a Arc<ServerState>,
        session_id: u64,
        addr: SocketAddr,
        writer: &'a SharedWriter,
        now_ms: u64,
    ) -> Self {
        Self {
            state,
            session_id,
            addr,
            writer,
            now_ms,
        }
    }

    /// The main entry point for routing a command.
    pub async fn route(
        &mut self,
        command: Command,
        raw: &Bytes,
    ) -> Result<RouteResponse, CitrineError> {
        debug!("Session {}: routing {}", self.session_id, command.name());

        // An open transaction swallows everything but the transaction verbs.
        if transaction_handler::is_active(self.state, self.session_id)
            && !command.flags().contains(CommandFlags::TRANSACTION)
        {
            let reply = transaction_handler::enqueue(self.state, self.session_id, raw.clone());
            return Ok(RouteResponse::Single(reply));
        }

        match command {
            Command::Multi => {
                transaction_handler::begin(self.state, self.session_id).map(RouteResponse::Single)
            }
            Command::Discard => {
                transaction_handler::discard(self.state, self.session_id).map(RouteResponse::Single)
            }
            Command::Exec => self.exec_transaction().await,
            Command::Replconf(cmd) => self.handle_replconf(&cmd),
            Command::XRead(cmd) if cmd.block_ms.is_some() => cmd
                .execute_blocking(self.state, self.now_ms, self.session_id)
                .await
                .map(RouteResponse::Single),
            other => self
                .dispatch_one(&other, raw)
                .await
                .map(RouteResponse::Single),
        }
    }

    /// Executes one command against the store and, when it is a replicated
    /// write that succeeded, fans the original frame bytes out.
    async fn dispatch_one(
        &mut self,
        command: &Command,
        raw: &Bytes,
    ) -> Result<RespValue, CitrineError> {
        let (value, outcome) = {
            let mut store = self.state.store.lock().await;
            let mut ctx = ExecutionContext {
                store: &mut store,
                state: self.state,
                now_ms: self.now_ms,
                session_id: self.session_id,
            };
            command.execute(&mut ctx).await?
        };

        if outcome == WriteOutcome::Write && command.is_propagated() {
            propagate::propagate_write(self.state, raw).await;
        }
        Ok(value)
    }

    /// `EXEC`: drains the queue, replays every frame through the normal
    /// dispatch path, and returns the replies pre-encoded under one array
    /// header.
    async fn exec_transaction(&mut self) -> Result<RouteResponse, CitrineError> {
        let Some(queued) = transaction_handler::take_queue(self.state, self.session_id) else {
            return Err(CitrineError::ExecWithoutMulti);
        };

        let mut replies = Vec::with_capacity(queued.len());
        for raw in queued {
            let reply = self.replay_frame(&raw).await;
            replies.push(RespValue::Verbatim(reply.encode_to_bytes()));
        }
        Ok(RouteResponse::Single(RespValue::Array(replies)))
    }

    /// Replays one queued frame. Per-command failures become error frames in
    /// the EXEC reply array; they do not abort the drain.
    async fn replay_frame(&mut self, raw: &Bytes) -> RespValue {
        let command = match parse_frame(raw) {
            Ok((frame, _)) => Command::try_from_frame(&frame),
            Err(e) => Err(e),
        };
        match command {
            Ok(command) => match self.dispatch_one(&command, raw).await {
                Ok(value) => value,
                Err(e) => RespValue::Error(e.to_string()),
            },
            Err(e) => RespValue::Error(e.to_string()),
        }
    }

    /// `REPLCONF` on the primary: `ACK` records the replica's progress and
    /// stays silent; everything else registers the connection's writer for
    /// fan-out and replies `+OK`.
    fn handle_replconf(
        &mut self,
        cmd: &crate::core::commands::Replconf,
    ) -> Result<RouteResponse, CitrineError> {
        if cmd.is_ack() {
            let offset = cmd.ack_offset()?;
            if let Some(handle) = self.state.replication.replicas.get(&self.session_id) {
                handle.ack_offset.store(offset, Ordering::Relaxed);
                debug!(
                    "Replica {} acknowledged offset {}",
                    handle.addr, offset
                );
            }
            return Ok(RouteResponse::NoOp);
        }

        self.state
            .replication
            .register_replica(self.session_id, self.addr, self.writer.clone());
        info!(
            "Registered replica writer for {} (session {})",
            self.addr, self.session_id
        );
        Ok(RouteResponse::Single(RespValue::SimpleString(
            "OK".to_string(),
        )))
    }
}
