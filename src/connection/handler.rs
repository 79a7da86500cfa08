// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a
//! client connection: read → timestamp → dispatch → write → flush.

use super::guard::ConnectionGuard;
use crate::core::handler::{RouteResponse, Router, transaction_handler};
use crate::core::protocol::{DecodedFrame, RespFrameCodec};
use crate::core::state::{ServerState, SharedWriter};
use crate::core::{CitrineError, Command, RespValue, clock, replication};
use bytes::BytesMut;
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::Mutex;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

/// Manages the full lifecycle of a client connection.
///
/// The socket is split: frames come in through a framed reader, replies go
/// out through a writer handle that the replication engine can share when
/// this connection turns out to be a replica.
pub struct ConnectionHandler {
    reader: FramedRead<OwnedReadHalf, RespFrameCodec>,
    writer: SharedWriter,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
}

impl ConnectionHandler {
    pub fn new(socket: TcpStream, addr: SocketAddr, state: Arc<ServerState>) -> Self {
        let session_id = state.next_session_id();
        let (read_half, write_half) = socket.into_split();
        Self {
            reader: FramedRead::new(read_half, RespFrameCodec),
            writer: Arc::new(Mutex::new(write_half)),
            addr,
            state,
            session_id,
        }
    }

    /// The main event loop for the connection.
    pub async fn run(mut self) {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        loop {
            match self.reader.next().await {
                Some(Ok(decoded)) => {
                    // Stamp the request clock once, at read time; expiry
                    // decisions downstream all use this instant.
                    let now_ms = clock::now_unix_ms();
                    if let Err(e) = self.process_frame(decoded, now_ms).await {
                        warn!("Connection error for {}: {e}", self.addr);
                        break;
                    }
                }
                Some(Err(e)) => {
                    if matches!(&e, CitrineError::Io(io) if is_normal_disconnect(io)) {
                        debug!("Connection from {} closed by peer: {e}", self.addr);
                    } else {
                        warn!("Dropping connection from {}: {e}", self.addr);
                    }
                    break;
                }
                None => {
                    debug!("Connection from {} closed by peer.", self.addr);
                    break;
                }
            }
        }
    }

    /// Parses one frame into a command, routes it, and writes the reply.
    async fn process_frame(
        &mut self,
        decoded: DecodedFrame,
        now_ms: u64,
    ) -> Result<(), CitrineError> {
        let command = match Command::try_from_frame(&decoded.frame) {
            Ok(command) => command,
            // Argument-level parse failures are the client's problem, not
            // the connection's. Inside a transaction even an unparseable
            // command is queued raw; its error surfaces when EXEC replays it.
            Err(e) if !e.is_connection_fatal() => {
                if transaction_handler::is_active(&self.state, self.session_id) {
                    let reply = transaction_handler::enqueue(
                        &self.state,
                        self.session_id,
                        decoded.raw.clone(),
                    );
                    return self.send(&reply).await;
                }
                return self.send(&RespValue::Error(e.to_string())).await;
            }
            Err(e) => return Err(e),
        };
        debug!("Session {}: received {}", self.session_id, command.name());

        // PSYNC switches the connection to snapshot delivery and replica
        // registration; it never goes through the router.
        if let Command::Psync(_) = command {
            return replication::send_fullresync(
                &self.state,
                self.session_id,
                self.addr,
                &self.writer,
            )
            .await;
        }

        let mut router = Router::new(
            &self.state,
            self.session_id,
            self.addr,
            &self.writer,
            now_ms,
        );
        match router.route(command, &decoded.raw).await {
            Ok(RouteResponse::Single(value)) => self.send(&value).await,
            Ok(RouteResponse::NoOp) => Ok(()),
            Err(e) if !e.is_connection_fatal() => {
                self.send(&RespValue::Error(e.to_string())).await
            }
            Err(e) => Err(e),
        }
    }

    /// Serializes one reply and writes it through the shared writer.
    async fn send(&self, value: &RespValue) -> Result<(), CitrineError> {
        let mut buf = BytesMut::new();
        value.encode(&mut buf);
        let mut writer = self.writer.lock().await;
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    )
}
