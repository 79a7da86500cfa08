// src/core/replication/worker.rs

//! Implements the replication logic for a replica server.
//!
//! The worker owns the replica's connection to its primary: the multi-step
//! handshake, the snapshot skip, and the live command stream. The handshake
//! runs synchronously at start-up — a mismatch there is a start-up
//! invariant violation and fatal — while stream processing runs as a
//! background task for the lifetime of the link.
//!
//! The primary may coalesce the snapshot and the first propagated commands
//! into one TCP segment, so every boundary here is byte-exact: the
//! fullresync line is parsed as a frame, the snapshot is skipped by its
//! length prefix, and whatever trails it is handed to the command stream
//! unconsumed.

use crate::core::clock;
use crate::core::protocol::{RespFrame, parse_frame, parse_frames};
use crate::core::state::{ExecutionContext, ServerState};
use crate::core::{CitrineError, Command, RespValue};
use bytes::{Buf, Bytes, BytesMut};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, error, info, warn};

/// The bootstrapped primary link: both socket halves plus whatever bytes
/// arrived after the snapshot in the same segment.
pub struct PrimaryLink {
    read_half: OwnedReadHalf,
    write_half: OwnedWriteHalf,
    buffered: BytesMut,
}

/// The main worker for a replica server.
pub struct ReplicaWorker {
    state: Arc<ServerState>,
}

impl ReplicaWorker {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    /// Performs the full handshake against the primary:
    /// `PING` → `PONG`, `REPLCONF listening-port`, `REPLCONF capa psync2`,
    /// then `PSYNC ? -1` and the snapshot skip. Every step is awaited in
    /// order; any mismatch fails the bootstrap.
    pub async fn bootstrap(&self, listen_port: u16) -> Result<PrimaryLink, CitrineError> {
        let Some(primary) = &self.state.config.replica_of else {
            return Err(CitrineError::Internal(
                "replica worker running without a primary address".to_string(),
            ));
        };

        info!("Connecting to primary at {}:{}", primary.host, primary.port);
        let stream = TcpStream::connect((primary.host.as_str(), primary.port))
            .await
            .map_err(|e| {
                CitrineError::ReplicationError(format!("failed to connect to primary: {e}"))
            })?;
        let (mut read_half, mut write_half) = stream.into_split();
        let mut buf = BytesMut::with_capacity(4096);

        send_command(&mut write_half, &["PING"]).await?;
        expect_simple(&mut read_half, &mut buf, "PONG").await?;

        let port_arg = listen_port.to_string();
        send_command(
            &mut write_half,
            &["REPLCONF", "listening-port", &port_arg],
        )
        .await?;
        expect_simple(&mut read_half, &mut buf, "OK").await?;

        send_command(&mut write_half, &["REPLCONF", "capa", "psync2"]).await?;
        expect_simple(&mut read_half, &mut buf, "OK").await?;

        send_command(&mut write_half, &["PSYNC", "?", "-1"]).await?;
        let (frame, len) = read_frame(&mut read_half, &mut buf).await?;
        buf.advance(len);
        match frame {
            RespFrame::SimpleString(s) if s.starts_with("FULLRESYNC") => {
                info!("Primary replied: {s}");
            }
            other => {
                return Err(CitrineError::ReplicationError(format!(
                    "unexpected PSYNC reply: {other:?}"
                )));
            }
        }

        skip_snapshot(&mut read_half, &mut buf).await?;
        info!("Fullresync bootstrap complete.");

        Ok(PrimaryLink {
            read_half,
            write_half,
            buffered: buf,
        })
    }

    /// Processes the live command stream until the link dies. Spawned as a
    /// background task after bootstrap.
    pub async fn run(self, link: PrimaryLink) {
        if let Err(e) = self.process_command_stream(link).await {
            error!("Replication link failed: {e}");
        }
    }

    async fn process_command_stream(&self, link: PrimaryLink) -> Result<(), CitrineError> {
        let PrimaryLink {
            mut read_half,
            mut write_half,
            buffered: mut buf,
        } = link;
        info!("Now in sync mode, processing command stream from primary.");

        loop {
            // Several commands may be coalesced in one read; apply them all,
            // then account the whole batch. A GETACK inside the batch acks
            // the total as of the previous batch.
            let parsed = parse_frames(&buf)?;
            if !parsed.is_empty() {
                let mut consumed = 0;
                for (frame, len) in &parsed {
                    self.apply_frame(frame, &mut write_half).await?;
                    consumed += len;
                }
                buf.advance(consumed);
                self.state
                    .replication
                    .replica_processed_bytes
                    .fetch_add(consumed as u64, Ordering::Relaxed);
            }

            if read_half.read_buf(&mut buf).await? == 0 {
                warn!("Primary closed the replication link.");
                return Ok(());
            }
        }
    }

    /// Applies one propagated frame. Writes execute as if from a local
    /// client but produce no reply; `REPLCONF GETACK` is answered on the
    /// primary link; anything else is ignored.
    async fn apply_frame(
        &self,
        frame: &RespFrame,
        write_half: &mut OwnedWriteHalf,
    ) -> Result<(), CitrineError> {
        let command = Command::try_from_frame(frame)?;
        debug!("Applying propagated command: {}", command.name());

        match &command {
            Command::Set(_) | Command::Incr(_) => {
                let now_ms = clock::now_unix_ms();
                let mut store = self.state.store.lock().await;
                let mut ctx = ExecutionContext {
                    store: &mut store,
                    state: &self.state,
                    now_ms,
                    session_id: 0,
                };
                if let Err(e) = command.execute(&mut ctx).await {
                    warn!("Failed to apply propagated {}: {e}", command.name());
                }
            }
            Command::Replconf(replconf) if replconf.is_getack() => {
                let processed = self
                    .state
                    .replication
                    .replica_processed_bytes
                    .load(Ordering::Relaxed);
                let ack = ack_frame(processed);
                write_half.write_all(&ack).await?;
                write_half.flush().await?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Encodes `REPLCONF ACK <processed>` as an array of bulk strings.
fn ack_frame(processed: u64) -> Vec<u8> {
    RespValue::Array(vec![
        RespValue::BulkString(Bytes::from_static(b"REPLCONF")),
        RespValue::BulkString(Bytes::from_static(b"ACK")),
        RespValue::BulkString(Bytes::from(processed.to_string())),
    ])
    .encode_to_vec()
}

/// Sends one command as an array of bulk strings.
async fn send_command(
    write_half: &mut OwnedWriteHalf,
    parts: &[&str],
) -> Result<(), CitrineError> {
    let value = RespValue::Array(
        parts
            .iter()
            .map(|part| RespValue::BulkString(Bytes::copy_from_slice(part.as_bytes())))
            .collect(),
    );
    write_half.write_all(&value.encode_to_vec()).await?;
    write_half.flush().await?;
    Ok(())
}

/// Reads until one full frame is buffered, returning it and its length.
/// The caller decides how much of the buffer to consume.
async fn read_frame(
    read_half: &mut OwnedReadHalf,
    buf: &mut BytesMut,
) -> Result<(RespFrame, usize), CitrineError> {
    loop {
        match parse_frame(buf) {
            Ok(parsed) => return Ok(parsed),
            Err(CitrineError::IncompleteData) => {
                if read_half.read_buf(buf).await? == 0 {
                    return Err(CitrineError::ReplicationError(
                        "primary closed the link mid-handshake".to_string(),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Asserts one handshake step: the next frame must be the expected simple
/// string.
async fn expect_simple(
    read_half: &mut OwnedReadHalf,
    buf: &mut BytesMut,
    expected: &str,
) -> Result<(), CitrineError> {
    let (frame, len) = read_frame(read_half, buf).await?;
    buf.advance(len);
    match frame {
        RespFrame::SimpleString(s) if s == expected => Ok(()),
        other => Err(CitrineError::ReplicationError(format!(
            "handshake expected +{expected}, got {other:?}"
        ))),
    }
}

/// Skips the snapshot frame: `$<n>\r\n` followed by exactly `n` raw bytes
/// and no trailing CRLF. Bytes after the snapshot stay in the buffer for
/// the command stream.
async fn skip_snapshot(
    read_half: &mut OwnedReadHalf,
    buf: &mut BytesMut,
) -> Result<(), CitrineError> {
    loop {
        if !buf.is_empty() && buf[0] != b'$' {
            return Err(CitrineError::ReplicationError(
                "snapshot frame missing length prefix".to_string(),
            ));
        }
        if let Some(pos) = buf.windows(2).position(|window| window == b"\r\n") {
            let length: usize = std::str::from_utf8(&buf[1..pos])
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    CitrineError::ReplicationError("invalid snapshot length".to_string())
                })?;
            let total = pos + 2 + length;
            while buf.len() < total {
                if read_half.read_buf(buf).await? == 0 {
                    return Err(CitrineError::ReplicationError(
                        "primary closed the link mid-snapshot".to_string(),
                    ));
                }
            }
            buf.advance(total);
            return Ok(());
        }
        if read_half.read_buf(buf).await? == 0 {
            return Err(CitrineError::ReplicationError(
                "primary closed the link before the snapshot".to_string(),
            ));
        }
    }
}
