// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
///
/// Variants that have a fixed on-wire representation carry that exact text in
/// their `Display` impl, so an error frame is always
/// `RespValue::Error(e.to_string())`.
#[derive(Error, Debug)]
pub enum CitrineError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The input buffer ends before the current frame does. This is not a
    /// protocol violation; the caller should wait for more bytes.
    #[error("Incomplete data in stream")]
    IncompleteData,

    /// The input buffer cannot be a prefix of any well-formed frame.
    #[error("Protocol error: malformed frame")]
    MalformedFrame,

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR Invalid stream ID specified as stream command argument")]
    InvalidStreamId,

    #[error("ERR The ID specified in XADD must be greater than 0-0")]
    StreamIdTooSmall,

    #[error("ERR The ID specified in XADD is equal or smaller than the target stream top item")]
    StreamIdNotMonotonic,

    #[error("ERR MULTI calls can not be nested")]
    NestedMulti,

    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,

    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Replication Error: {0}")]
    ReplicationError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl CitrineError {
    /// Whether this error should tear down the connection rather than be
    /// reported to the client as an error frame.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            CitrineError::Io(_) | CitrineError::MalformedFrame | CitrineError::IncompleteData
        )
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for CitrineError {
    fn from(e: std::io::Error) -> Self {
        CitrineError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for CitrineError {
    fn from(_: ParseIntError) -> Self {
        CitrineError::NotAnInteger
    }
}
