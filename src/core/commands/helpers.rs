// src/core/commands/helpers.rs

//! Small parsing helpers shared by the command implementations.

use crate::core::CitrineError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Extracts the payload of a bulk-string argument.
pub fn extract_bytes(frame: &RespFrame) -> Result<Bytes, CitrineError> {
    match frame {
        RespFrame::BulkString(b) => Ok(b.clone()),
        _ => Err(CitrineError::WrongType),
    }
}

/// Extracts a bulk-string argument as text.
pub fn extract_string(frame: &RespFrame) -> Result<String, CitrineError> {
    let bytes = extract_bytes(frame)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| CitrineError::WrongType)
}

/// Fails with the canonical arity error unless exactly `expected` arguments
/// are present.
pub fn validate_arg_count(
    args: &[RespFrame],
    expected: usize,
    command_name: &str,
) -> Result<(), CitrineError> {
    if args.len() != expected {
        return Err(CitrineError::WrongArgumentCount(
            command_name.to_lowercase(),
        ));
    }
    Ok(())
}
