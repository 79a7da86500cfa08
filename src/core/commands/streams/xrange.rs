// src/core/commands/streams/xrange.rs

//! Implements the `XRANGE` command.
//!
//! `XRANGE key start end` — inclusive on both bounds. `-` is the minimum
//! ID, `+` the stream's current maximum. A bound without a sequence part
//! defaults to sequence 0 at the start and the maximum sequence at the end.

use super::encode_entry;
use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::StreamId;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `XRANGE` command with its bounds already resolved.
#[derive(Debug, Clone)]
pub struct XRange {
    pub key: Bytes,
    pub start: StreamId,
    pub end: StreamId,
}

fn parse_start(token: &str) -> Result<StreamId, CitrineError> {
    if token == "-" {
        return Ok(StreamId::ZERO);
    }
    StreamId::parse_with_default_seq(token, 0)
}

fn parse_end(token: &str) -> Result<StreamId, CitrineError> {
    if token == "+" {
        return Ok(StreamId::MAX);
    }
    StreamId::parse_with_default_seq(token, u32::MAX)
}

impl ParseCommand for XRange {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 3, "XRANGE")?;
        Ok(XRange {
            key: extract_bytes(&args[0])?,
            start: parse_start(&extract_string(&args[1])?)?,
            end: parse_end(&extract_string(&args[2])?)?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let entries = match ctx.store.get_stream(&self.key, ctx.now_ms)? {
            Some(stream) => stream
                .range(self.start, self.end)
                .into_iter()
                .map(encode_entry)
                .collect(),
            None => Vec::new(),
        };
        Ok((RespValue::Array(entries), WriteOutcome::DidNotWrite))
    }
}
