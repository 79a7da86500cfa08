// src/core/commands/string/get.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::DataValue;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `GET` command.
#[derive(Debug, Clone, Default)]
pub struct Get {
    pub key: Bytes,
}

impl ParseCommand for Get {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "GET")?;
        Ok(Get {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Get {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        // A miss and an expired entry are indistinguishable to the caller:
        // both are the null bulk reply.
        let value = match ctx.store.get(&self.key, ctx.now_ms) {
            None => RespValue::Null,
            Some(entry) => match &entry.data {
                DataValue::String(s) => RespValue::BulkString(s.clone()),
                DataValue::Stream(_) => return Err(CitrineError::WrongType),
            },
        };
        Ok((value, WriteOutcome::DidNotWrite))
    }
}
