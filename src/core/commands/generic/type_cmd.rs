// src/core/commands/generic/type_cmd.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `TYPE` command. Replies with the kind tag as a simple
/// string: `string`, `stream`, or `none` for an absent or expired key.
#[derive(Debug, Clone, Default)]
pub struct TypeCmd {
    pub key: Bytes,
}

impl ParseCommand for TypeCmd {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "TYPE")?;
        Ok(TypeCmd {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for TypeCmd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let kind = ctx.store.kind_of(&self.key, ctx.now_ms);
        Ok((
            RespValue::SimpleString(kind.as_str().to_string()),
            WriteOutcome::DidNotWrite,
        ))
    }
}
