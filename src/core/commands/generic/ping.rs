// src/core/commands/generic/ping.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;

/// Represents the `PING` command. Arguments are accepted and ignored.
#[derive(Debug, Clone, Default)]
pub struct Ping;

impl ParseCommand for Ping {
    fn parse(_args: &[RespFrame]) -> Result<Self, CitrineError> {
        Ok(Ping)
    }
}

#[async_trait]
impl ExecutableCommand for Ping {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        Ok((
            RespValue::SimpleString("PONG".to_string()),
            WriteOutcome::DidNotWrite,
        ))
    }
}
