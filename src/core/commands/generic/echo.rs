// src/core/commands/generic/echo.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::extract_bytes;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `ECHO` command. All arguments are echoed back as one bulk
/// string, joined with single space bytes.
#[derive(Debug, Clone, Default)]
pub struct Echo {
    pub parts: Vec<Bytes>,
}

impl ParseCommand for Echo {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let parts = args.iter().map(extract_bytes).collect::<Result<_, _>>()?;
        Ok(Echo { parts })
    }
}

#[async_trait]
impl ExecutableCommand for Echo {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let mut joined = Vec::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                joined.push(b' ');
            }
            joined.extend_from_slice(part);
        }
        Ok((
            RespValue::BulkString(Bytes::from(joined)),
            WriteOutcome::DidNotWrite,
        ))
    }
}
