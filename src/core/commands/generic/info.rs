// src/core/commands/generic/info.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use std::sync::atomic::Ordering;

/// Represents the `INFO` command. The reply is the replication section,
/// encoded as a single bulk string of `key:value` lines.
#[derive(Debug, Clone, Default)]
pub struct Info;

impl ParseCommand for Info {
    fn parse(_args: &[RespFrame]) -> Result<Self, CitrineError> {
        // A section argument (e.g. `INFO replication`) is accepted; the
        // replication section is all there is.
        Ok(Info)
    }
}

#[async_trait]
impl ExecutableCommand for Info {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let replication = &ctx.state.replication;
        let pairs = if ctx.state.is_primary() {
            vec![
                ("role".to_string(), "master".to_string()),
                (
                    "master_repl_offset".to_string(),
                    replication
                        .master_repl_offset
                        .load(Ordering::Relaxed)
                        .to_string(),
                ),
                ("master_replid".to_string(), replication.replid.clone()),
            ]
        } else {
            vec![("role".to_string(), "slave".to_string())]
        };
        Ok((RespValue::Map(pairs), WriteOutcome::DidNotWrite))
    }
}
