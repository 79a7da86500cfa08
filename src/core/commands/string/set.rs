// src/core/commands/string/set.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `SET` command: `SET key value [PX milliseconds]`.
#[derive(Debug, Clone, Default)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub ttl_ms: Option<u64>,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 2 {
            return Err(CitrineError::WrongArgumentCount("set".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let value = extract_bytes(&args[1])?;
        let ttl_ms = match args.len() {
            2 => None,
            4 => {
                if !extract_string(&args[2])?.eq_ignore_ascii_case("px") {
                    return Err(CitrineError::SyntaxError);
                }
                Some(extract_string(&args[3])?.parse::<u64>()?)
            }
            _ => return Err(CitrineError::SyntaxError),
        };
        Ok(Set { key, value, ttl_ms })
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        // The expiry deadline is anchored to the request receive time, not
        // the moment the write lands.
        ctx.store
            .set(self.key.clone(), self.value.clone(), ctx.now_ms, self.ttl_ms);
        Ok((
            RespValue::SimpleString("OK".to_string()),
            WriteOutcome::Write,
        ))
    }
}
