// src/core/commands/streams/xadd.rs

//! Implements the `XADD` command for appending entries to a stream.
//!
//! # Command Syntax
//! `XADD key <* | ms-* | ms-seq> field value [field value ...]`
//!
//! On success the reply is a bulk string with the (possibly server-assigned)
//! ID of the new entry. The stream is created on first append and every
//! successful append wakes the blocked `XREAD` clients watching the key.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::IdSpec;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

/// Represents the `XADD` command.
#[derive(Debug, Clone)]
pub struct XAdd {
    pub key: Bytes,
    pub id_spec: IdSpec,
    pub fields: IndexMap<Bytes, Bytes>,
}

impl ParseCommand for XAdd {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 4 || (args.len() - 2) % 2 != 0 {
            return Err(CitrineError::WrongArgumentCount("xadd".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let id_spec = extract_string(&args[1])?.parse()?;
        let fields = args[2..]
            .chunks_exact(2)
            .map(|chunk| Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?)))
            .collect::<Result<_, CitrineError>>()?;
        Ok(XAdd {
            key,
            id_spec,
            fields,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XAdd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        let stream = ctx.store.get_or_create_stream(&self.key, ctx.now_ms)?;
        let id = stream.append(self.id_spec, self.fields.clone(), ctx.now_ms)?;

        // Wake any blocked XREAD clients watching this stream.
        ctx.state.stream_waiters.notify(&self.key);

        Ok((
            RespValue::BulkString(id.to_string().into()),
            WriteOutcome::Write,
        ))
    }
}
