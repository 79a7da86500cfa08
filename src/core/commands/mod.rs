// src/core/commands/mod.rs

//! Defines all supported commands and the central `Command` enum that
//! encapsulates their parsed state. Dispatch is by the ascii-uppercased
//! first token of the inbound array frame; anything unrecognized falls
//! through to `Unknown`, which replies `+PONG` exactly like the default arm
//! it is modeled on.

pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod streams;
pub mod string;

use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};

pub use generic::{Echo, Info, Ping, Psync, Replconf, TypeCmd};
pub use streams::{XAdd, XRange, XRead};
pub use string::{Get, Incr, Set};

/// A fully parsed client command.
#[derive(Debug, Clone)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    Get(Get),
    Set(Set),
    Type(TypeCmd),
    Incr(Incr),
    XAdd(XAdd),
    XRange(XRange),
    XRead(XRead),
    Multi,
    Exec,
    Discard,
    Info(Info),
    Replconf(Replconf),
    Psync(Psync),
    Unknown(String),
}

impl Command {
    /// Parses a command out of an inbound frame. A frame that is not an
    /// array of bulk strings, or whose verb is unrecognized, becomes
    /// `Unknown` rather than an error.
    pub fn try_from_frame(frame: &RespFrame) -> Result<Command, CitrineError> {
        let RespFrame::Array(items) = frame else {
            return Ok(Command::Unknown(String::new()));
        };
        let Some(RespFrame::BulkString(verb)) = items.first() else {
            return Ok(Command::Unknown(String::new()));
        };
        let name = String::from_utf8_lossy(verb).to_ascii_uppercase();
        let args = &items[1..];

        let command = match name.as_str() {
            "PING" => Command::Ping(Ping::parse(args)?),
            "ECHO" => Command::Echo(Echo::parse(args)?),
            "GET" => Command::Get(Get::parse(args)?),
            "SET" => Command::Set(Set::parse(args)?),
            "TYPE" => Command::Type(TypeCmd::parse(args)?),
            "INCR" => Command::Incr(Incr::parse(args)?),
            "XADD" => Command::XAdd(XAdd::parse(args)?),
            "XRANGE" => Command::XRange(XRange::parse(args)?),
            "XREAD" => Command::XRead(XRead::parse(args)?),
            "MULTI" => Command::Multi,
            "EXEC" => Command::Exec,
            "DISCARD" => Command::Discard,
            "INFO" => Command::Info(Info::parse(args)?),
            "REPLCONF" => Command::Replconf(Replconf::parse(args)?),
            "PSYNC" => Command::Psync(Psync::parse(args)?),
            _ => Command::Unknown(name),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping(_) => "ping",
            Command::Echo(_) => "echo",
            Command::Get(_) => "get",
            Command::Set(_) => "set",
            Command::Type(_) => "type",
            Command::Incr(_) => "incr",
            Command::XAdd(_) => "xadd",
            Command::XRange(_) => "xrange",
            Command::XRead(_) => "xread",
            Command::Multi => "multi",
            Command::Exec => "exec",
            Command::Discard => "discard",
            Command::Info(_) => "info",
            Command::Replconf(_) => "replconf",
            Command::Psync(_) => "psync",
            Command::Unknown(_) => "unknown",
        }
    }

    pub fn flags(&self) -> CommandFlags {
        match self {
            Command::Set(_) | Command::Incr(_) => CommandFlags::WRITE,
            // XADD mutates the store but is not in the propagated set.
            Command::XAdd(_) => CommandFlags::WRITE | CommandFlags::NO_PROPAGATE,
            Command::Multi | Command::Exec | Command::Discard => CommandFlags::TRANSACTION,
            Command::Replconf(_) | Command::Psync(_) => CommandFlags::REPLICATION,
            _ => CommandFlags::READONLY,
        }
    }

    /// Whether a successful execution of this command is fanned out to
    /// replicas byte-for-byte.
    pub fn is_propagated(&self) -> bool {
        let flags = self.flags();
        flags.contains(CommandFlags::WRITE) && !flags.contains(CommandFlags::NO_PROPAGATE)
    }

    /// Executes the command against the store. Transaction and replication
    /// verbs never reach this path; the router and connection handler own
    /// them.
    pub async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError> {
        match self {
            Command::Ping(cmd) => cmd.execute(ctx).await,
            Command::Echo(cmd) => cmd.execute(ctx).await,
            Command::Get(cmd) => cmd.execute(ctx).await,
            Command::Set(cmd) => cmd.execute(ctx).await,
            Command::Type(cmd) => cmd.execute(ctx).await,
            Command::Incr(cmd) => cmd.execute(ctx).await,
            Command::XAdd(cmd) => cmd.execute(ctx).await,
            Command::XRange(cmd) => cmd.execute(ctx).await,
            Command::XRead(cmd) => cmd.execute(ctx).await,
            Command::Info(cmd) => cmd.execute(ctx).await,
            // Bug-compatible default: an unrecognized verb is a PONG.
            Command::Unknown(_) => Ok((
                RespValue::SimpleString("PONG".to_string()),
                WriteOutcome::DidNotWrite,
            )),
            Command::Multi | Command::Exec | Command::Discard => Err(CitrineError::Internal(
                "transaction verbs are routed, not executed".to_string(),
            )),
            Command::Replconf(_) | Command::Psync(_) => Err(CitrineError::Internal(
                "replication verbs are routed, not executed".to_string(),
            )),
        }
    }
}
