// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bitflags::bitflags;

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommandFlags: u32 {
        /// The command modifies the dataset.
        const WRITE        = 1 << 0;
        /// The command only reads data.
        const READONLY     = 1 << 1;
        /// The command must not be propagated to replicas even though it writes.
        const NO_PROPAGATE = 1 << 2;
        /// A transaction verb (`MULTI`, `EXEC`, `DISCARD`); never queued.
        const TRANSACTION  = 1 << 3;
        /// A replication-control command handled outside the normal store path.
        const REPLICATION  = 1 << 4;
    }
}

/// Whether a command actually modified the store, which gates replica
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    DidNotWrite,
    Write,
}

/// The execution logic of a command. Implemented by each command's struct.
#[async_trait]
pub trait ExecutableCommand {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), CitrineError>;
}

/// Parsing a command's arguments from the elements of the inbound array
/// frame (the verb itself excluded).
pub trait ParseCommand: Sized {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError>;
}
