// src/core/commands/generic/replconf.rs

use crate::core::CitrineError;
use crate::core::commands::command_trait::ParseCommand;
use crate::core::commands::helpers::extract_bytes;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Represents the `REPLCONF` command.
///
/// On the primary, `listening-port`/`capa` register the connection as a
/// replica and reply `+OK`, while `ACK <offset>` records the replica's
/// progress and produces no reply. On the replica's primary link,
/// `GETACK *` triggers an `ACK` response. The router and the replica worker
/// own that behavior; this type only carries the parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct Replconf {
    pub args: Vec<Bytes>,
}

impl Replconf {
    fn subcommand_is(&self, name: &str) -> bool {
        self.args
            .first()
            .is_some_and(|arg| arg.eq_ignore_ascii_case(name.as_bytes()))
    }

    /// `REPLCONF ACK <offset>` — a replica reporting processed bytes.
    pub fn is_ack(&self) -> bool {
        self.subcommand_is("ack")
    }

    /// `REPLCONF GETACK *` — the primary asking for an offset report.
    pub fn is_getack(&self) -> bool {
        self.subcommand_is("getack")
    }

    /// The offset argument of an `ACK`.
    pub fn ack_offset(&self) -> Result<u64, CitrineError> {
        let arg = self.args.get(1).ok_or_else(|| {
            CitrineError::WrongArgumentCount("replconf".to_string())
        })?;
        std::str::from_utf8(arg)
            .map_err(|_| CitrineError::NotAnInteger)?
            .parse()
            .map_err(|_| CitrineError::NotAnInteger)
    }
}

impl ParseCommand for Replconf {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.is_empty() {
            return Err(CitrineError::WrongArgumentCount("replconf".to_string()));
        }
        let args = args.iter().map(extract_bytes).collect::<Result<_, _>>()?;
        Ok(Replconf { args })
    }
}
