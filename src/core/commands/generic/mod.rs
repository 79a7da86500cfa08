// src/core/commands/generic/mod.rs

pub mod echo;
pub mod info;
pub mod ping;
pub mod psync;
pub mod replconf;
pub mod type_cmd;

pub use echo::Echo;
pub use info::Info;
pub use ping::Ping;
pub use psync::Psync;
pub use replconf::Replconf;
pub use type_cmd::TypeCmd;
