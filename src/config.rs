// src/config.rs

//! Server configuration, built from the command line.
//!
//! The surface is deliberately small: `--port <u16>` and
//! `--replicaof "host port"`. Anything else is rejected with a usage error.

use crate::core::CitrineError;

/// The address of the primary a replica follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaOf {
    pub host: String,
    pub port: u16,
}

impl ReplicaOf {
    /// Parses the `"host port"` form of `--replicaof`.
    fn parse(value: &str) -> Result<Self, CitrineError> {
        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), None) => Ok(ReplicaOf {
                host: host.to_string(),
                port: port.parse().map_err(|_| {
                    CitrineError::InvalidArgument(format!("invalid primary port: {port}"))
                })?,
            }),
            _ => Err(CitrineError::InvalidArgument(format!(
                "--replicaof expects \"host port\", got \"{value}\""
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Present iff this instance runs as a replica.
    pub replica_of: Option<ReplicaOf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            replica_of: None,
        }
    }
}

impl Config {
    /// Builds a config from command-line arguments (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Config, CitrineError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--port" => {
                    let value = iter.next().ok_or_else(|| {
                        CitrineError::InvalidArgument("--port requires a value".to_string())
                    })?;
                    config.port = value.parse().map_err(|_| {
                        CitrineError::InvalidArgument(format!("invalid port number: {value}"))
                    })?;
                }
                "--replicaof" => {
                    let value = iter.next().ok_or_else(|| {
                        CitrineError::InvalidArgument("--replicaof requires a value".to_string())
                    })?;
                    config.replica_of = Some(ReplicaOf::parse(&value)?);
                }
                other => {
                    return Err(CitrineError::InvalidArgument(format!(
                        "unrecognized argument: {other}"
                    )));
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_primary_on_6379() {
        let config = Config::from_args(args(&[])).unwrap();
        assert_eq!(config.port, 6379);
        assert!(config.replica_of.is_none());
    }

    #[test]
    fn parses_port_and_replicaof() {
        let config =
            Config::from_args(args(&["--port", "7000", "--replicaof", "10.0.0.5 6379"])).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(
            config.replica_of,
            Some(ReplicaOf {
                host: "10.0.0.5".to_string(),
                port: 6379,
            })
        );
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(Config::from_args(args(&["--daemonize"])).is_err());
    }

    #[test]
    fn rejects_malformed_replicaof() {
        assert!(Config::from_args(args(&["--replicaof", "onlyhost"])).is_err());
        assert!(Config::from_args(args(&["--replicaof", "host notaport"])).is_err());
    }
}
