// src/main.rs

//! The main entry point for the CitrineDB server.

use anyhow::Result;
use citrinedb::config::Config;
use citrinedb::server;
use std::env;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;

// All connections, blocked readers, and the replica link share one
// cooperative executor; store mutations are plain critical sections between
// awaits.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: citrinedb [--port <port>] [--replicaof \"<host> <port>\"]");
            std::process::exit(1);
        }
    };

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }
    Ok(())
}
