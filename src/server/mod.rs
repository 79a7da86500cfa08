// src/server/mod.rs

//! The listener: binds, optionally bootstraps the replica role, and accepts
//! connections forever.

use crate::config::Config;
use crate::connection::ConnectionHandler;
use crate::core::replication::worker::ReplicaWorker;
use crate::core::state::ServerState;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// A bound, not-yet-running server. Splitting bind from run lets tests bind
/// port 0 and discover the assigned port before clients connect.
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Server> {
        let state = ServerState::new(config);
        let listener =
            TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(Server { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the server. A replica bootstraps against its primary *before*
    /// the accept loop starts: the handshake is a start-up invariant, and a
    /// failure there is fatal.
    pub async fn run(self) -> Result<()> {
        if !self.state.is_primary() {
            let listen_port = self.listener.local_addr()?.port();
            let worker = ReplicaWorker::new(self.state.clone());
            let link = worker.bootstrap(listen_port).await?;
            tokio::spawn(worker.run(link));
        }

        loop {
            let (socket, addr) = self.listener.accept().await?;
            debug!("Accepted connection from {addr}");
            let handler = ConnectionHandler::new(socket, addr, self.state.clone());
            tokio::spawn(handler.run());
        }
    }
}

/// The main server startup function.
pub async fn run(config: Config) -> Result<()> {
    Server::bind(config).await?.run().await
}
