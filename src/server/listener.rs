use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

use crate::config::{Config, Mode};
use crate::http::connection::Connection;

/// Binds `cfg.listen_addr` and serves connections until the task is dropped.
pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;

    serve(listener, cfg).await
}

/// Accept loop over an already bound listener.
///
/// `cfg.listen_addr` is replaced by the address actually bound, so a
/// configured port of `0` is reported to CGI scripts as the real port.
///
/// In `concurrent` mode every connection gets its own task, so a slow or
/// panicking worker never holds up the loop or other connections. There is
/// no cap on the number of in-flight workers. In `single` mode connections
/// are handled one after another on the loop itself.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    let local = listener.local_addr().context("reading bound address")?;
    let cfg = bound_to(cfg, local);
    info!("Listening on {}", local);
    info!(root = %cfg.root.display(), mode = ?cfg.mode, "Serving");

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        match cfg.mode {
            Mode::Single => handle(socket, peer, cfg.clone()).await,
            Mode::Concurrent => {
                tokio::spawn(handle(socket, peer, cfg.clone()));
            }
        }
    }
}

fn bound_to(cfg: Arc<Config>, local: SocketAddr) -> Arc<Config> {
    if cfg.listen_addr == local.to_string() {
        return cfg;
    }
    Arc::new(Config {
        listen_addr: local.to_string(),
        ..(*cfg).clone()
    })
}

async fn handle(socket: TcpStream, peer: SocketAddr, cfg: Arc<Config>) {
    let conn = Connection::new(socket, peer, cfg);
    if let Err(e) = conn.run().await {
        tracing::error!("Connection error from {}: {:#}", peer, e);
    }
}
