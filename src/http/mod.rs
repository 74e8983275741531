//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.0 side of the server: one request per
//! connection, no keep-alive, end of body signalled by closing the socket.
//!
//! # Architecture
//!
//! - **`connection`**: Drives a single connection through the pipeline below
//! - **`parser`**: Reads the request line and headers from a buffered stream
//! - **`request`**: Request and header representation
//! - **`path`**: Resolves a request URI to a canonical path under the root
//! - **`response`**: Status codes and in-memory responses
//! - **`writer`**: Serializes responses and streams bodies to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection Pipeline
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line and headers
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Map URI onto the root
//!        └──────┬───────────┘
//!               │ Path inside root
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Browse / CGI / File responder
//!        └──────┬───────────┘
//!               │
//!               ├─ Any stage fails → Failed → error page
//!               ▼
//!        ┌──────────────────┐
//!        │      Closed      │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use porch::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = std::sync::Arc::new(porch::config::Config::load()?);
//!     let listener = TcpListener::bind("127.0.0.1:9898").await?;
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let cfg = cfg.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, peer, cfg).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
