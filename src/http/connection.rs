use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::Config;
use crate::handler::{HandlerError, dispatch, error};
use crate::http::parser::parse_request;
use crate::http::path;
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// One client connection, carrying exactly one request.
pub struct Connection<S> {
    stream: BufReader<S>,
    peer: SocketAddr,
    config: Arc<Config>,
    state: ConnectionState,
}

/// Pipeline stages, run strictly in order.
pub enum ConnectionState {
    Reading,
    Resolving(Request),
    Dispatching(Request),
    /// A stage failed before anything was written; carries the request
    /// once it has been parsed
    Failed(StatusCode, Option<Request>),
    Closed(StatusCode),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            peer,
            config,
            state: ConnectionState::Reading,
        }
    }

    /// Runs parse, resolve, dispatch and respond, then closes the stream.
    ///
    /// Returns the status that was sent. An error means the client stream
    /// itself failed and the response may be incomplete.
    pub async fn run(mut self) -> anyhow::Result<StatusCode> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Reading) {
                ConnectionState::Reading => match parse_request(&mut self.stream).await {
                    Ok(mut request) => {
                        request.host = self.peer.ip().to_string();
                        request.port = self.peer.port().to_string();
                        tracing::debug!(
                            peer = %self.peer,
                            method = %request.method,
                            uri = %request.uri,
                            query = %request.query,
                            headers = request.headers.len(),
                            "Parsed request"
                        );
                        ConnectionState::Resolving(request)
                    }
                    Err(e) => {
                        tracing::debug!(peer = %self.peer, error = %e, "Bad request");
                        ConnectionState::Failed(e.status(), None)
                    }
                },

                ConnectionState::Resolving(mut request) => {
                    match path::resolve(&self.config.root, &request.uri).await {
                        Ok(resolved) => {
                            tracing::debug!(uri = %request.uri, path = %resolved.display(), "Resolved path");
                            request.path = Some(resolved);
                            ConnectionState::Dispatching(request)
                        }
                        Err(e) => {
                            tracing::debug!(uri = %request.uri, error = %e, "Path resolution failed");
                            ConnectionState::Failed(e.status(), Some(request))
                        }
                    }
                }

                ConnectionState::Dispatching(request) => {
                    let outcome =
                        dispatch::dispatch(&request, &self.config, self.stream.get_mut()).await;
                    match outcome {
                        Ok(status) => {
                            tracing::info!(
                                peer = %self.peer,
                                method = %request.method,
                                uri = %request.uri,
                                status = %status,
                                "Request handled"
                            );
                            ConnectionState::Closed(status)
                        }
                        Err(HandlerError::Status(status)) => {
                            ConnectionState::Failed(status, Some(request))
                        }
                        Err(HandlerError::Io(e)) => {
                            return Err(e).with_context(|| {
                                format!("writing response for {} {}", request.method, request.uri)
                            });
                        }
                    }
                }

                ConnectionState::Failed(status, request) => {
                    error::respond(status, self.stream.get_mut())
                        .await
                        .context("writing error response")?;
                    match request {
                        Some(request) => tracing::info!(
                            peer = %self.peer,
                            method = %request.method,
                            uri = %request.uri,
                            status = %status,
                            "Request failed"
                        ),
                        None => tracing::info!(peer = %self.peer, status = %status, "Request failed"),
                    }
                    ConnectionState::Closed(status)
                }

                ConnectionState::Closed(status) => {
                    // Best effort: the peer may already have gone.
                    let _ = self.stream.get_mut().shutdown().await;
                    return Ok(status);
                }
            };
        }
    }
}
