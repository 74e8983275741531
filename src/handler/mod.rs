//! Request handlers.
//!
//! Once a request has been parsed and its URI resolved to a path under the
//! root, [`dispatch`] inspects the path and hands it to exactly one responder:
//!
//! - **`browse`**: HTML listing of a directory
//! - **`cgi`**: runs an executable and forwards its standard output
//! - **`file`**: streams a readable file with a detected content type
//! - **`error`**: minimal HTML error page, always the last thing written
//!
//! Responders report failures that happen before anything has been written
//! as [`HandlerError::Status`]; the connection then answers with the error
//! page. Failures while writing to the client are [`HandlerError::Io`] and
//! simply end the connection.

pub mod browse;
pub mod cgi;
pub mod dispatch;
pub mod error;
pub mod file;

use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum HandlerError {
    /// Nothing has been sent yet; answer with this status
    Status(StatusCode),
    /// The client stream failed part way through a response
    Io(std::io::Error),
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::Status(status) => write!(f, "{}", status),
            HandlerError::Io(e) => write!(f, "client write failed: {}", e),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<std::io::Error> for HandlerError {
    fn from(e: std::io::Error) -> Self {
        HandlerError::Io(e)
    }
}

impl From<StatusCode> for HandlerError {
    fn from(status: StatusCode) -> Self {
        HandlerError::Status(status)
    }
}
