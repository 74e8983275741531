use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::request::{split_target, Header, Request};
use crate::http::response::StatusCode;

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8192;

#[derive(Debug)]
pub enum ParseError {
    /// Stream ended before a request line arrived
    MissingRequestLine,
    /// Request line lacks a method or request-target
    InvalidRequestLine,
    /// Header line without a `:`
    InvalidHeader,
    LineTooLong,
    InvalidEncoding,
    Io(std::io::Error),
}

impl ParseError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BadRequest
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingRequestLine => write!(f, "no request line"),
            ParseError::InvalidRequestLine => write!(f, "malformed request line"),
            ParseError::InvalidHeader => write!(f, "malformed header line"),
            ParseError::LineTooLong => write!(f, "line exceeds {} bytes", MAX_LINE_LEN),
            ParseError::InvalidEncoding => write!(f, "line is not valid UTF-8"),
            ParseError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Reads one request (request line plus headers) from `reader`.
///
/// Only the method and request-target of the request line are consulted;
/// the version token is ignored. Headers are read until a blank line or the
/// end of the stream. Peer fields and `path` are left for the caller.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(256);

    let line = read_line(reader, &mut buf)
        .await?
        .ok_or(ParseError::MissingRequestLine)?;

    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let target = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let (uri, query) = split_target(target);
    if uri.is_empty() {
        return Err(ParseError::InvalidRequestLine);
    }

    let mut request = Request {
        method: method.to_string(),
        uri: uri.to_string(),
        query: query.to_string(),
        ..Request::default()
    };

    while let Some(line) = read_line(reader, &mut buf).await? {
        if line.is_empty() {
            break;
        }

        let (name, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        request.headers.push(Header::new(name, value.trim_start()));
    }

    Ok(request)
}

/// Reads a single line, bounded by `MAX_LINE_LEN`, with the terminator
/// stripped. Returns `None` at end of stream.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }
    if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') {
        return Err(ParseError::LineTooLong);
    }

    let line = std::str::from_utf8(&buf[..]).map_err(|_| ParseError::InvalidEncoding)?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
