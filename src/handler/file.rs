use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWrite;

use crate::config::Config;
use crate::handler::HandlerError;
use crate::http::mime::MimeResolver;
use crate::http::response::{ResponseBuilder, StatusCode};
use crate::http::writer::{stream_body, ResponseWriter};

/// Streams the file at `path` with a `Content-Type` from the mime mapping.
///
/// There is no `Content-Length`; closing the connection ends the body.
pub async fn respond<W>(path: &Path, cfg: &Config, stream: &mut W) -> Result<StatusCode, HandlerError>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(path).await.map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "Cannot open file");
        HandlerError::Status(StatusCode::NotFound)
    })?;

    let mime = MimeResolver::from_config(cfg).lookup(path).await;
    tracing::debug!(path = %path.display(), mime = %mime, "Serving file");

    let head = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", mime)
        .head();
    ResponseWriter::new(&head).write_to_stream(stream).await?;

    let sent = stream_body(&mut file, stream).await?;
    tracing::trace!(path = %path.display(), bytes = sent, "File sent");

    Ok(StatusCode::Ok)
}
