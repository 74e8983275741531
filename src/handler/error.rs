use tokio::io::AsyncWrite;

use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Writes the HTML error page for `status` and returns `status`.
pub async fn respond<W>(status: StatusCode, stream: &mut W) -> std::io::Result<StatusCode>
where
    W: AsyncWrite + Unpin,
{
    let response = Response::error_page(status);
    ResponseWriter::new(&response).write_to_stream(stream).await?;
    Ok(status)
}
