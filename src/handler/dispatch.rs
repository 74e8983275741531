use std::path::Path;

use nix::unistd::{access, AccessFlags};
use tokio::io::AsyncWrite;

use crate::config::Config;
use crate::handler::{browse, cgi, file, HandlerError};
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// Which responder a resolved path is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Browse,
    Cgi,
    File,
}

/// Picks a responder from the filesystem attributes of `path`.
///
/// Checked in order: directory, executable by this process, readable by
/// this process. An executable file is always run, never served. Anything
/// else, including a path whose metadata cannot be read, is `NotFound`.
pub async fn route(path: &Path) -> Result<Route, StatusCode> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| StatusCode::NotFound)?;

    if metadata.is_dir() {
        Ok(Route::Browse)
    } else if access(path, AccessFlags::X_OK).is_ok() {
        Ok(Route::Cgi)
    } else if access(path, AccessFlags::R_OK).is_ok() {
        Ok(Route::File)
    } else {
        Err(StatusCode::NotFound)
    }
}

/// Routes a resolved request and runs the chosen responder.
///
/// Never writes to `stream` itself; only the responder does.
pub async fn dispatch<W>(
    request: &Request,
    cfg: &Config,
    stream: &mut W,
) -> Result<StatusCode, HandlerError>
where
    W: AsyncWrite + Unpin,
{
    let path = request
        .path
        .as_deref()
        .ok_or(HandlerError::Status(StatusCode::NotFound))?;

    let route = route(path).await?;
    tracing::debug!(path = %path.display(), route = ?route, "Dispatching request");

    match route {
        Route::Browse => browse::respond(request, path, stream).await,
        Route::Cgi => cgi::respond(request, path, cfg, stream).await,
        Route::File => file::respond(path, cfg, stream).await,
    }
}
