//! CGI execution.
//!
//! The script runs with a cleared environment holding only the CGI
//! variables (plus the server's `PATH`). Its standard input is closed and its
//! standard output is copied to the client byte for byte, headers included;
//! the script is responsible for writing its own status line.
//!
//! No timeout is applied: a script that never exits keeps its connection
//! open for as long as it runs.

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWrite;
use tokio::process::Command;

use crate::config::Config;
use crate::handler::HandlerError;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::stream_body;

/// Inbound headers exported to the script, and the variable each becomes.
pub const HEADER_VARS: [(&str, &str); 6] = [
    ("Host", "HTTP_HOST"),
    ("Accept", "HTTP_ACCEPT"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Connection", "HTTP_CONNECTION"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

/// Environment for running `script` on behalf of `request`.
///
/// Header-derived variables appear once per matching header, in arrival
/// order, so for duplicated headers the last one wins when applied.
pub fn environment(request: &Request, script: &Path, cfg: &Config) -> Vec<(&'static str, String)> {
    let mut env = vec![
        ("DOCUMENT_ROOT", cfg.root.display().to_string()),
        ("QUERY_STRING", request.query.clone()),
        ("REMOTE_ADDR", request.host.clone()),
        ("REMOTE_PORT", request.port.clone()),
        ("REQUEST_METHOD", request.method.clone()),
        ("REQUEST_URI", request.uri.clone()),
        ("SCRIPT_FILENAME", script.display().to_string()),
        ("SERVER_PORT", cfg.port().to_string()),
    ];

    for header in &request.headers {
        for (name, var) in HEADER_VARS {
            if header.name == name {
                env.push((var, header.value.clone()));
            }
        }
    }

    env
}

/// Runs `script` and forwards its standard output to `stream`.
pub async fn respond<W>(
    request: &Request,
    script: &Path,
    cfg: &Config,
    stream: &mut W,
) -> Result<StatusCode, HandlerError>
where
    W: AsyncWrite + Unpin,
{
    let mut cmd = Command::new(script);
    cmd.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    cmd.envs(environment(request, script, cfg));
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|e| {
        tracing::warn!(script = %script.display(), error = %e, "Failed to start CGI script");
        HandlerError::Status(StatusCode::InternalServerError)
    })?;

    let mut output = child
        .stdout
        .take()
        .ok_or(HandlerError::Status(StatusCode::InternalServerError))?;

    let copied = stream_body(&mut output, stream).await;

    // Close our end first so a script still writing sees a broken pipe
    // instead of blocking forever when the client has gone away.
    drop(output);

    match child.wait().await {
        Ok(exit) if !exit.success() => {
            tracing::warn!(script = %script.display(), status = %exit, "CGI script exited unsuccessfully");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(script = %script.display(), error = %e, "Failed to wait for CGI script");
        }
    }

    let sent = copied?;
    tracing::trace!(script = %script.display(), bytes = sent, "CGI output forwarded");

    Ok(StatusCode::Ok)
}
