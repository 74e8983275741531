use std::path::Path;

use tokio::io::AsyncWrite;

use crate::handler::HandlerError;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;

/// Writes an HTML list of the entries in directory `path`.
///
/// Entries are sorted; neither `.` nor `..` is listed, nor any name that is
/// not valid UTF-8. Links are `uri + "/" + name`, except under `/` where
/// they are `"/" + name`.
pub async fn respond<W>(
    request: &Request,
    path: &Path,
    stream: &mut W,
) -> Result<StatusCode, HandlerError>
where
    W: AsyncWrite + Unpin,
{
    let names = list_entries(path).await.map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "Cannot list directory");
        HandlerError::Status(StatusCode::NotFound)
    })?;

    let response = listing(&request.uri, &names);
    ResponseWriter::new(&response).write_to_stream(stream).await?;

    Ok(StatusCode::Ok)
}

async fn list_entries(path: &Path) -> std::io::Result<Vec<String>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut names = Vec::new();

    // read_dir never yields `.` or `..`. Names that are not UTF-8 are left
    // out: request lines must be UTF-8, so no link to them could be followed.
    while let Some(entry) = dir.next_entry().await? {
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => {
                tracing::debug!(dir = %path.display(), name = ?name, "Skipping non UTF-8 entry");
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Builds the listing page for `names` (already sorted) under `uri`.
pub fn listing(uri: &str, names: &[String]) -> Response {
    let mut body = String::from("<ul>\n");

    for name in names {
        let href = if uri == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", uri, name)
        };
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape(&href),
            escape(name)
        ));
    }

    body.push_str("</ul>\n");

    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .body(body.into_bytes())
        .build()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
