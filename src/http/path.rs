//! Mapping of request URIs onto the filesystem.
//!
//! This is the only guard against path traversal: URIs are never
//! percent-decoded, so a literal `..` reaches this point unchanged and is
//! resolved against the real filesystem like any other segment.

use std::path::{Path, PathBuf};

use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum PathError {
    /// The root itself cannot be canonicalized
    InvalidRoot(std::io::Error),
    /// The target does not exist or cannot be resolved
    NotFound(std::io::Error),
    /// The target resolves outside the root
    OutsideRoot(PathBuf),
}

impl PathError {
    pub fn status(&self) -> StatusCode {
        match self {
            PathError::InvalidRoot(_) => StatusCode::InternalServerError,
            PathError::NotFound(_) => StatusCode::NotFound,
            PathError::OutsideRoot(_) => StatusCode::BadRequest,
        }
    }
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::InvalidRoot(e) => write!(f, "cannot resolve root: {}", e),
            PathError::NotFound(e) => write!(f, "cannot resolve target: {}", e),
            PathError::OutsideRoot(p) => write!(f, "{} escapes the root", p.display()),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves `uri` to a canonical path contained in `root`.
///
/// The candidate is the plain concatenation `root + uri`, canonicalized
/// (`.`, `..` and symlinks resolved). The result must lie under the
/// canonical root, compared component by component.
pub async fn resolve(root: &Path, uri: &str) -> Result<PathBuf, PathError> {
    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(PathError::InvalidRoot)?;

    let mut candidate = root.clone().into_os_string();
    candidate.push(uri);

    let resolved = tokio::fs::canonicalize(&candidate)
        .await
        .map_err(PathError::NotFound)?;

    if !resolved.starts_with(&root) {
        return Err(PathError::OutsideRoot(resolved));
    }

    Ok(resolved)
}
