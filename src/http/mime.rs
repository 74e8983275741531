//! MIME type detection based on file extensions.
//!
//! Types come from a mapping file in `/etc/mime.types` format, one rule per
//! line:
//!
//! ```text
//! text/html       html htm
//! image/png       png
//! ```
//!
//! The file is opened and scanned on every lookup; nothing is cached.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct MimeResolver {
    mapping: PathBuf,
    default: String,
}

impl MimeResolver {
    pub fn new(mapping: impl Into<PathBuf>, default: impl Into<String>) -> Self {
        Self {
            mapping: mapping.into(),
            default: default.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.mime_types.clone(), cfg.default_mime_type.clone())
    }

    /// Returns the content type for `path`.
    ///
    /// The extension is whatever follows the last `.` of the file name and is
    /// matched case-sensitively. The first rule listing it wins. A missing
    /// extension, an unreadable mapping file, or no matching rule all yield
    /// the default type.
    pub async fn lookup(&self, path: &Path) -> String {
        let Some(ext) = extension(path) else {
            return self.default.clone();
        };

        match self.scan(ext).await {
            Ok(Some(mime)) => mime,
            Ok(None) => self.default.clone(),
            Err(e) => {
                tracing::debug!(
                    mapping = %self.mapping.display(),
                    error = %e,
                    "Could not read mime mapping file, using default"
                );
                self.default.clone()
            }
        }
    }

    async fn scan(&self, ext: &str) -> std::io::Result<Option<String>> {
        let file = File::open(&self.mapping).await?;
        let mut lines = BufReader::new(file).lines();

        while let Some(line) = lines.next_line().await? {
            if line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(mime) = tokens.next() else {
                continue;
            };

            if tokens.any(|t| t == ext) {
                return Ok(Some(mime.to_string()));
            }
        }

        Ok(None)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .rsplit_once('.')
        .map(|(_, ext)| ext)
}
