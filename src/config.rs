//! Server configuration.
//!
//! A [`Config`] is built once at startup and shared read-only (behind an
//! `Arc`) by every connection worker. Values come from an optional YAML file
//! named by the `CONFIG` environment variable, then individual environment
//! variables override whatever the file set.
//!
//! ```yaml
//! listen_addr: "0.0.0.0:9898"
//! root: "/srv/www"
//! mime_types: "/etc/mime.types"
//! default_mime_type: "text/plain"
//! mode: concurrent
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// How the supervisor schedules accepted connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One connection at a time, handled inline by the accept loop.
    Single,
    /// One spawned task per connection.
    Concurrent,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Mode::Single),
            "concurrent" => Ok(Mode::Concurrent),
            _ => anyhow::bail!("unknown mode {:?} (expected single or concurrent)", s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listener binds to, e.g. `127.0.0.1:9898`
    pub listen_addr: String,
    /// Directory that bounds every servable path
    pub root: PathBuf,
    /// Mapping file in `/etc/mime.types` format
    pub mime_types: PathBuf,
    /// Content type used when no mapping applies
    pub default_mime_type: String,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9898".to_string(),
            root: PathBuf::from("www"),
            mime_types: PathBuf::from("/etc/mime.types"),
            default_mime_type: "text/plain".to_string(),
            mode: Mode::Concurrent,
        }
    }
}

impl Config {
    /// Loads configuration from `CONFIG` (if set) and environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("parsing config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Ok(path) = std::env::var("MIME_TYPES") {
            cfg.mime_types = PathBuf::from(path);
        }
        if let Ok(mime) = std::env::var("DEFAULT_MIME_TYPE") {
            cfg.default_mime_type = mime;
        }
        if let Ok(mode) = std::env::var("MODE") {
            cfg.mode = mode.parse().context("MODE")?;
        }

        Ok(cfg)
    }

    /// Parses a YAML document; absent fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Replaces `root` with its canonical form, failing if it does not exist.
    pub fn with_canonical_root(mut self) -> anyhow::Result<Self> {
        self.root = std::fs::canonicalize(&self.root)
            .with_context(|| format!("root directory {}", self.root.display()))?;
        Ok(self)
    }

    /// The listening port as text, as exported to CGI scripts in `SERVER_PORT`.
    ///
    /// Taken from `listen_addr`, which the listener rewrites to the bound
    /// address once it has one.
    pub fn port(&self) -> &str {
        self.listen_addr
            .rsplit_once(':')
            .map(|(_, port)| port)
            .unwrap_or("")
    }
}
