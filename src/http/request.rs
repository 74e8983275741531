use std::path::PathBuf;

/// A single request header, kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Text before the first `:`, verbatim
    pub name: String,
    /// Text after the `:`, leading whitespace and line terminator removed
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// One `Request` exists per connection. The parser fills in method, URI,
/// query and headers; `path` is only set once the URI has been resolved to a
/// canonical location under the server root.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Client address in text form
    pub host: String,
    /// Client port in text form
    pub port: String,
    /// Request method token, passed through unvalidated (e.g. "GET")
    pub method: String,
    /// Path component of the request-target, query stripped, not decoded
    pub uri: String,
    /// Everything after the first `?`, or empty
    pub query: String,
    /// Canonical filesystem path, set after successful resolution
    pub path: Option<PathBuf>,
    /// Headers in arrival order; duplicates are kept
    pub headers: Vec<Header>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    host: String,
    port: String,
    method: Option<String>,
    target: Option<String>,
    headers: Vec<Header>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peer(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.host = host.into();
        self.port = port.into();
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the raw request-target; it is split into URI and query on build.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("request-target missing")?;
        let (uri, query) = split_target(&target);

        Ok(Request {
            host: self.host,
            port: self.port,
            method: self.method.ok_or("method missing")?,
            uri: uri.to_string(),
            query: query.to_string(),
            path: None,
            headers: self.headers,
        })
    }
}

/// Splits a request-target at the first `?` into `(uri, query)`.
///
/// # Example
///
/// ```
/// # use porch::http::request::split_target;
/// assert_eq!(split_target("/cgi.sh?q=foo"), ("/cgi.sh", "q=foo"));
/// assert_eq!(split_target("/index.html"), ("/index.html", ""));
/// ```
pub fn split_target(target: &str) -> (&str, &str) {
    target.split_once('?').unwrap_or((target, ""))
}

impl Request {
    /// Retrieves the first header whose name matches `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}
