//! Porch - small HTTP/1.0 origin server
//!
//! Serves static files, directory listings and CGI scripts from a single root
//! directory, one request per connection.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
