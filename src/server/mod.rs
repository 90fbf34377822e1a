//! HTTP server and response writer.
//!
//! The server accepts TCP connections, reads one request from each with the
//! incremental parser, and hands the request plus a [`ResponseWriter`] bound
//! to the same socket to a caller-supplied handler.

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{default_headers, ResponseWriter, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use handler::{ConnectionWriter, HandlerFn, HandlerFuture};
pub use http_server::Server;
