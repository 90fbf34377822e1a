//! Error types for the HTTP server and response writer.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding the listening socket failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A response writer method was called out of order. Nothing was written.
    #[error("{0}")]
    OutOfOrder(&'static str),

    /// A header or trailer cannot be written as a single valid line.
    #[error("invalid response field: {0}")]
    InvalidField(ParserError),

    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
