//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading an HTTP request off a byte stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line does not have exactly three space-separated parts.
    #[error("invalid request line: {0}")]
    InvalidRequestLine(String),

    /// The method is empty or contains something other than `A`-`Z`.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The version is anything but `HTTP/1.1`.
    #[error("invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// A header line has no colon.
    #[error("invalid header line: {0}")]
    InvalidHeaderLine(String),

    /// A header name is empty, padded before the colon, or not a token.
    #[error("invalid header key: {0}")]
    InvalidHeaderName(String),

    /// A header value would break the line it is written on.
    #[error("invalid header value: {0:?}")]
    InvalidHeaderValue(String),

    /// The `content-length` header is not a non-negative integer.
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The stream ended before the request was complete.
    #[error("unexpected EOF")]
    UnexpectedEof,

    /// The state machine was driven after it finished.
    #[error("trying to read data in a done state")]
    ParseInDoneState,

    /// No request line was ever parsed.
    #[error("failed to parse request line")]
    MissingRequestLine,

    /// A required header is missing from the request.
    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    /// Reading from the underlying stream failed.
    #[error("failed to read from reader: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
