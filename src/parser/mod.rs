//! HTTP request parsing.
//!
//! Requests are read incrementally off a byte stream: bytes are buffered
//! until a full request line, header line or body slice is available, so
//! the result never depends on how the stream happens to be chunked.

mod error;
mod headers;
mod request;

// Re-export public items
pub use error::Error;
pub(crate) use headers::validate_field;
pub use headers::Headers;
pub use request::{Request, RequestLine, DEFAULT_BUFFER_SIZE};
