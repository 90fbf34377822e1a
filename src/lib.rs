//! HTTP/1.1 message framing over raw TCP.
//!
//! This library reads requests incrementally off a byte stream and writes
//! responses back in the order HTTP requires, including chunked bodies and
//! trailers. No HTTP library sits underneath: the framing is done here.
//!
//! # Features
//!
//! - Incremental request parsing that does not care how reads are split
//! - Strict request line validation (uppercase method, `HTTP/1.1` only)
//! - Header collection with token validation and duplicate merging
//! - Response writer that rejects out-of-order writes
//! - Chunked transfer-coding with optional trailers
//! - A task-per-connection server with idempotent shutdown
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use httpfromtcp::Request;
//!
//! # tokio_test_block(async {
//! let mut raw: &[u8] = b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n";
//! let request = Request::from_reader(&mut raw).await.unwrap();
//!
//! assert_eq!(request.request_line.method, "GET");
//! assert_eq!(request.request_line.target, "/coffee");
//! assert_eq!(request.request_line.http_version, "1.1");
//! assert_eq!(request.header("host"), Some("localhost"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Serving
//!
//! ```no_run
//! use httpfromtcp::{default_headers, Server, StatusCode};
//!
//! # async fn run() -> Result<(), httpfromtcp::ServerError> {
//! let server = Server::serve(42069, |mut writer, request| async move {
//!     let body = format!("you asked for {}\n", request.request_line.target);
//!     if writer.write_status_line(StatusCode::OK).await.is_err() {
//!         return;
//!     }
//!     if writer.write_headers(&default_headers(body.len())).await.is_err() {
//!         return;
//!     }
//!     let _ = writer.write_body(body.as_bytes()).await;
//! })
//! .await?;
//!
//! // ... later
//! server.close().await?;
//! # Ok(())
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, Headers, Request, RequestLine};
pub use server::{default_headers, Error as ServerError, ResponseWriter, Server, ServerConfig, StatusCode};
