//! HTTP response status codes and the ordered response writer.

use std::fmt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::parser::{validate_field, Headers};
use crate::server::error::Error;

/// An HTTP status code.
///
/// Any `u16` can be written; only the codes below have a reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Get the reason phrase for this status code, if it has one.
    pub fn reason_phrase(&self) -> Option<&'static str> {
        match self.0 {
            200 => Some("OK"),
            400 => Some("Bad Request"),
            500 => Some("Internal Server Error"),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason_phrase() {
            Some(reason) => write!(f, "{} {reason}", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Headers for a plain-text response of `content_len` bytes on a
/// connection that will be closed afterwards.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.insert_valid("content-length", content_len.to_string());
    headers.insert_valid("connection", "close".to_string());
    headers.insert_valid("content-type", "text/plain".to_string());
    headers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    StatusLine,
    Headers,
    Body,
    Done,
    Failed,
}

/// Writes one HTTP/1.1 response in the order the protocol requires:
/// status line, headers, then either a fixed body or a sequence of chunks
/// closed by a terminator or a trailer block.
///
/// Calling a method out of order returns [`Error::OutOfOrder`] without
/// writing anything. After an I/O error the writer refuses every further
/// call, since part of a line may already be on the wire.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: WriterState::StatusLine,
        }
    }

    /// Write `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), Error> {
        self.expect_state(WriterState::StatusLine, "status line must be written first")?;
        let line = format!("HTTP/1.1 {status}\r\n");
        self.emit(line.as_bytes()).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Write every header followed by the blank line ending the head.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), Error> {
        self.expect_state(WriterState::Headers, "headers must be written after status line")?;
        let mut block = encode_fields(headers)?;
        block.extend_from_slice(b"\r\n");
        self.emit(&block).await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Write a complete fixed-length body.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, Error> {
        self.expect_state(WriterState::Body, "body must be written after status line and headers")?;
        self.emit(body).await?;
        self.state = WriterState::Done;
        Ok(body.len())
    }

    /// Write one `<hex-len>\r\n<bytes>\r\n` chunk. May be called repeatedly.
    ///
    /// An empty chunk would read as the end of the body, so it is skipped.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, Error> {
        self.expect_state(WriterState::Body, "chunked body must be written after status line and headers")?;
        if chunk.is_empty() {
            return Ok(0);
        }
        let mut frame = format!("{:x}\r\n", chunk.len()).into_bytes();
        frame.extend_from_slice(chunk);
        frame.extend_from_slice(b"\r\n");
        self.emit(&frame).await?;
        Ok(chunk.len())
    }

    /// End a chunked body with no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, Error> {
        const TERMINATOR: &[u8] = b"0\r\n\r\n";
        self.expect_state(WriterState::Body, "chunked body must be written after status line and headers")?;
        self.emit(TERMINATOR).await?;
        self.state = WriterState::Done;
        Ok(TERMINATOR.len())
    }

    /// End a chunked body with a trailer block announced by a `Trailer` header.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), Error> {
        self.expect_state(WriterState::Body, "trailers must be written after a chunked body")?;
        let mut block = b"0\r\n".to_vec();
        block.extend_from_slice(&encode_fields(trailers)?);
        block.extend_from_slice(b"\r\n");
        self.emit(&block).await?;
        self.state = WriterState::Done;
        Ok(())
    }

    /// Flush the underlying sink.
    pub async fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Whether a complete response has been written.
    pub fn is_done(&self) -> bool {
        self.state == WriterState::Done
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn emit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if let Err(e) = self.writer.write_all(bytes).await {
            self.state = WriterState::Failed;
            return Err(e.into());
        }
        Ok(())
    }

    fn expect_state(&self, expected: WriterState, message: &'static str) -> Result<(), Error> {
        if self.state == WriterState::Failed {
            return Err(Error::OutOfOrder("response writer failed on an earlier write"));
        }
        if self.state != expected {
            return Err(Error::OutOfOrder(message));
        }
        Ok(())
    }
}

fn encode_fields(fields: &Headers) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    for (name, value) in fields.iter() {
        validate_field(name, value).map_err(Error::InvalidField)?;
        let line = format!("{name}: {value}\r\n");
        bytes.extend_from_slice(line.as_bytes());
    }
    Ok(bytes)
}
