//! HTTP request representation and the incremental request parser.

use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::headers::{find_crlf, Headers};

/// Initial size of the scratch buffer used by [`Request::from_reader`].
pub const DEFAULT_BUFFER_SIZE: usize = 8;

const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// The first line of an HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// The request method, uppercase ASCII letters only
    pub method: String,
    /// The request target, kept as sent
    pub target: String,
    /// The version number without the `HTTP/` prefix, always `"1.1"`
    pub http_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    AwaitingRequestLine,
    AwaitingHeaders,
    AwaitingBody,
    Done,
}

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// The parsed request line
    pub request_line: RequestLine,
    /// The HTTP headers
    pub headers: Headers,
    /// The request body
    pub body: Vec<u8>,
    state: ParserState,
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.request_line == other.request_line
            && self.headers == other.headers
            && self.body == other.body
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Create an empty request waiting for its request line.
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            state: ParserState::AwaitingRequestLine,
        }
    }

    /// Read one request from `reader`, tolerating any read boundaries.
    pub async fn from_reader<R>(reader: &mut R) -> Result<Self, Error>
    where
        R: AsyncRead + Unpin,
    {
        Self::from_reader_with_capacity(reader, DEFAULT_BUFFER_SIZE).await
    }

    /// Like [`Request::from_reader`], starting from a scratch buffer of
    /// `capacity` bytes. The buffer doubles whenever it fills up.
    pub async fn from_reader_with_capacity<R>(reader: &mut R, capacity: usize) -> Result<Self, Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; capacity.max(1)];
        let mut read_to_index = 0;
        let mut request = Request::new();

        while !request.is_done() {
            if read_to_index == buf.len() {
                buf.resize(buf.len() * 2, 0);
            }

            let n = reader.read(&mut buf[read_to_index..]).await?;
            if n == 0 {
                return Err(Error::UnexpectedEof);
            }
            read_to_index += n;

            let consumed = request.parse(&buf[..read_to_index])?;
            if consumed > 0 {
                buf.copy_within(consumed..read_to_index, 0);
                read_to_index -= consumed;
            }
        }

        // unreachable through the loop above, which only exits once Done
        if request.request_line.method.is_empty() {
            return Err(Error::MissingRequestLine);
        }
        Ok(request)
    }

    /// Whether the request has been fully read.
    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    /// Feed buffered bytes through the state machine until it needs more
    /// input or finishes. Returns how many bytes were consumed.
    pub(crate) fn parse(&mut self, data: &[u8]) -> Result<usize, Error> {
        let mut total = 0;
        while self.state != ParserState::Done {
            let n = self.parse_single(&data[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    pub(crate) fn parse_single(&mut self, data: &[u8]) -> Result<usize, Error> {
        match self.state {
            ParserState::AwaitingRequestLine => {
                let Some((request_line, consumed)) = parse_request_line(data)? else {
                    return Ok(0);
                };
                self.request_line = request_line;
                self.state = ParserState::AwaitingHeaders;
                Ok(consumed)
            }
            ParserState::AwaitingHeaders => {
                let (consumed, done) = self.headers.parse(data)?;
                if done {
                    self.state = ParserState::AwaitingBody;
                }
                Ok(consumed)
            }
            ParserState::AwaitingBody => {
                let Some(raw) = self.headers.get("content-length") else {
                    self.state = ParserState::Done;
                    return Ok(data.len());
                };
                let digits = raw.trim();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::InvalidContentLength(raw.to_string()));
                }
                let content_length: usize = digits
                    .parse()
                    .map_err(|_| Error::InvalidContentLength(raw.to_string()))?;

                let remaining = content_length.saturating_sub(self.body.len());
                let to_read = remaining.min(data.len());
                self.body.extend_from_slice(&data[..to_read]);

                if self.body.len() == content_length {
                    self.state = ParserState::Done;
                }
                Ok(to_read)
            }
            ParserState::Done => Err(Error::ParseInDoneState),
        }
    }

    /// Get a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Check if the request has a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.starts_with("application/json"))
    }

    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Parse `METHOD SP TARGET SP HTTP/1.1 CRLF` from the start of `data`.
///
/// `Ok(None)` means the line is not complete yet.
fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, Error> {
    let Some(line_end) = find_crlf(data) else {
        return Ok(None);
    };
    // the target is opaque, so stray non-UTF-8 bytes are replaced rather than rejected
    let line = String::from_utf8_lossy(&data[..line_end]);

    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, version] = parts.as_slice() else {
        return Err(Error::InvalidRequestLine(line.to_string()));
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(Error::InvalidMethod(method.to_string()));
    }
    if version != SUPPORTED_VERSION {
        return Err(Error::InvalidVersion(version.to_string()));
    }

    let request_line = RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        http_version: version.trim_start_matches("HTTP/").to_string(),
    };
    Ok(Some((request_line, line_end + 2)))
}
