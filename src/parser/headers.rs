//! Header collection, filled one CRLF-terminated line at a time.

use std::collections::hash_map::{self, HashMap};

use crate::parser::error::Error;

const CRLF: &[u8] = b"\r\n";

/// A case-normalized map of header field names to values.
///
/// Names are stored lower-cased and always pass field-name token
/// validation when they come from [`Headers::parse`]. Repeated names are
/// merged into one value joined by `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    /// Create an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume at most one header line from the start of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// ends the header block was reached. `Ok((0, false))` means no full
    /// line is buffered yet and the caller should come back with more bytes.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), Error> {
        let line_end = match find_crlf(data) {
            Some(idx) => idx,
            None => return Ok((0, false)),
        };
        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &data[..line_end];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| Error::InvalidHeaderLine(String::from_utf8_lossy(line).into_owned()))?;
        let (raw_name, raw_value) = (&line[..colon], &line[colon + 1..]);

        // "Host : x" is rejected outright rather than trimmed
        if matches!(raw_name.last(), Some(b' ' | b'\t')) {
            return Err(Error::InvalidHeaderName(String::from_utf8_lossy(raw_name).into_owned()));
        }

        let name = raw_name.trim_ascii();
        if name.is_empty() || !is_token(name) {
            return Err(Error::InvalidHeaderName(String::from_utf8_lossy(raw_name).into_owned()));
        }

        // token bytes are ASCII; values may carry any octet
        let name = String::from_utf8_lossy(name);
        let value = String::from_utf8_lossy(raw_value.trim_ascii());
        self.merge(&name, &value);
        Ok((line_end + CRLF.len(), false))
    }

    /// Look up a header value, ignoring the case of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Add a header, merging with any existing value for the same name.
    ///
    /// Fails if `name` is not a field-name token or `value` contains CR or LF.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), Error> {
        validate_field(name, value)?;
        self.merge(name, value);
        Ok(())
    }

    /// Add a header, overwriting any existing value for the same name.
    ///
    /// Same validation as [`Headers::set`].
    pub fn replace(&mut self, name: &str, value: impl Into<String>) -> Result<(), Error> {
        let value = value.into();
        validate_field(name, &value)?;
        self.fields.insert(name.to_ascii_lowercase(), value);
        Ok(())
    }

    /// Insert a field known to be valid, such as a static name and a number.
    pub(crate) fn insert_valid(&mut self, name: &'static str, value: String) {
        debug_assert!(validate_field(name, &value).is_ok());
        self.fields.insert(name.to_ascii_lowercase(), value);
    }

    fn merge(&mut self, name: &str, value: &str) {
        match self.fields.entry(name.to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_string());
            }
        }
    }

    /// Remove a header, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    /// Check if a header exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Check a name/value pair before it can reach the wire.
pub(crate) fn validate_field(name: &str, value: &str) -> Result<(), Error> {
    if name.is_empty() || !is_token(name.as_bytes()) {
        return Err(Error::InvalidHeaderName(name.to_string()));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::InvalidHeaderValue(value.to_string()));
    }
    Ok(())
}

/// Field-name token: letters, digits and ``!#$%&'*+-.^_`|~``.
fn is_token(name: &[u8]) -> bool {
    name.iter().all(|&b| {
        b.is_ascii_alphanumeric()
            || matches!(
                b,
                b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
            )
    })
}
