use serde::Serialize;
use std::fmt;

use crate::error::ParseError;
use crate::headers::HeaderTable;

const CRLF: &[u8] = b"\r\n";

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// Recognized HTTP request methods.
///
/// The set is a fixed whitelist; any other token is rejected with
/// [`ParseError::InvalidMethod`]. Note `OPTION` (singular), matching the
/// wire grammar this parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTION,
    PATCH,
    TRACE,
    CONNECT,
}

impl Method {
    /// Parse a method token, rejecting anything outside the whitelist.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "DELETE" => Ok(Self::DELETE),
            "HEAD" => Ok(Self::HEAD),
            "OPTION" => Ok(Self::OPTION),
            "PATCH" => Ok(Self::PATCH),
            "TRACE" => Ok(Self::TRACE),
            "CONNECT" => Ok(Self::CONNECT),
            _ => Err(ParseError::InvalidMethod(token.to_owned())),
        }
    }

    /// Return the method as a static string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::HEAD => "HEAD",
            Self::OPTION => "OPTION",
            Self::PATCH => "PATCH",
            Self::TRACE => "TRACE",
            Self::CONNECT => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequestLine
// ---------------------------------------------------------------------------

/// The decoded first line of a request: method, target, version.
///
/// Immutable once constructed; built exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    /// Version number without the `HTTP/` prefix; only `1.1` is accepted.
    pub version: String,
}

impl RequestLine {
    /// Decode one CRLF-terminated request line from the front of `data`.
    ///
    /// Returns `Ok(None)` when no CRLF is buffered yet — that is not a
    /// malformed line, more bytes may still arrive. On success returns the
    /// decoded line and the byte count consumed, trailing CRLF included.
    pub fn parse(data: &[u8]) -> Result<Option<(Self, usize)>, ParseError> {
        let Some(pos) = data.windows(CRLF.len()).position(|w| w == CRLF) else {
            return Ok(None);
        };

        let line = String::from_utf8_lossy(&data[..pos]).into_owned();
        let tokens: Vec<&str> = line.split(' ').collect();
        let [method, target, version] = tokens[..] else {
            return Err(ParseError::MalformedRequestLine(line.clone()));
        };
        if target.is_empty() {
            return Err(ParseError::MalformedRequestLine(line.clone()));
        }

        let method = Method::from_token(method)?;
        let version = version
            .strip_prefix("HTTP/")
            .ok_or_else(|| ParseError::MalformedRequestLine(line.clone()))?;
        if version != "1.1" {
            return Err(ParseError::UnsupportedVersion(version.to_owned()));
        }

        Ok(Some((
            Self {
                method,
                target: target.to_owned(),
                version: version.to_owned(),
            },
            pos + CRLF.len(),
        )))
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target, self.version)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A fully parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// The decoded request line.
    pub request_line: RequestLine,
    /// Header fields, names lower-cased, duplicates comma-folded.
    pub headers: HeaderTable,
    /// The request body; empty when no `Content-Length` was declared.
    #[serde(serialize_with = "serialize_body")]
    pub body: Vec<u8>,
}

/// Serialize body bytes as a UTF-8 string (lossy) for JSON output.
fn serialize_body<S: serde::Serializer>(body: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(body))
}

impl Request {
    /// Look up a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Parse the `Content-Length` header, if present and valid.
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get("content-length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Return the body as a UTF-8 `&str` if it is valid UTF-8.
    pub fn body_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
