//! # reqstream
//!
//! An **incremental HTTP/1.1 request parser** that decodes a request from
//! any byte-oriented source without buffering it up front and without
//! assumptions about how many bytes arrive per read.
//!
//! The parser is a strictly-forward state machine
//! (request line → headers → body) driven against a growable scratch
//! buffer. Every parse step reports exactly how many buffered bytes it
//! consumed, so protocol tokens split across arbitrary read boundaries
//! (a method name, a header, even a CRLF) are reassembled correctly and
//! the parsed result is identical no matter how the stream is chunked.
//!
//! ## Quick start — from a reader
//!
//! ```rust
//! use reqstream::Request;
//!
//! let mut source: &[u8] = b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let request = Request::from_reader(&mut source).expect("valid request");
//! assert_eq!(request.request_line.method.as_str(), "GET");
//! assert_eq!(request.request_line.target, "/hello");
//! assert_eq!(request.header("host"), Some("example.com"));
//! ```
//!
//! ## Quick start — driving the state machine yourself
//!
//! ```rust
//! use reqstream::{ParseState, Parser};
//!
//! let mut parser = Parser::new();
//!
//! // A step that cannot see a complete token consumes 0 bytes.
//! assert_eq!(parser.advance(b"GET / HT").unwrap(), 0);
//!
//! // With the full line buffered, the step consumes it and transitions.
//! assert_eq!(parser.advance(b"GET / HTTP/1.1\r\n\r\n").unwrap(), 16);
//! assert_eq!(parser.state(), ParseState::AwaitingHeaders);
//! ```

mod body;
mod error;
mod headers;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use error::ParseError;
pub use headers::HeaderTable;
pub use output::{format_debug, format_headers_only, format_json};
pub use parser::{ParseState, Parser};
pub use types::{Method, Request, RequestLine};

/// Parse a **complete** HTTP request from a byte slice in one call.
///
/// This is a convenience wrapper around [`Request::from_reader`]; the
/// slice is treated as the entire stream, so trailing shortfalls surface
/// as [`ParseError::IncompleteBody`] / [`ParseError::IncompleteRequest`].
///
/// # Errors
///
/// Returns [`ParseError`] if the data is malformed or incomplete.
pub fn parse_request(data: &[u8]) -> Result<Request, ParseError> {
    let mut source = data;
    Request::from_reader(&mut source)
}
