use thiserror::Error;

/// Errors that can occur while decoding an HTTP/1.1 request.
///
/// Every parse error is fatal to the in-progress request: the state
/// machine never retries or self-corrects, and a request for which any
/// of these was returned must be discarded by the caller.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A header field name contains a character outside the token set.
    #[error("invalid character in header field name")]
    InvalidFieldName,
    /// A header field name is not terminated by ':'.
    #[error("header field name missing terminating ':'")]
    MissingColon,
    /// A header line could not be split into field name and value.
    #[error("malformed header field line")]
    MalformedFieldLine,
    /// The request line does not consist of exactly three tokens.
    #[error("malformed request line: '{0}'")]
    MalformedRequestLine(String),
    /// The method token is not in the recognized set.
    #[error("invalid HTTP method: '{0}'")]
    InvalidMethod(String),
    /// The version token names a version other than 1.1.
    #[error("unsupported HTTP version: '{0}'")]
    UnsupportedVersion(String),
    /// The `Content-Length` value is not a non-negative integer.
    #[error("invalid Content-Length: '{0}'")]
    InvalidContentLength(String),
    /// More body bytes arrived than `Content-Length` declared.
    #[error("body exceeds declared Content-Length")]
    BodyExceedsContentLength,
    /// The source ended before the declared body was fully received.
    #[error("stream ended before declared body was received")]
    IncompleteBody,
    /// The source ended before a complete request was parsed.
    #[error("stream ended before a complete request was parsed")]
    IncompleteRequest,
    /// A parse step was attempted after the request already completed.
    #[error("parse step called after request was complete")]
    AlreadyDone,
    /// The underlying source reported a read failure (not end-of-stream).
    #[error("source read failure: {0}")]
    SourceRead(#[from] std::io::Error),
}
