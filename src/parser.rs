use std::io::{ErrorKind, Read};

use log::{debug, trace};

use crate::body::BodyAccumulator;
use crate::error::ParseError;
use crate::headers::HeaderTable;
use crate::types::{Request, RequestLine};

/// Initial scratch buffer capacity; doubled whenever it fills up.
const INITIAL_CAPACITY: usize = 8;

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

/// The stage an in-progress request parse has reached.
///
/// Transitions are strictly forward:
/// `AwaitingRequestLine → AwaitingHeaders → AwaitingBody → Done`.
/// A stage is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingRequestLine,
    AwaitingHeaders,
    AwaitingBody,
    Done,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Incremental HTTP/1.1 request parser.
///
/// Each [`advance`](Parser::advance) call inspects the caller's buffered
/// window, dispatches to exactly one sub-parser for the current state,
/// and reports how many bytes it consumed so the caller can compact its
/// buffer. A return of `0` means "need more data" — never an error.
///
/// ```rust
/// use reqstream::Parser;
///
/// let mut parser = Parser::new();
/// let consumed = parser.advance(b"GET /hello HTTP/1.1\r\n\r\n").unwrap();
/// assert_eq!(consumed, 21);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    state: ParseState,
    request_line: Option<RequestLine>,
    headers: HeaderTable,
    body: Option<BodyAccumulator>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self::AwaitingRequestLine
    }
}

impl Parser {
    /// Create a parser awaiting the request line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Returns `true` once the request is fully parsed.
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Run one parse step against the buffered window `data`.
    ///
    /// Dispatches on the current state to the request-line decoder, the
    /// header table, or the body accumulator. When a stage's completion
    /// condition is met the state transitions within the same call, so a
    /// call can consume bytes *and* move to the next stage at once.
    ///
    /// # Errors
    ///
    /// Any protocol violation is fatal to this request. Calling `advance`
    /// after the parser reached `Done` fails with
    /// [`ParseError::AlreadyDone`] and mutates nothing.
    pub fn advance(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Done => Err(ParseError::AlreadyDone),

            ParseState::AwaitingRequestLine => match RequestLine::parse(data)? {
                None => Ok(0),
                Some((line, consumed)) => {
                    debug!("request line accepted: {line}");
                    self.request_line = Some(line);
                    self.state = ParseState::AwaitingHeaders;
                    Ok(consumed)
                }
            },

            ParseState::AwaitingHeaders => {
                let (consumed, complete) = self.headers.parse_one(data)?;
                if complete {
                    self.enter_body_stage()?;
                }
                Ok(consumed)
            }

            ParseState::AwaitingBody => {
                let Some(body) = self.body.as_mut() else {
                    unreachable!("body accumulator exists while in AwaitingBody");
                };
                let consumed = body.push(data)?;
                if body.is_complete() {
                    self.state = ParseState::Done;
                }
                Ok(consumed)
            }
        }
    }

    /// Header section finished: decide whether a body stage follows.
    fn enter_body_stage(&mut self) -> Result<(), ParseError> {
        match BodyAccumulator::from_headers(&self.headers)? {
            None => {
                self.state = ParseState::Done;
            }
            Some(body) if body.is_complete() => {
                // Content-Length: 0
                self.body = Some(body);
                self.state = ParseState::Done;
            }
            Some(body) => {
                trace!("awaiting {} body bytes", body.remaining());
                self.body = Some(body);
                self.state = ParseState::AwaitingBody;
            }
        }
        Ok(())
    }

    /// Consume the parser and return the completed [`Request`].
    ///
    /// # Errors
    ///
    /// [`ParseError::IncompleteRequest`] unless the parser reached `Done`.
    pub fn finish(self) -> Result<Request, ParseError> {
        if self.state != ParseState::Done {
            return Err(ParseError::IncompleteRequest);
        }
        Ok(Request {
            request_line: self.request_line.ok_or(ParseError::IncompleteRequest)?,
            headers: self.headers,
            body: self.body.map(BodyAccumulator::into_bytes).unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Scratch buffer
// ---------------------------------------------------------------------------

/// Growable accumulation buffer owned by one parse instance.
///
/// Holds the raw, unconsumed prefix of bytes read from the source.
/// Capacity only grows, by geometric doubling; consumed bytes are slid
/// off the front. Never shared across parse instances.
struct ScratchBuffer {
    buf: Vec<u8>,
    len: usize,
}

impl ScratchBuffer {
    fn new() -> Self {
        Self {
            buf: vec![0; INITIAL_CAPACITY],
            len: 0,
        }
    }

    /// The valid (read but unconsumed) prefix.
    fn window(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Read once from `source` into the free tail, growing first if the
    /// buffer is full. Returns the byte count; `0` means end-of-stream.
    fn fill_from<R: Read>(&mut self, source: &mut R) -> Result<usize, ParseError> {
        if self.len == self.buf.len() {
            let grown = self.buf.len() * 2;
            trace!("growing scratch buffer to {grown} bytes");
            self.buf.resize(grown, 0);
        }
        loop {
            match source.read(&mut self.buf[self.len..]) {
                Ok(n) => {
                    self.len += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::SourceRead(e)),
            }
        }
    }

    /// Discard `n` consumed bytes by sliding the remainder to the front.
    fn discard(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.buf.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

// ---------------------------------------------------------------------------
// Driving loop
// ---------------------------------------------------------------------------

impl Request {
    /// Parse a complete request by pulling bytes from `source`.
    ///
    /// Makes no assumption about how many bytes each read yields (1-byte
    /// reads included); protocol tokens may be split across reads at any
    /// boundary. The result is identical regardless of chunking.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from the grammar, plus
    /// [`ParseError::IncompleteBody`] / [`ParseError::IncompleteRequest`]
    /// when the source ends before the request is complete, and
    /// [`ParseError::SourceRead`] when a read fails outright.
    pub fn from_reader<R: Read>(source: &mut R) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let mut scratch = ScratchBuffer::new();

        while !parser.is_done() {
            let n = scratch.fill_from(source)?;
            if n == 0 {
                trace!("end of stream in state {:?}", parser.state());
                return Err(match parser.state() {
                    ParseState::AwaitingBody => ParseError::IncompleteBody,
                    _ => ParseError::IncompleteRequest,
                });
            }
            loop {
                let consumed = parser.advance(scratch.window())?;
                if consumed == 0 {
                    break;
                }
                scratch.discard(consumed);
                if parser.is_done() {
                    break;
                }
            }
        }

        parser.finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
