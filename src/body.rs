use crate::error::ParseError;
use crate::headers::HeaderTable;

/// Accumulates body bytes against a declared `Content-Length`.
///
/// Constructed once the header section is complete. The accumulated
/// length may never exceed the declared length; reaching equality is the
/// only completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyAccumulator {
    declared: usize,
    body: Vec<u8>,
}

impl BodyAccumulator {
    /// Build an accumulator from the completed header table.
    ///
    /// Returns `Ok(None)` when no `Content-Length` is declared — the body
    /// stage is skipped entirely and the request body stays empty.
    pub fn from_headers(headers: &HeaderTable) -> Result<Option<Self>, ParseError> {
        let Some(value) = headers.get("content-length") else {
            return Ok(None);
        };
        let declared = value
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength(value.to_owned()))?;
        Ok(Some(Self {
            declared,
            // Pre-allocate up to 64 KiB; the declared length is untrusted.
            body: Vec::with_capacity(declared.min(65_536)),
        }))
    }

    /// Append the entire `window` to the body, consuming all of it.
    ///
    /// Fails with [`ParseError::BodyExceedsContentLength`] if the append
    /// would push the accumulated length past the declared length.
    pub fn push(&mut self, window: &[u8]) -> Result<usize, ParseError> {
        if self.body.len() + window.len() > self.declared {
            return Err(ParseError::BodyExceedsContentLength);
        }
        self.body.extend_from_slice(window);
        Ok(window.len())
    }

    /// Accumulated length equals the declared length.
    pub fn is_complete(&self) -> bool {
        self.body.len() == self.declared
    }

    /// Bytes still owed by the source.
    pub fn remaining(&self) -> usize {
        self.declared - self.body.len()
    }

    /// Consume the accumulator, yielding the body bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(raw: &[u8]) -> HeaderTable {
        let mut headers = HeaderTable::new();
        let mut data = raw;
        loop {
            let (n, done) = headers.parse_one(data).unwrap();
            if done {
                return headers;
            }
            data = &data[n..];
        }
    }

    #[test]
    fn absent_content_length_means_no_body_stage() {
        let headers = headers_with(b"Host: localhost\r\n\r\n");
        assert!(BodyAccumulator::from_headers(&headers).unwrap().is_none());
    }

    #[test]
    fn content_length_lookup_is_case_insensitive() {
        let headers = headers_with(b"CONTENT-LENGTH: 4\r\n\r\n");
        let acc = BodyAccumulator::from_headers(&headers).unwrap().unwrap();
        assert_eq!(acc.remaining(), 4);
    }

    #[test]
    fn unparsable_content_length_is_an_error() {
        let headers = headers_with(b"Content-Length: ten\r\n\r\n");
        let err = BodyAccumulator::from_headers(&headers).unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(v) if v == "ten"));

        let headers = headers_with(b"Content-Length: -1\r\n\r\n");
        assert!(BodyAccumulator::from_headers(&headers).is_err());
    }

    #[test]
    fn zero_declared_length_is_immediately_complete() {
        let headers = headers_with(b"Content-Length: 0\r\n\r\n");
        let acc = BodyAccumulator::from_headers(&headers).unwrap().unwrap();
        assert!(acc.is_complete());
    }

    #[test]
    fn accumulates_across_windows_until_declared_length() {
        let headers = headers_with(b"Content-Length: 10\r\n\r\n");
        let mut acc = BodyAccumulator::from_headers(&headers).unwrap().unwrap();

        assert_eq!(acc.push(b"01234").unwrap(), 5);
        assert!(!acc.is_complete());
        assert_eq!(acc.remaining(), 5);

        assert_eq!(acc.push(b"56789").unwrap(), 5);
        assert!(acc.is_complete());
        assert_eq!(acc.into_bytes(), b"0123456789");
    }

    #[test]
    fn overrun_is_rejected() {
        let headers = headers_with(b"Content-Length: 10\r\n\r\n");
        let mut acc = BodyAccumulator::from_headers(&headers).unwrap().unwrap();
        let err = acc.push(b"0123456789A").unwrap_err();
        assert!(matches!(err, ParseError::BodyExceedsContentLength));
    }
}
