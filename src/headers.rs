use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ParseError;

const CRLF: &[u8] = b"\r\n";

// ---------------------------------------------------------------------------
// Field-name validation
// ---------------------------------------------------------------------------

/// Characters permitted in a header field name: ALPHA / DIGIT plus the
/// symbol set accepted by the wire grammar.
#[inline]
fn is_field_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'^'
                | b'&'
                | b'\''
                | b'*'
                | b'-'
                | b'.'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

/// Validate a field-name token, trailing colon included.
///
/// The final byte must be exactly `:`; every byte before it must satisfy
/// [`is_field_name_byte`]. No side effects.
fn validate_field_name(name: &[u8]) -> Result<(), ParseError> {
    let last = name.len() - 1;
    for (i, &b) in name.iter().enumerate() {
        if i == last {
            if b != b':' {
                return Err(ParseError::MissingColon);
            }
            continue;
        }
        if !is_field_name_byte(b) {
            return Err(ParseError::InvalidFieldName);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// HeaderTable
// ---------------------------------------------------------------------------

/// An ordered-insertion table of HTTP header fields.
///
/// Field names are case-folded to lower-case at storage and lookup time.
/// A repeated field name does not overwrite: the new value is appended to
/// the stored one as `", " + value`, preserving arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: Vec<(String, String)>,
}

impl HeaderTable {
    /// Create an empty header table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse **at most one** header line out of `data`.
    ///
    /// Returns `(consumed, complete)`:
    /// - `(0, false)` — no full line buffered yet, supply more bytes;
    /// - `(2, true)` — `data` begins with the blank line ending the header
    ///   section; the terminating CRLF is consumed so the body stage
    ///   starts at the first body byte;
    /// - `(line + 2, false)` — one field line was folded into the table.
    ///
    /// The caller must invoke this repeatedly until `complete` is `true`.
    pub fn parse_one(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(pos) = find_crlf(data) else {
            return Ok((0, false));
        };
        if pos == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = data[..pos].trim_ascii();
        let sp = line
            .iter()
            .position(|&b| b == b' ')
            .ok_or(ParseError::MalformedFieldLine)?;
        let (name, value) = line.split_at(sp);
        if name.len() < 2 {
            // a bare ":" would leave an empty field name
            return Err(ParseError::MalformedFieldLine);
        }
        validate_field_name(name)?;

        let name = &name[..name.len() - 1];
        self.fold(name, value.trim_ascii_start());

        Ok((pos + CRLF.len(), false))
    }

    /// Look up a field value; `name` is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of distinct field names stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Insert `value` under the lower-cased `name`, comma-appending when
    /// the name is already present.
    fn fold(&mut self, name: &[u8], value: &[u8]) {
        let name = String::from_utf8_lossy(name).to_ascii_lowercase();
        let value = String::from_utf8_lossy(value).into_owned();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }
}

impl Serialize for HeaderTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Position of the first CRLF in `data`, if any.
fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
