//! Click protocol parser.
//!
//! The bar reports clicks as one JSON object per line on standard input:
//!
//! ```text
//! [
//! {"name":"2","instance":"","button":1,"event":272,"x":1711,"y":12}
//! ,{"name":"0","button":3,"x":120,"y":9}
//! ```
//!
//! Only `name` and `button` matter, so instead of a JSON parser this module
//! provides cursor-based scanners over a byte payload. Each scanner takes the
//! payload and a cursor and returns the advanced cursor. The scanners never
//! fail: missing or malformed data yields an empty [`Token`], which callers
//! treat as "keep the default".

use tracing::debug;

use crate::actor::{ClickEvent, NameField};

/// Maximum bytes kept from a single key or value.
pub const TOKEN_CAPACITY: usize = 31;

/// A bounded key or value copied out of a payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token {
    bytes: [u8; TOKEN_CAPACITY],
    len: usize,
}

impl Token {
    /// Create an empty token.
    pub const fn new() -> Self {
        Self {
            bytes: [0; TOKEN_CAPACITY],
            len: 0,
        }
    }

    /// Token contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Check if nothing was copied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }

    /// Append a byte; bytes past the capacity are dropped.
    #[inline]
    fn push(&mut self, byte: u8) {
        if self.len < TOKEN_CAPACITY {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

#[inline]
const fn is_end(payload: &[u8], i: usize) -> bool {
    i >= payload.len() || payload[i] == b'\0'
}

/// Read the next parameter name starting at `cursor`.
///
/// Skips array/object punctuation, separators, whitespace and the opening
/// quote, then copies the key up to its closing quote. When the payload is
/// exhausted before a key starts, `out` is left empty and the caller should
/// treat the object as finished.
pub fn read_param_name(payload: &[u8], cursor: usize, out: &mut Token) -> usize {
    out.clear();

    let mut i = cursor;
    while !is_end(payload, i) {
        match payload[i] {
            b'[' | b',' | b'{' | b'"' | b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            _ => break,
        }
    }

    while !is_end(payload, i) && payload[i] != b'"' {
        out.push(payload[i]);
        i += 1;
    }

    i
}

/// Read the value of the parameter whose name ended at `cursor`.
///
/// Advances past the `:` separator and any whitespace or quotes, then copies
/// up to the next `,`, `}` or `"`. An empty `out` means the value is unusable.
pub fn read_param_val(payload: &[u8], cursor: usize, out: &mut Token) -> usize {
    out.clear();

    let mut i = cursor;
    while !is_end(payload, i) && payload[i] != b':' {
        i += 1;
    }
    if is_end(payload, i) {
        debug!("no parameter value in click payload");
        return i;
    }
    i += 1;

    while !is_end(payload, i) {
        match payload[i] {
            b' ' | b'\t' | b'"' => i += 1,
            _ => break,
        }
    }

    while !is_end(payload, i) {
        match payload[i] {
            b',' | b'}' | b'"' => break,
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    if out.is_empty() {
        debug!("no parameter value in click payload");
    }

    i
}

/// Skip the value of an unrecognized parameter.
///
/// Advances past the next `,` or `}`. Nested objects and arrays are not
/// tracked; the following [`read_param_name`] resynchronizes on the next key.
pub fn skip_value(payload: &[u8], cursor: usize) -> usize {
    let mut i = cursor;
    while !is_end(payload, i) {
        let byte = payload[i];
        i += 1;
        if byte == b',' || byte == b'}' {
            break;
        }
    }
    i
}

/// Decode one click record into a [`ClickEvent`].
///
/// Scanning stops early once both a widget and the primary button are known,
/// or as soon as a non-primary button is seen.
pub fn decode_click(payload: &[u8]) -> ClickEvent {
    let mut event = ClickEvent::default();
    let mut key = Token::new();
    let mut value = Token::new();

    let mut i = 0;
    while !is_end(payload, i) && !event.is_resolved() {
        i = read_param_name(payload, i, &mut key);
        if key.is_empty() {
            break;
        }
        event.saw_param = true;

        match key.as_bytes() {
            b"name" => {
                i = read_param_val(payload, i, &mut value);
                if !value.is_empty() {
                    event.name = parse_index(value.as_bytes());
                }
            }
            b"button" => {
                i = read_param_val(payload, i, &mut value);
                if !value.is_empty() {
                    event.button = Some(parse_button(value.as_bytes()));
                }
            }
            _ => i = skip_value(payload, i),
        }
    }

    event
}

/// Base-10 widget index.
fn parse_index(value: &[u8]) -> NameField {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .map_or(NameField::Malformed, NameField::Index)
}

/// Button ordinal; anything unparsable maps to `0` (no button).
fn parse_button(value: &[u8]) -> u8 {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}
