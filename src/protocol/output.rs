//! `OutputBuffer`: Single-syscall output buffer for bar protocol lines.

use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::io::{self, Write};

use crate::error::{Error, Result};

/// Padding placed on both sides of every widget's text.
const PADDING: &str = "   ";

/// Protocol version announced in the header.
const PROTOCOL_VERSION: u8 = 1;

/// Opening header object of the bar protocol.
#[derive(Debug, Serialize)]
struct Header {
    version: u8,
    click_events: bool,
}

/// One status block: a widget segment on the bar.
#[derive(Debug, Serialize)]
struct Block<'a> {
    /// Widget index, sent back to us in click events.
    #[serde(serialize_with = "as_string")]
    name: usize,
    /// Padded widget text.
    #[serde(serialize_with = "padded")]
    full_text: &'a str,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn as_string<S: Serializer>(index: &usize, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(index)
}

fn padded<S: Serializer>(text: &&str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{PADDING}{text}{PADDING}"))
}

/// Pre-allocated buffer for building bar protocol output.
///
/// A whole line is accumulated here, then flushed in a single `write()`
/// syscall so the bar never reads a partial update.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical status line (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the protocol header and open the endless array of updates.
    pub fn write_header(&mut self) -> Result<()> {
        let header = Header {
            version: PROTOCOL_VERSION,
            click_events: true,
        };
        serde_json::to_writer(&mut self.data, &header).map_err(encode_error)?;
        self.data.extend_from_slice(b"\n[\n");
        Ok(())
    }

    /// Write one update line carrying every widget's text, in table order.
    pub fn write_frame<'a, I>(&mut self, texts: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let blocks: Vec<Block<'a>> = texts
            .into_iter()
            .enumerate()
            .map(|(name, full_text)| Block { name, full_text })
            .collect();

        serde_json::to_writer(&mut self.data, &blocks).map_err(encode_error)?;
        self.data.extend_from_slice(b",\n");
        Ok(())
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_error(err: impl Display) -> Error {
    Error::Output(io::Error::other(err.to_string()))
}
