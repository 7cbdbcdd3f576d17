//! `TextSlot`: Fixed-capacity text target for widget rendering.

use std::fmt;

/// Pre-allocated text buffer a widget renders into.
///
/// The slot never grows past its capacity. A write that would exceed it is
/// rejected as a whole and the slot remembers the overflow, so the scheduler
/// can treat it as fatal instead of emitting a torn segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSlot {
    text: String,
    capacity: usize,
    overflowed: bool,
}

impl TextSlot {
    /// Create an empty slot holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// Clear the slot for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
        self.overflowed = false;
    }

    /// Get the slot contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maximum number of bytes the slot accepts.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.text.len()
    }

    /// Whether a write was rejected since the last [`clear`](Self::clear).
    #[inline]
    pub const fn overflowed(&self) -> bool {
        self.overflowed
    }
}

impl fmt::Write for TextSlot {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.remaining() {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}

impl fmt::Display for TextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
