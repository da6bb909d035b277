//! Bounded cursor-based byte stream
//!
//! `ByteStream` is the single I/O surface used by every parser and serializer
//! in this crate, so the same algorithm works whether the backing store is an
//! in-memory buffer or bytes lifted off a live transport. Reads never block:
//! an exhausted stream reports a short or empty result instead.
//!
//! A stream is exclusively owned by its creator and mutated in place; callers
//! must not share one across execution contexts without external
//! synchronization.

use crate::error::{KeywireError, Result};

/// Owned byte buffer with a read cursor.
///
/// Invariant: `cursor <= buf.len()`, and `buf.len() <= cap` when a hard
/// capacity was set at construction.
#[derive(Debug, Clone)]
pub struct ByteStream {
    buf: Vec<u8>,
    cursor: usize,
    cap: Option<usize>,
}

impl ByteStream {
    /// Stream positioned at the start of a copy of `data`, ready for reading.
    pub fn new(data: &[u8]) -> Self {
        Self {
            buf: data.to_vec(),
            cursor: 0,
            cap: None,
        }
    }

    /// Stream over an owned buffer, positioned at the start.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            buf: data,
            cursor: 0,
            cap: None,
        }
    }

    /// Empty stream with unbounded growth, for serialization.
    pub fn empty() -> Self {
        Self {
            buf: Vec::new(),
            cursor: 0,
            cap: None,
        }
    }

    /// Empty stream that refuses to grow past `cap` bytes.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            cursor: 0,
            cap: Some(cap),
        }
    }

    /// Number of unread bytes remaining.
    pub fn available(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Next byte without consuming it; `None` at end of stream.
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.cursor).copied()
    }

    /// Consume and return one byte; `None` at end of stream.
    pub fn read(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.cursor += 1;
        Some(b)
    }

    /// Read up to `out.len()` bytes, short-reading at end of stream.
    /// Returns the count actually read.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.available());
        out[..n].copy_from_slice(&self.buf[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }

    /// Append `bytes` to the stream.
    ///
    /// Fails with `Capacity` (writing nothing) when a hard capacity was set
    /// and would be exceeded.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if let Some(cap) = self.cap {
            if self.buf.len() + bytes.len() > cap {
                return Err(KeywireError::Capacity(format!(
                    "write of {} bytes exceeds stream capacity {}",
                    bytes.len(),
                    cap
                )));
            }
        }
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Total length of the underlying buffer, read or not.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The full underlying buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Recover the underlying buffer, consuming the stream.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
