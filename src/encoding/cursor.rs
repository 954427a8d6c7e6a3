//! Forward-only reader over an encoded buffer.

use super::DecodeOptions;
use crate::errors::DecodeError;
use bytes::{Buf, Bytes};

#[derive(Clone, Debug)]
/// A sequential reader over an immutable byte buffer.
///
/// The cursor only moves forward. Reads past the end fail with
/// [`DecodeError::TruncatedInput`] and leave the cursor where it was.
///
/// # Example
///
/// ```
/// use packed_json::encoding::Cursor;
///
/// let mut cursor = Cursor::new(vec![1u8, 2, 3]);
///
/// assert_eq!(cursor.take_byte().unwrap(), 1);
/// assert_eq!(cursor.read_many(2).unwrap().as_ref(), &[2, 3]);
/// assert!(cursor.take_byte().is_err());
/// ```
pub struct Cursor {
    buf: Bytes,
    pos: usize,
    options: DecodeOptions,
    depth: usize,
}

impl Cursor {
    /// Creates a cursor at the start of `buf` with default [`DecodeOptions`].
    pub fn new<B: Into<Bytes>>(buf: B) -> Self { Self::with_options(buf, DecodeOptions::default()) }

    /// Creates a cursor at the start of `buf`.
    ///
    /// # Arguments
    ///
    /// * `buf` - The encoded bytes.
    /// * `options: DecodeOptions` - Limits and policies applied while decoding.
    pub fn with_options<B: Into<Bytes>>(buf: B, options: DecodeOptions) -> Self {
        Cursor {
            buf: buf.into(),
            pos: 0,
            options,
            depth: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize { self.pos }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize { self.buf.len() }

    /// Indicates whether every byte has been consumed.
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    /// The options this cursor decodes with.
    pub fn options(&self) -> &DecodeOptions { &self.options }

    #[inline]
    fn truncated(&self) -> DecodeError {
        DecodeError::TruncatedInput {
            offset: self.pos + self.buf.len(),
        }
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Result<u8, DecodeError> {
        match self.buf.first() {
            Some(byte) => Ok(*byte),
            None => Err(self.truncated()),
        }
    }

    /// Consumes one byte.
    #[inline]
    pub fn take_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_byte()?;
        self.buf.advance(1);
        self.pos += 1;
        Ok(byte)
    }

    /// Consumes `len` bytes, returning them without copying.
    #[inline]
    pub fn read_many(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.buf.len() >= len {
            self.pos += len;
            Ok(self.buf.split_to(len))
        } else {
            Err(self.truncated())
        }
    }

    /// Reads an unsigned varint length and checks that at least that many bytes
    /// remain, so callers never allocate for input that is not there.
    pub(crate) fn read_len(&mut self) -> Result<usize, DecodeError> {
        let start = self.pos;
        let len = super::varint::unpack_unsigned(self)?;
        if len > self.remaining() as u64 {
            tracing::trace!(start, len, remaining = self.remaining(), "length exceeds input");
            return Err(self.truncated());
        }
        Ok(len as usize)
    }

    /// Enters one level of array/object nesting.
    pub(crate) fn descend(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of nesting.
    pub(crate) fn ascend(&mut self) { self.depth = self.depth.saturating_sub(1); }
}
