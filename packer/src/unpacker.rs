//! Byte reader with bounded operations and a sticky error flag.

use std::borrow::Cow;

use crate::error::{PackError, PackResult};
use crate::sanitize::Sanitize;
use crate::MAX_VARINT_BYTES;

/// A reader for the primitive wire encodings.
///
/// All read operations are bounds-checked and return errors on failure.
/// Any failed read also sets a sticky error flag (see
/// [`has_error`](Self::has_error)) so a caller can check once after a
/// sequence of reads. The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct Unpacker<'a> {
    data: &'a [u8],
    pos: usize,
    error: bool,
}

impl<'a> Unpacker<'a> {
    /// Creates a new `Unpacker` over a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            error: false,
        }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once any read has failed.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    /// Returns the unread bytes without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Reads a variable-length integer.
    pub fn get_int(&mut self) -> PackResult<i32> {
        let result = self.read_varint();
        self.track(result)
    }

    /// Reads a variable-length integer, or returns `default` if the input is
    /// exhausted. Exhaustion is not an error here.
    pub fn get_int_or_default(&mut self, default: i32) -> PackResult<i32> {
        if self.is_empty() {
            return Ok(default);
        }
        self.get_int()
    }

    /// Reads a fixed-width little-endian integer.
    pub fn get_uncompressed_int(&mut self) -> PackResult<i32> {
        let result = self.take(4).map(|bytes| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            i32::from_le_bytes(raw)
        });
        self.track(result)
    }

    /// Reads a fixed-width integer, or returns `default` if the input is
    /// exhausted.
    pub fn get_uncompressed_int_or_default(&mut self, default: i32) -> PackResult<i32> {
        if self.is_empty() {
            return Ok(default);
        }
        self.get_uncompressed_int()
    }

    /// Reads a NUL-terminated string and applies `sanitize`.
    pub fn get_string(&mut self, sanitize: Sanitize) -> PackResult<Cow<'a, str>> {
        let result = self.read_str();
        self.track(result).map(|raw| sanitize.apply(raw))
    }

    /// Reads a NUL-terminated string and appends its sanitized form to `out`.
    pub fn get_string_into(&mut self, sanitize: Sanitize, out: &mut String) -> PackResult<()> {
        let result = self.read_str();
        let raw = self.track(result)?;
        sanitize.apply_into(raw, out);
        Ok(())
    }

    /// Reads exactly `len` raw bytes.
    pub fn get_raw(&mut self, len: usize) -> PackResult<&'a [u8]> {
        let result = self.take(len);
        self.track(result)
    }

    fn track<T>(&mut self, result: PackResult<T>) -> PackResult<T> {
        if result.is_err() {
            self.error = true;
        }
        result
    }

    fn take(&mut self, len: usize) -> PackResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(PackError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn next_byte(&mut self) -> PackResult<u8> {
        self.take(1).map(|bytes| bytes[0])
    }

    #[allow(clippy::cast_possible_wrap)]
    fn read_varint(&mut self) -> PackResult<i32> {
        let start = self.pos;
        let mut byte = self.next_byte()?;
        let negative = byte & 0x40 != 0;
        let mut value = u32::from(byte & 0x3F);

        let mut shift = 6;
        let mut used = 1;
        while byte & 0x80 != 0 {
            if used == MAX_VARINT_BYTES {
                self.pos = start;
                return Err(PackError::InvalidVarint);
            }
            byte = match self.next_byte() {
                Ok(byte) => byte,
                Err(err) => {
                    self.pos = start;
                    return Err(err);
                }
            };
            value |= u32::from(byte & 0x7F) << shift;
            shift += 7;
            used += 1;
        }

        let value = value as i32;
        Ok(if negative { !value } else { value })
    }

    fn read_str(&mut self) -> PackResult<&'a str> {
        let start = self.pos;
        let rest = self.rest();
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(PackError::UnterminatedString { start });
        };
        let text = std::str::from_utf8(&rest[..len]).map_err(|_| PackError::InvalidUtf8 { start })?;
        self.pos += len + 1;
        Ok(text)
    }
}
