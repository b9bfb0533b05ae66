//! Byte writer for encoding wire records.

use crate::error::{PackError, PackResult};
use crate::MAX_VARINT_BYTES;

/// A writer for the primitive wire encodings.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer.
#[derive(Debug, Default)]
pub struct Packer {
    bytes: Vec<u8>,
    /// Upper bound on the buffer length, if any.
    capacity: Option<usize>,
}

impl Packer {
    /// Creates a new unbounded `Packer`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new unbounded `Packer` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            capacity: None,
        }
    }

    /// Creates a `Packer` that refuses to grow past `max_bytes`.
    #[must_use]
    pub fn bounded(max_bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(max_bytes),
            capacity: Some(max_bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes a variable-length integer.
    ///
    /// The first byte carries an extension bit, a sign bit and six data bits;
    /// every following byte carries an extension bit and seven data bits.
    /// Negative values are stored as their one's complement.
    pub fn add_int(&mut self, value: i32) -> PackResult<()> {
        let mut buf = [0u8; MAX_VARINT_BYTES];
        let len = encode_varint(value, &mut buf);
        self.push(&buf[..len])
    }

    /// Writes a fixed-width little-endian integer (snapshot item encoding).
    pub fn add_uncompressed_int(&mut self, value: i32) -> PackResult<()> {
        self.push(&value.to_le_bytes())
    }

    /// Writes a NUL-terminated string.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InteriorNul`] if `value` contains a NUL byte.
    pub fn add_string(&mut self, value: &str) -> PackResult<()> {
        if let Some(index) = value.bytes().position(|b| b == 0) {
            return Err(PackError::InteriorNul { index });
        }
        self.ensure_room(value.len() + 1)?;
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        Ok(())
    }

    /// Writes raw bytes with no framing.
    pub fn add_raw(&mut self, data: &[u8]) -> PackResult<()> {
        self.push(data)
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }

    /// Clears the buffer, keeping its allocation.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    fn push(&mut self, data: &[u8]) -> PackResult<()> {
        self.ensure_room(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn ensure_room(&self, additional: usize) -> PackResult<()> {
        if let Some(capacity) = self.capacity {
            let attempted = self.bytes.len() + additional;
            if attempted > capacity {
                return Err(PackError::BufferOverflow {
                    attempted,
                    capacity,
                });
            }
        }
        Ok(())
    }
}

/// Encodes `value` into `out`, returning the number of bytes used.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn encode_varint(value: i32, out: &mut [u8; MAX_VARINT_BYTES]) -> usize {
    let sign = if value < 0 { 0x40 } else { 0 };
    let magnitude = if value < 0 { !value } else { value };
    let mut rest = magnitude as u32;

    out[0] = sign | (rest & 0x3F) as u8;
    rest >>= 6;
    let mut len = 1;
    while rest != 0 {
        out[len - 1] |= 0x80;
        out[len] = (rest & 0x7F) as u8;
        rest >>= 7;
        len += 1;
    }
    len
}
