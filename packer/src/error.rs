//! Error types for packer operations.

use std::fmt;

/// Result type for packer operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while packing or unpacking primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A bounded packer ran out of room.
    BufferOverflow {
        /// Number of bytes the write needed.
        attempted: usize,
        /// Maximum capacity in bytes.
        capacity: usize,
    },

    /// Variable-length integer continued past its maximum width.
    InvalidVarint,

    /// String ran to the end of the buffer without a NUL terminator.
    UnterminatedString {
        /// Byte offset where the string started.
        start: usize,
    },

    /// String bytes are not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset where the string started.
        start: usize,
    },

    /// Strings are NUL-terminated on the wire and cannot contain NUL.
    InteriorNul {
        /// Byte index of the NUL inside the string.
        index: usize,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::BufferOverflow {
                attempted,
                capacity,
            } => {
                write!(
                    f,
                    "attempted to write {attempted} bytes but buffer capacity is {capacity} bytes"
                )
            }
            Self::InvalidVarint => write!(f, "variable-length integer exceeds 5 bytes"),
            Self::UnterminatedString { start } => {
                write!(f, "string starting at byte {start} has no terminator")
            }
            Self::InvalidUtf8 { start } => {
                write!(f, "string starting at byte {start} is not valid utf-8")
            }
            Self::InteriorNul { index } => {
                write!(f, "string contains a nul byte at index {index}")
            }
        }
    }
}

impl std::error::Error for PackError {}
