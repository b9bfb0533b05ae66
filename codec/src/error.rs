//! Error types for compilation, packing, registration and decoding.

use std::fmt;
use std::sync::Arc;

use schema::{Kind, TypeId};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while compiling, activating or packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Primitive encoder error.
    Pack(packer::PackError),

    /// Extended-type registration error.
    Registration(RegistrationError),

    /// The extended range of a kind starts inside its dense range.
    ExtendedRangeOverlap {
        kind: Kind,
        base: TypeId,
        dense_end: TypeId,
    },

    /// More extended types than the configured capacity.
    ExtendedRangeOverflow {
        kind: Kind,
        capacity: usize,
        count: usize,
    },

    /// The reserved extended ranges of two kinds intersect.
    ExtendedRangesCollide { first: Kind, second: Kind },

    /// No compiled type has this id.
    UnknownType { kind: Kind, id: TypeId },

    /// Wrong number of values for a record.
    ValueCountMismatch {
        type_name: String,
        expected: usize,
        found: usize,
    },

    /// A value does not match the storage of its slot.
    ValueTypeMismatch {
        type_name: String,
        slot: String,
        expected: &'static str,
    },

    /// An extended type was never registered.
    UnregisteredExtension {
        extension: String,
        expected: TypeId,
    },

    /// An extended type was registered under another id.
    ExtensionIdMismatch {
        extension: String,
        expected: TypeId,
        found: TypeId,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pack(e) => write!(f, "pack error: {e}"),
            Self::Registration(e) => write!(f, "registration error: {e}"),
            Self::ExtendedRangeOverlap {
                kind,
                base,
                dense_end,
            } => {
                write!(
                    f,
                    "extended {kind} range starts at {base}, inside dense range ending at {dense_end}"
                )
            }
            Self::ExtendedRangeOverflow {
                kind,
                capacity,
                count,
            } => {
                write!(
                    f,
                    "{count} extended {kind} types exceed capacity {capacity}"
                )
            }
            Self::ExtendedRangesCollide { first, second } => {
                write!(f, "extended {first} and {second} ranges overlap")
            }
            Self::UnknownType { kind, id } => write!(f, "unknown {kind} type id {id}"),
            Self::ValueCountMismatch {
                type_name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "'{type_name}' expects {expected} values, got {found}"
                )
            }
            Self::ValueTypeMismatch {
                type_name,
                slot,
                expected,
            } => {
                write!(f, "'{type_name}.{slot}' expects {expected} value")
            }
            Self::UnregisteredExtension {
                extension,
                expected,
            } => {
                write!(
                    f,
                    "extension '{extension}' (id {expected}) was not registered"
                )
            }
            Self::ExtensionIdMismatch {
                extension,
                expected,
                found,
            } => {
                write!(
                    f,
                    "extension '{extension}' registered as {found}, expected {expected}"
                )
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pack(e) => Some(e),
            Self::Registration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<packer::PackError> for CodecError {
    fn from(err: packer::PackError) -> Self {
        Self::Pack(err)
    }
}

impl From<RegistrationError> for CodecError {
    fn from(err: RegistrationError) -> Self {
        Self::Registration(err)
    }
}

/// Errors returned by the [`ExtendedTypeRegistry`](crate::ExtendedTypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Extended ids are strictly positive.
    InvalidId { id: TypeId },

    /// The id is already registered under another name.
    IdTaken {
        id: TypeId,
        existing: String,
        requested: String,
    },

    /// The name is already registered under another id.
    NameTaken {
        name: String,
        existing: TypeId,
        requested: TypeId,
    },

    /// Two names derived the same UUID.
    UuidCollision { name: String, existing: TypeId },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { id } => write!(f, "invalid extended id {id}"),
            Self::IdTaken {
                id,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "id {id} already registered as '{existing}', cannot register '{requested}'"
                )
            }
            Self::NameTaken {
                name,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "'{name}' already registered as {existing}, cannot register as {requested}"
                )
            }
            Self::UuidCollision { name, existing } => {
                write!(f, "uuid of '{name}' collides with id {existing}")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Why a decode call failed.
///
/// Failures are plain values: decoding never panics, and recording a
/// failure never allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    /// No type with this id exists in the kind's dense or extended range.
    TypeOutOfRange { id: TypeId },

    /// The input ran out, or a primitive was malformed.
    UnpackError,

    /// A size-validated snapshot item had the wrong number of bytes.
    SizeMismatch { expected: usize, found: usize },

    /// Retained strings would exceed the handler's limit.
    LimitExceeded { limit: usize },

    /// A message field failed validation.
    Field { name: Arc<str> },
}

impl DecodeFailure {
    /// Reason string: the failing field's name, or a parenthesized marker.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::TypeOutOfRange { .. } => "(type out of range)",
            Self::UnpackError | Self::SizeMismatch { .. } => "(unpack error)",
            Self::LimitExceeded { .. } => "(limit exceeded)",
            Self::Field { name } => name,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeOutOfRange { id } => write!(f, "type id {id} out of range"),
            Self::UnpackError => f.write_str("unpack error"),
            Self::SizeMismatch { expected, found } => {
                write!(f, "unpack error: expected {expected} bytes, found {found}")
            }
            Self::LimitExceeded { limit } => {
                write!(f, "string bytes exceed limit of {limit}")
            }
            Self::Field { name } => write!(f, "failed on '{name}'"),
        }
    }
}

impl std::error::Error for DecodeFailure {}
