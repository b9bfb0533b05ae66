//! Schema validation errors.

use std::fmt;

use crate::Kind;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a registry.
///
/// Every variant is fatal: a registry that fails validation is never
/// constructed, so nothing downstream ever sees a partial schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A type definition was placed in the list of another kind.
    KindMismatch {
        name: String,
        expected: Kind,
        found: Kind,
    },

    /// Two types of the same kind share a name.
    DuplicateTypeName { kind: Kind, name: String },

    /// A base reference names no type of the same kind.
    UnknownBase {
        kind: Kind,
        name: String,
        base: String,
    },

    /// The base chain of a type loops back on itself.
    CyclicBase { kind: Kind, name: String },

    /// A field name appears twice in a flattened layout.
    DuplicateFieldName { type_name: String, field: String },

    /// A type whose size is not validated has a field without a default.
    MissingDefault { type_name: String, field: String },

    /// Integer range with `min > max`.
    InvalidRange {
        type_name: String,
        field: String,
        min: i32,
        max: i32,
    },

    /// Declared default lies outside the field's valid values.
    DefaultOutOfRange {
        type_name: String,
        field: String,
        default: i32,
    },

    /// Fixed-size array with zero elements.
    EmptyArray { type_name: String, field: String },

    /// Fixed-size array whose element is itself an array.
    NestedArray { type_name: String, field: String },

    /// Objects and events are made of fixed-width integers only.
    StringInSnapshotItem {
        kind: Kind,
        type_name: String,
        field: String,
    },

    /// Two extended types of one kind share an extension identifier.
    DuplicateExtension { kind: Kind, extension: String },

    /// A size-validated type extends a type whose size is not validated.
    SizeValidationMismatch { type_name: String, base: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch {
                name,
                expected,
                found,
            } => {
                write!(f, "{found} '{name}' declared among {expected}s")
            }
            Self::DuplicateTypeName { kind, name } => {
                write!(f, "duplicate {kind} name '{name}'")
            }
            Self::UnknownBase { kind, name, base } => {
                write!(f, "{kind} '{name}' extends unknown base '{base}'")
            }
            Self::CyclicBase { kind, name } => {
                write!(f, "{kind} '{name}' has a cyclic base chain")
            }
            Self::DuplicateFieldName { type_name, field } => {
                write!(f, "field '{field}' declared twice in '{type_name}'")
            }
            Self::MissingDefault { type_name, field } => {
                write!(
                    f,
                    "field '{field}' in '{type_name}' has no default, but '{type_name}' is not size-validated"
                )
            }
            Self::InvalidRange {
                type_name,
                field,
                min,
                max,
            } => {
                write!(f, "field '{type_name}.{field}' has invalid range [{min}, {max}]")
            }
            Self::DefaultOutOfRange {
                type_name,
                field,
                default,
            } => {
                write!(
                    f,
                    "default {default} of field '{type_name}.{field}' is out of range"
                )
            }
            Self::EmptyArray { type_name, field } => {
                write!(f, "array field '{type_name}.{field}' has no elements")
            }
            Self::NestedArray { type_name, field } => {
                write!(f, "array field '{type_name}.{field}' nests another array")
            }
            Self::StringInSnapshotItem {
                kind,
                type_name,
                field,
            } => {
                write!(
                    f,
                    "{kind} '{type_name}' cannot carry string field '{field}'"
                )
            }
            Self::DuplicateExtension { kind, extension } => {
                write!(f, "duplicate {kind} extension '{extension}'")
            }
            Self::SizeValidationMismatch { type_name, base } => {
                write!(
                    f,
                    "size-validated '{type_name}' extends '{base}', whose size is not validated"
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
