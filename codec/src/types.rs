//! Core identifiers and value types for the codec.

use schema::TypeId;

/// Identifier 0: "invalid" in the name tables, and the sentinel announcing
/// a UUID payload for an extended type.
pub const EXTENDED_SENTINEL: TypeId = 0;

/// Name reported for identifier 0.
pub const INVALID_NAME: &str = "invalid";

/// Name reported for identifiers outside every table.
pub const OUT_OF_RANGE_NAME: &str = "(out of range)";

/// Size in bytes of an extended-type UUID payload.
pub const UUID_SIZE: usize = 16;

/// In-memory size of an integer slot.
pub const INT_SLOT_SIZE: usize = 4;

/// In-memory size of a string slot (a reference to the string bytes).
pub const STR_SLOT_SIZE: usize = 8;

/// An owned slot value, used to pack records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Str(String),
}

impl Value {
    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Returns the string, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(value) => Some(value),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Int(i32::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// A borrowed slot value of a decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i32),
    Str(&'a str),
}

impl<'a> FieldValue<'a> {
    #[must_use]
    pub const fn as_int(self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(value),
            Self::Str(_) => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> Option<&'a str> {
        match self {
            Self::Int(_) => None,
            Self::Str(value) => Some(value),
        }
    }

    /// Converts to an owned [`Value`].
    #[must_use]
    pub fn to_owned_value(self) -> Value {
        match self {
            Self::Int(value) => Value::Int(value),
            Self::Str(value) => Value::Str(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(5), Value::Int(5));
        assert_eq!(Value::from(true), Value::Int(1));
        assert_eq!(Value::from("hi"), Value::Str("hi".to_string()));
        assert_eq!(Value::from(7).as_int(), Some(7));
        assert_eq!(Value::from("x").as_int(), None);
    }

    #[test]
    fn field_value_to_owned() {
        assert_eq!(FieldValue::Str("gg").to_owned_value(), Value::from("gg"));
        assert_eq!(FieldValue::Int(-1).as_int(), Some(-1));
        assert_eq!(FieldValue::Int(-1).as_str(), None);
    }

    #[test]
    fn sentinel_is_zero() {
        assert_eq!(EXTENDED_SENTINEL, 0);
        assert_eq!(UUID_SIZE, 16);
    }
}
