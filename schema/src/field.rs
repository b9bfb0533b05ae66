//! Field kinds and field definitions.

/// Post-decode sanitization applied to a string field.
///
/// All policies share the same wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringPolicy {
    /// No sanitization.
    Raw,
    /// Control characters are replaced with spaces.
    ControlChars,
    /// Control characters are replaced and leading whitespace is skipped.
    ControlCharsTrimmed,
}

/// The kind of a field, including its validation rule and default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldSpec {
    /// Any 32-bit integer.
    IntAny { default: Option<i32> },

    /// Integer constrained to `[min, max]`.
    IntRange {
        min: i32,
        max: i32,
        default: Option<i32>,
    },

    /// Integer constrained to `{0, 1}`.
    Bool { default: Option<i32> },

    /// Game tick. Unconstrained like [`FieldSpec::IntAny`].
    Tick { default: Option<i32> },

    /// Enumeration index in `[0, count)`.
    Enum { count: i32, default: Option<i32> },

    /// Bit set whose bits must be a subset of `mask`.
    Flags { mask: i32, default: Option<i32> },

    /// NUL-terminated string. Strings never carry a default.
    String(StringPolicy),

    /// `count` consecutive elements of `inner`.
    FixedArray { inner: Box<FieldSpec>, count: usize },
}

/// Storage shape of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int,
    Str,
}

/// Storage shape of a field, as laid out in a compiled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// A single integer slot.
    Int,
    /// A single string slot.
    Str,
    /// A block of `count` consecutive element slots.
    Block { element: Scalar, count: usize },
}

impl FieldSpec {
    /// Creates an unconstrained integer field.
    #[must_use]
    pub const fn int_any() -> Self {
        Self::IntAny { default: None }
    }

    /// Creates an integer field constrained to `[min, max]`.
    #[must_use]
    pub const fn int_range(min: i32, max: i32) -> Self {
        Self::IntRange {
            min,
            max,
            default: None,
        }
    }

    /// Creates a boolean field.
    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool { default: None }
    }

    /// Creates a tick field.
    #[must_use]
    pub const fn tick() -> Self {
        Self::Tick { default: None }
    }

    /// Creates an enumeration field with `count` values.
    #[must_use]
    pub const fn enumeration(count: i32) -> Self {
        Self::Enum {
            count,
            default: None,
        }
    }

    /// Creates a flags field allowing the bits in `mask`.
    #[must_use]
    pub const fn flags(mask: i32) -> Self {
        Self::Flags {
            mask,
            default: None,
        }
    }

    /// Creates an unsanitized string field.
    #[must_use]
    pub const fn string() -> Self {
        Self::String(StringPolicy::Raw)
    }

    /// Creates a string field with control characters replaced.
    #[must_use]
    pub const fn string_half_strict() -> Self {
        Self::String(StringPolicy::ControlChars)
    }

    /// Creates a string field with control characters replaced and leading
    /// whitespace skipped.
    #[must_use]
    pub const fn string_strict() -> Self {
        Self::String(StringPolicy::ControlCharsTrimmed)
    }

    /// Creates a fixed-size array of `count` elements.
    #[must_use]
    pub fn array(inner: Self, count: usize) -> Self {
        Self::FixedArray {
            inner: Box::new(inner),
            count,
        }
    }

    /// Sets the default value.
    ///
    /// For arrays the default applies to every element. Strings have no
    /// default and are returned unchanged.
    #[must_use]
    pub fn with_default(self, value: i32) -> Self {
        match self {
            Self::IntAny { .. } => Self::IntAny {
                default: Some(value),
            },
            Self::IntRange { min, max, .. } => Self::IntRange {
                min,
                max,
                default: Some(value),
            },
            Self::Bool { .. } => Self::Bool {
                default: Some(value),
            },
            Self::Tick { .. } => Self::Tick {
                default: Some(value),
            },
            Self::Enum { count, .. } => Self::Enum {
                count,
                default: Some(value),
            },
            Self::Flags { mask, .. } => Self::Flags {
                mask,
                default: Some(value),
            },
            Self::String(policy) => Self::String(policy),
            Self::FixedArray { inner, count } => Self::FixedArray {
                inner: Box::new(inner.with_default(value)),
                count,
            },
        }
    }

    /// Returns the default value of the field (of each element for arrays).
    #[must_use]
    pub fn default_value(&self) -> Option<i32> {
        match self {
            Self::IntAny { default }
            | Self::IntRange { default, .. }
            | Self::Tick { default }
            | Self::Enum { default, .. }
            | Self::Bool { default }
            | Self::Flags { default, .. } => *default,
            Self::String(_) => None,
            Self::FixedArray { inner, .. } => inner.default_value(),
        }
    }

    /// Returns the inclusive range checked on decode, if any.
    #[must_use]
    pub fn range(&self) -> Option<(i32, i32)> {
        match self {
            Self::IntRange { min, max, .. } => Some((*min, *max)),
            Self::Bool { .. } => Some((0, 1)),
            Self::Enum { count, .. } => Some((0, count.saturating_sub(1))),
            Self::FixedArray { inner, .. } => inner.range(),
            Self::IntAny { .. } | Self::Tick { .. } | Self::Flags { .. } | Self::String(_) => {
                None
            }
        }
    }

    /// Returns the allowed bit mask of a flags field.
    #[must_use]
    pub fn mask(&self) -> Option<i32> {
        match self {
            Self::Flags { mask, .. } => Some(*mask),
            Self::FixedArray { inner, .. } => inner.mask(),
            _ => None,
        }
    }

    /// Returns the string policy of a string field (or string array).
    #[must_use]
    pub fn string_policy(&self) -> Option<StringPolicy> {
        match self {
            Self::String(policy) => Some(*policy),
            Self::FixedArray { inner, .. } => inner.string_policy(),
            _ => None,
        }
    }

    /// Returns `true` if the field (or its element) is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.string_policy().is_some()
    }

    /// Returns the element spec: `inner` for arrays, `self` otherwise.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::FixedArray { inner, .. } => inner,
            _ => self,
        }
    }

    /// Declares the storage shape used to lay out a record.
    #[must_use]
    pub fn declare(&self) -> Storage {
        let scalar = if self.is_string() {
            Scalar::Str
        } else {
            Scalar::Int
        };
        match (self, scalar) {
            (Self::FixedArray { count, .. }, element) => Storage::Block {
                element,
                count: *count,
            },
            (_, Scalar::Int) => Storage::Int,
            (_, Scalar::Str) => Storage::Str,
        }
    }

    /// Number of value slots the field occupies.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self {
            Self::FixedArray { count, .. } => *count,
            _ => 1,
        }
    }

    /// Returns `true` if `value` passes the message-dialect check.
    #[must_use]
    pub fn accepts(&self, value: i32) -> bool {
        if let Some((min, max)) = self.range() {
            return (min..=max).contains(&value);
        }
        if let Some(mask) = self.mask() {
            return value & !mask == 0;
        }
        true
    }
}

/// A named field in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    pub name: String,
    pub spec: FieldSpec,
    /// Declaration index within the owning type.
    pub order: u32,
}

impl FieldDef {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, spec: FieldSpec, order: u32) -> Self {
        Self {
            name: name.into(),
            spec,
            order,
        }
    }
}
