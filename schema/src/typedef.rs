//! Type definitions: objects, events and messages.

use std::fmt;

use crate::{FieldDef, FieldSpec};

/// The three record kinds, each with its own identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// Server-authoritative snapshot item. Decoding clamps.
    Object,
    /// Transient snapshot item. Decoding clamps.
    Event,
    /// One-shot peer message. Decoding rejects.
    Message,
}

impl Kind {
    /// All kinds in table order.
    pub const ALL: [Self; 3] = [Self::Object, Self::Event, Self::Message];

    /// Index of the kind in per-kind tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Object => 0,
            Self::Event => 1,
            Self::Message => 2,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Event => "event",
            Self::Message => "message",
        }
    }

    /// Returns `true` for kinds stored as fixed-width snapshot items.
    #[must_use]
    pub const fn is_snapshot_item(self) -> bool {
        matches!(self, Self::Object | Self::Event)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named record: its own fields, an optional base, an optional extension
/// identifier and its validation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDef {
    pub kind: Kind,
    pub name: String,
    /// Name of the base type of the same kind.
    pub base: Option<String>,
    /// Fields declared directly on this type.
    pub fields: Vec<FieldDef>,
    /// Globally unique identifier of an extended type.
    pub extension: Option<String>,
    pub validate_exact_size: bool,
    /// Whether the historian records this message.
    pub recordable: bool,
}

impl TypeDef {
    /// Creates an empty definition of the given kind.
    #[must_use]
    pub fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            base: None,
            fields: Vec::new(),
            extension: None,
            validate_exact_size: true,
            recordable: true,
        }
    }

    /// Creates an object definition.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(Kind::Object, name)
    }

    /// Creates an event definition.
    #[must_use]
    pub fn event(name: impl Into<String>) -> Self {
        Self::new(Kind::Event, name)
    }

    /// Creates a message definition.
    #[must_use]
    pub fn message(name: impl Into<String>) -> Self {
        Self::new(Kind::Message, name)
    }

    /// Sets the base type.
    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Appends a field, assigning the next declaration index.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let order = u32::try_from(self.fields.len()).unwrap_or(u32::MAX);
        self.fields.push(FieldDef::new(name, spec, order));
        self
    }

    /// Marks the type as extended, identified by `extension`.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Allows wire input whose size differs from the layout size.
    #[must_use]
    pub fn unvalidated_size(mut self) -> Self {
        self.validate_exact_size = false;
        self
    }

    /// Excludes the message from historian recording.
    #[must_use]
    pub fn not_recordable(mut self) -> Self {
        self.recordable = false;
        self
    }

    /// Returns `true` if the type lives in the extended range.
    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }
}
