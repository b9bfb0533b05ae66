//! Compile options and handler limits.

use schema::{Kind, TypeId};

/// Options controlling identifier assignment during compilation.
///
/// Each kind reserves `[extended_base, extended_base + extended_capacity)` for
/// its extended types. The reserved range must not overlap the kind's dense
/// range or the extended range of another kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// First extended object id.
    pub object_extended_base: TypeId,
    /// First extended event id.
    pub event_extended_base: TypeId,
    /// First extended message id.
    pub message_extended_base: TypeId,
    /// Maximum number of extended types per kind.
    pub extended_capacity: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            object_extended_base: 0x1_0000,
            event_extended_base: 0x2_0000,
            message_extended_base: 0x3_0000,
            extended_capacity: 0x1_0000,
        }
    }
}

impl CompileOptions {
    /// Creates options suitable for testing with small ranges.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            object_extended_base: 0x100,
            event_extended_base: 0x200,
            message_extended_base: 0x300,
            extended_capacity: 0x100,
        }
    }

    /// First extended id of `kind`.
    #[must_use]
    pub const fn extended_base(&self, kind: Kind) -> TypeId {
        match kind {
            Kind::Object => self.object_extended_base,
            Kind::Event => self.event_extended_base,
            Kind::Message => self.message_extended_base,
        }
    }

    /// Sets the first extended id of `kind`.
    #[must_use]
    pub fn with_extended_base(mut self, kind: Kind, base: TypeId) -> Self {
        match kind {
            Kind::Object => self.object_extended_base = base,
            Kind::Event => self.event_extended_base = base,
            Kind::Message => self.message_extended_base = base,
        }
        self
    }

    /// Sets the extended capacity of every kind.
    #[must_use]
    pub const fn with_extended_capacity(mut self, capacity: usize) -> Self {
        self.extended_capacity = capacity;
        self
    }
}

/// Limits enforced by a [`Handler`](crate::Handler) while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerLimits {
    /// Maximum total string bytes retained by one decode.
    pub max_string_bytes: usize,
}

impl Default for HandlerLimits {
    fn default() -> Self {
        Self {
            max_string_bytes: 4096,
        }
    }
}

impl HandlerLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_string_bytes: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_string_bytes: usize::MAX,
        }
    }
}
