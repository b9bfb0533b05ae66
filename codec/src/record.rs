//! Views over a handler's decoded output.

use schema::{Kind, TypeId};

use crate::layout::CompiledLayout;
use crate::scratch::Scratch;
use crate::types::{FieldValue, Value};

/// A decoded record, borrowed from the handler that produced it.
///
/// Valid until the next decode call on the same handler.
#[derive(Debug, Clone, Copy)]
pub struct Record<'h> {
    layout: &'h CompiledLayout,
    scratch: &'h Scratch,
}

impl<'h> Record<'h> {
    pub(crate) const fn new(layout: &'h CompiledLayout, scratch: &'h Scratch) -> Self {
        Self { layout, scratch }
    }

    #[must_use]
    pub const fn layout(&self) -> &'h CompiledLayout {
        self.layout
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.layout.kind
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.layout.id
    }

    #[must_use]
    pub fn name(&self) -> &'h str {
        &self.layout.name
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scratch.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the slot at `index`, in flattened order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<FieldValue<'h>> {
        self.scratch.value(index)
    }

    /// Value of the slot named `name` (array elements are `base[i]`).
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<FieldValue<'h>> {
        self.get(self.layout.slot_index(name)?)
    }

    /// Integer value of the slot named `name`.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i32> {
        self.get_by_name(name)?.as_int()
    }

    /// String value of the slot named `name`.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&'h str> {
        self.get_by_name(name)?.as_str()
    }

    /// `(slot name, value)` pairs in flattened order.
    pub fn iter(&self) -> impl Iterator<Item = (&'h str, FieldValue<'h>)> + 'h {
        let scratch = self.scratch;
        self.layout
            .slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| Some((&*slot.name, scratch.value(index)?)))
    }

    /// Copies the record into owned values, suitable for packing.
    #[must_use]
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().map(|(_, value)| value.to_owned_value()).collect()
    }
}

/// Output of a decode call.
#[derive(Debug, Clone, Copy)]
pub enum Decoded<'h> {
    /// A record of a dense or extended type.
    Record(Record<'h>),
    /// The sentinel id was decoded: the UUID of an extended type follows.
    ExtendedUuid([u8; 16]),
}

impl<'h> Decoded<'h> {
    /// Returns the record, if this is one.
    #[must_use]
    pub const fn record(self) -> Option<Record<'h>> {
        match self {
            Self::Record(record) => Some(record),
            Self::ExtendedUuid(_) => None,
        }
    }

    /// Returns the UUID payload, if this is one.
    #[must_use]
    pub const fn uuid(self) -> Option<[u8; 16]> {
        match self {
            Self::Record(_) => None,
            Self::ExtendedUuid(uuid) => Some(uuid),
        }
    }
}
