//! Reusable decode buffers owned by a handler.

use std::ops::Range;

use packer::Sanitize;

use crate::types::FieldValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotValue {
    Int(i32),
    Str(Range<usize>),
}

/// Slot values of the record being decoded, plus an arena holding its
/// string bytes. Both are sized up front and overwritten by every decode.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    values: Vec<SlotValue>,
    text: String,
}

impl Scratch {
    pub(crate) fn with_capacity(slots: usize, text_bytes: usize) -> Self {
        Self {
            values: Vec::with_capacity(slots),
            text: String::with_capacity(text_bytes),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.text.clear();
    }

    pub(crate) fn push_int(&mut self, value: i32) {
        self.values.push(SlotValue::Int(value));
    }

    /// Appends a sanitized string, or returns `false` if the arena would
    /// grow past `limit` bytes.
    pub(crate) fn push_str(&mut self, raw: &str, sanitize: Sanitize, limit: usize) -> bool {
        if self.text.len().saturating_add(raw.len()) > limit {
            return false;
        }
        let start = self.text.len();
        sanitize.apply_into(raw, &mut self.text);
        self.values.push(SlotValue::Str(start..self.text.len()));
        true
    }

    pub(crate) fn int(&self, index: usize) -> Option<i32> {
        match self.values.get(index)? {
            SlotValue::Int(value) => Some(*value),
            SlotValue::Str(_) => None,
        }
    }

    pub(crate) fn set_int(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = SlotValue::Int(value);
        }
    }

    pub(crate) fn value(&self, index: usize) -> Option<FieldValue<'_>> {
        match self.values.get(index)? {
            SlotValue::Int(value) => Some(FieldValue::Int(*value)),
            SlotValue::Str(range) => self.text.get(range.clone()).map(FieldValue::Str),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}
