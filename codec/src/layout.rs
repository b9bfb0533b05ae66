//! Compiled record layouts and the pack routine.

use std::sync::Arc;

use packer::{Packer, Sanitize};
use schema::{FieldDef, FieldSpec, Kind, Scalar, Storage, StringPolicy, TypeId};

use crate::error::{CodecError, CodecResult};
use crate::types::{Value, INT_SLOT_SIZE, STR_SLOT_SIZE};

/// A field of a flattened layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub name: Arc<str>,
    pub spec: FieldSpec,
    /// Index of the field's first slot.
    pub first_slot: usize,
}

/// One scalar value position in a record. Arrays expand to one slot per
/// element, named `base[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: Arc<str>,
    /// Index into [`CompiledLayout::fields`].
    pub field: usize,
    pub storage: Scalar,
}

/// The compiled form of one type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLayout {
    pub kind: Kind,
    pub name: Arc<str>,
    pub id: TypeId,
    pub extension: Option<Arc<str>>,
    pub uuid: Option<[u8; 16]>,
    /// Flattened fields, base fields first.
    pub fields: Vec<LayoutField>,
    pub slots: Vec<Slot>,
    pub validate_exact_size: bool,
    pub recordable: bool,
}

impl CompiledLayout {
    pub(crate) fn new(
        kind: Kind,
        id: TypeId,
        def: &schema::TypeDef,
        flattened: &[&FieldDef],
    ) -> Self {
        let mut fields = Vec::with_capacity(flattened.len());
        let mut slots = Vec::new();
        for (index, field) in flattened.iter().enumerate() {
            let name: Arc<str> = Arc::from(field.name.as_str());
            fields.push(LayoutField {
                name: Arc::clone(&name),
                spec: field.spec.clone(),
                first_slot: slots.len(),
            });
            match field.spec.declare() {
                Storage::Int => slots.push(Slot {
                    name,
                    field: index,
                    storage: Scalar::Int,
                }),
                Storage::Str => slots.push(Slot {
                    name,
                    field: index,
                    storage: Scalar::Str,
                }),
                Storage::Block { element, count } => {
                    slots.extend((0..count).map(|i| Slot {
                        name: Arc::from(format!("{name}[{i}]")),
                        field: index,
                        storage: element,
                    }));
                }
            }
        }

        Self {
            kind,
            name: Arc::from(def.name.as_str()),
            id,
            extension: def.extension.as_deref().map(Arc::from),
            uuid: def.extension.as_deref().map(schema::extension_uuid),
            fields,
            slots,
            validate_exact_size: def.validate_exact_size,
            recordable: def.recordable,
        }
    }

    /// Returns `true` if the type lives in the extended range.
    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of string slots.
    #[must_use]
    pub fn string_slot_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.storage == Scalar::Str)
            .count()
    }

    /// Byte size of a snapshot item on the wire (4 bytes per slot).
    ///
    /// Messages have no fixed wire size and report 0.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        if self.kind.is_snapshot_item() {
            self.slots.len() * INT_SLOT_SIZE
        } else {
            0
        }
    }

    /// Declared size: the wire size that input must match exactly, or 0
    /// when the size is not validated.
    #[must_use]
    pub fn size(&self) -> usize {
        if self.validate_exact_size {
            self.wire_size()
        } else {
            0
        }
    }

    /// In-memory size of the decoded record.
    #[must_use]
    pub fn unpacked_size(&self) -> usize {
        let strings = self.string_slot_count();
        (self.slots.len() - strings) * INT_SLOT_SIZE + strings * STR_SLOT_SIZE
    }

    /// Index of the slot with the given name.
    #[must_use]
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| &*slot.name == name)
    }

    /// Spec of the value held by a slot (the element spec for arrays).
    #[must_use]
    pub fn slot_spec(&self, slot: usize) -> Option<&FieldSpec> {
        let slot = self.slots.get(slot)?;
        Some(self.fields[slot.field].spec.element())
    }

    /// Packs `values` in flattened order.
    ///
    /// Snapshot items use fixed-width integers; messages use variable-length
    /// integers and NUL-terminated strings. Values are not range-checked.
    pub fn pack(&self, values: &[Value], packer: &mut Packer) -> CodecResult<()> {
        if values.len() != self.slots.len() {
            return Err(CodecError::ValueCountMismatch {
                type_name: self.name.to_string(),
                expected: self.slots.len(),
                found: values.len(),
            });
        }

        for (slot, value) in self.slots.iter().zip(values) {
            match (slot.storage, value) {
                (Scalar::Int, Value::Int(v)) if self.kind.is_snapshot_item() => {
                    packer.add_uncompressed_int(*v)?;
                }
                (Scalar::Int, Value::Int(v)) => packer.add_int(*v)?,
                (Scalar::Str, Value::Str(s)) => packer.add_string(s)?,
                (storage, _) => {
                    return Err(CodecError::ValueTypeMismatch {
                        type_name: self.name.to_string(),
                        slot: slot.name.to_string(),
                        expected: match storage {
                            Scalar::Int => "an integer",
                            Scalar::Str => "a string",
                        },
                    });
                }
            }
        }
        Ok(())
    }
}

pub(crate) const fn sanitize_for(policy: StringPolicy) -> Sanitize {
    match policy {
        StringPolicy::Raw => Sanitize::None,
        StringPolicy::ControlChars => Sanitize::ControlChars,
        StringPolicy::ControlCharsTrimmed => Sanitize::ControlCharsTrimStart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::TypeDef;

    fn layout(def: &TypeDef) -> CompiledLayout {
        let flattened: Vec<&FieldDef> = def.fields.iter().collect();
        CompiledLayout::new(def.kind, 1, def, &flattened)
    }

    #[test]
    fn arrays_expand_to_named_slots() {
        let def = TypeDef::object("SwitchState")
            .field("m_HighestSwitchNumber", FieldSpec::int_any())
            .field("m_aStatus", FieldSpec::array(FieldSpec::int_any(), 3));
        let layout = layout(&def);
        let names: Vec<&str> = layout.slots.iter().map(|s| &*s.name).collect();
        assert_eq!(
            names,
            vec![
                "m_HighestSwitchNumber",
                "m_aStatus[0]",
                "m_aStatus[1]",
                "m_aStatus[2]"
            ]
        );
        assert_eq!(layout.fields[1].first_slot, 1);
        assert_eq!(layout.wire_size(), 16);
        assert_eq!(layout.size(), 16);
    }

    #[test]
    fn unvalidated_size_reports_zero() {
        let def = TypeDef::object("Ex")
            .unvalidated_size()
            .field("m_A", FieldSpec::int_any().with_default(0));
        let layout = layout(&def);
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.wire_size(), 4);
        assert_eq!(layout.unpacked_size(), 4);
    }

    #[test]
    fn message_sizes() {
        let def = TypeDef::message("Sv_Chat")
            .field("m_Team", FieldSpec::int_range(-2, 3))
            .field("m_pMessage", FieldSpec::string());
        let layout = layout(&def);
        assert_eq!(layout.wire_size(), 0);
        assert_eq!(layout.unpacked_size(), INT_SLOT_SIZE + STR_SLOT_SIZE);
        assert_eq!(layout.slot_index("m_pMessage"), Some(1));
    }

    #[test]
    fn pack_snapshot_item_uses_fixed_width() {
        let def = TypeDef::object("Pos")
            .field("m_X", FieldSpec::int_any())
            .field("m_Y", FieldSpec::int_any());
        let mut packer = Packer::new();
        layout(&def)
            .pack(&[Value::Int(1), Value::Int(-1)], &mut packer)
            .unwrap();
        assert_eq!(packer.finish(), vec![1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn pack_message_uses_varints() {
        let def = TypeDef::message("Sv_Chat")
            .field("m_Team", FieldSpec::int_range(-2, 3))
            .field("m_pMessage", FieldSpec::string());
        let mut packer = Packer::new();
        layout(&def)
            .pack(&[Value::Int(-1), Value::from("hi")], &mut packer)
            .unwrap();
        assert_eq!(packer.finish(), vec![0x40, b'h', b'i', 0]);
    }

    #[test]
    fn pack_rejects_wrong_values() {
        let def = TypeDef::message("M").field("m_Text", FieldSpec::string());
        let layout = layout(&def);
        let mut packer = Packer::new();
        assert!(matches!(
            layout.pack(&[], &mut packer),
            Err(CodecError::ValueCountMismatch { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            layout.pack(&[Value::Int(1)], &mut packer),
            Err(CodecError::ValueTypeMismatch { expected: "a string", .. })
        ));
    }

    #[test]
    fn extension_uuid_attached() {
        let def = TypeDef::message("Cl_Ex").extension("ex@example.org");
        let layout = layout(&def);
        assert!(layout.is_extended());
        assert_eq!(layout.uuid, Some(schema::extension_uuid("ex@example.org")));
    }
}
