//! Deterministic registry hashing and extended-type UUIDs.

use blake3::Hasher;
use uuid::Uuid;

use crate::{FieldSpec, Kind, Registry, StringPolicy, TypeDef};

/// Namespace of extended-type UUIDs (`e05ddaaa-c4e6-4cfb-b642-5d48e80c0029`).
const EXTENSION_NAMESPACE: Uuid = Uuid::from_bytes([
    0xe0, 0x5d, 0xda, 0xaa, 0xc4, 0xe6, 0x4c, 0xfb, 0xb6, 0x42, 0x5d, 0x48, 0xe8, 0x0c, 0x00, 0x29,
]);

/// Computes a deterministic fingerprint of a registry.
///
/// Covers kinds, names, declaration order, bases, fields and flags, so two
/// peers can confirm they were built from the same registry.
#[must_use]
pub fn registry_hash(registry: &Registry) -> u64 {
    let mut hasher = Hasher::new();
    for kind in Kind::ALL {
        let defs = registry.types(kind);
        write_u8(&mut hasher, kind_tag(kind));
        write_len(&mut hasher, defs.len());
        for def in defs {
            write_type(&mut hasher, def);
        }
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

/// Derives the 16-byte UUID that identifies an extended type on the wire.
///
/// The UUID is the name-based (MD5, version 3) UUID of the extension string
/// in the extended-type namespace, so peers of either protocol generation
/// derive the same bytes for the same extension.
#[must_use]
pub fn extension_uuid(extension: &str) -> [u8; 16] {
    Uuid::new_v3(&EXTENSION_NAMESPACE, extension.as_bytes()).into_bytes()
}

const fn kind_tag(kind: Kind) -> u8 {
    match kind {
        Kind::Object => 0,
        Kind::Event => 1,
        Kind::Message => 2,
    }
}

fn write_type(hasher: &mut Hasher, def: &TypeDef) {
    write_str(hasher, &def.name);
    write_opt_str(hasher, def.base.as_deref());
    write_opt_str(hasher, def.extension.as_deref());
    write_u8(hasher, u8::from(def.validate_exact_size));
    write_u8(hasher, u8::from(def.recordable));
    write_len(hasher, def.fields.len());
    for field in &def.fields {
        write_str(hasher, &field.name);
        write_u32(hasher, field.order);
        write_spec(hasher, &field.spec);
    }
}

fn write_spec(hasher: &mut Hasher, spec: &FieldSpec) {
    match spec {
        FieldSpec::IntAny { default } => {
            write_u8(hasher, 0);
            write_default(hasher, *default);
        }
        FieldSpec::IntRange { min, max, default } => {
            write_u8(hasher, 1);
            write_i32(hasher, *min);
            write_i32(hasher, *max);
            write_default(hasher, *default);
        }
        FieldSpec::Bool { default } => {
            write_u8(hasher, 2);
            write_default(hasher, *default);
        }
        FieldSpec::Tick { default } => {
            write_u8(hasher, 3);
            write_default(hasher, *default);
        }
        FieldSpec::Enum { count, default } => {
            write_u8(hasher, 4);
            write_i32(hasher, *count);
            write_default(hasher, *default);
        }
        FieldSpec::Flags { mask, default } => {
            write_u8(hasher, 5);
            write_i32(hasher, *mask);
            write_default(hasher, *default);
        }
        FieldSpec::String(policy) => {
            write_u8(hasher, 6);
            write_u8(
                hasher,
                match policy {
                    StringPolicy::Raw => 0,
                    StringPolicy::ControlChars => 1,
                    StringPolicy::ControlCharsTrimmed => 2,
                },
            );
        }
        FieldSpec::FixedArray { inner, count } => {
            write_u8(hasher, 7);
            write_len(hasher, *count);
            write_spec(hasher, inner);
        }
    }
}

fn write_default(hasher: &mut Hasher, default: Option<i32>) {
    match default {
        Some(value) => {
            write_u8(hasher, 1);
            write_i32(hasher, value);
        }
        None => write_u8(hasher, 0),
    }
}

fn write_opt_str(hasher: &mut Hasher, value: Option<&str>) {
    match value {
        Some(value) => {
            write_u8(hasher, 1);
            write_str(hasher, value);
        }
        None => write_u8(hasher, 0),
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn write_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_i32(hasher: &mut Hasher, value: i32) {
    hasher.update(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(defs: Vec<TypeDef>) -> Registry {
        Registry::builder().extend(defs).build().unwrap()
    }

    #[test]
    fn registry_hash_is_stable() {
        let make = || {
            registry(vec![
                TypeDef::object("Pickup").field("m_X", FieldSpec::int_any()),
                TypeDef::message("Sv_Chat").field("m_Team", FieldSpec::int_range(-2, 3)),
            ])
        };
        assert_eq!(registry_hash(&make()), registry_hash(&make()));
    }

    #[test]
    fn registry_hash_changes_with_type_order() {
        let a = TypeDef::message("A");
        let b = TypeDef::message("B");
        assert_ne!(
            registry_hash(&registry(vec![a.clone(), b.clone()])),
            registry_hash(&registry(vec![b, a]))
        );
    }

    #[test]
    fn registry_hash_changes_with_field_range() {
        let a = registry(vec![TypeDef::message("M").field("f", FieldSpec::int_range(0, 3))]);
        let b = registry(vec![TypeDef::message("M").field("f", FieldSpec::int_range(0, 4))]);
        assert_ne!(registry_hash(&a), registry_hash(&b));
    }

    #[test]
    fn registry_hash_changes_with_recordable_flag() {
        let a = registry(vec![TypeDef::message("Cl_Vote")]);
        let b = registry(vec![TypeDef::message("Cl_Vote").not_recordable()]);
        assert_ne!(registry_hash(&a), registry_hash(&b));
    }

    #[test]
    fn registry_hash_distinguishes_kinds() {
        let a = registry(vec![TypeDef::object("X")]);
        let b = registry(vec![TypeDef::event("X")]);
        assert_ne!(registry_hash(&a), registry_hash(&b));
    }

    #[test]
    fn extension_uuid_is_deterministic_and_distinct() {
        let a = extension_uuid("my-game-object@ddnet.tw");
        assert_eq!(a, extension_uuid("my-game-object@ddnet.tw"));
        assert_ne!(a, extension_uuid("character@netobj.ddnet.tw"));
    }

    #[test]
    fn extension_uuid_sets_version_and_variant() {
        let uuid = extension_uuid("player@netobj.ddnet.tw");
        assert_eq!(uuid[6] >> 4, 3);
        assert_eq!(uuid[8] >> 6, 0b10);
    }

    #[test]
    fn extension_uuid_matches_known_name() {
        let uuid = Uuid::from_bytes(extension_uuid("test@ddnet.tw"));
        assert_eq!(uuid.to_string(), "a1eb7182-796e-3b3e-941d-38ca71b2a4a8");
    }

    #[test]
    fn kind_tags_are_distinct() {
        let tags: Vec<u8> = Kind::ALL.iter().map(|&kind| kind_tag(kind)).collect();
        assert_eq!(tags, vec![0, 1, 2]);
    }
}
