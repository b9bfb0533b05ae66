//! The extended-type registry: runtime ids for string-identified types.

use std::collections::{BTreeMap, HashMap};

use schema::TypeId;

use crate::compiler::CompiledProtocol;
use crate::error::RegistrationError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    uuid: [u8; 16],
}

/// Maps extension strings (and their UUIDs) to runtime type ids.
///
/// Populated once at process start, before any decode call.
#[derive(Debug, Clone, Default)]
pub struct ExtendedTypeRegistry {
    by_id: BTreeMap<TypeId, Entry>,
    by_name: HashMap<String, TypeId>,
    by_uuid: HashMap<[u8; 16], TypeId>,
}

impl ExtendedTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` under `id`.
    ///
    /// Registering the same pair twice is a no-op.
    pub fn register(&mut self, id: TypeId, name: &str) -> Result<(), RegistrationError> {
        if id <= 0 {
            return Err(RegistrationError::InvalidId { id });
        }
        if let Some(entry) = self.by_id.get(&id) {
            if entry.name == name {
                return Ok(());
            }
            tracing::warn!(id, existing = %entry.name, requested = name, "extended id already taken");
            return Err(RegistrationError::IdTaken {
                id,
                existing: entry.name.clone(),
                requested: name.to_string(),
            });
        }
        if let Some(&existing) = self.by_name.get(name) {
            tracing::warn!(name, existing, requested = id, "extension already registered");
            return Err(RegistrationError::NameTaken {
                name: name.to_string(),
                existing,
                requested: id,
            });
        }
        let uuid = schema::extension_uuid(name);
        if let Some(&existing) = self.by_uuid.get(&uuid) {
            tracing::warn!(name, existing, "extension uuid collision");
            return Err(RegistrationError::UuidCollision {
                name: name.to_string(),
                existing,
            });
        }

        self.by_id.insert(
            id,
            Entry {
                name: name.to_string(),
                uuid,
            },
        );
        self.by_name.insert(name.to_string(), id);
        self.by_uuid.insert(uuid, id);
        Ok(())
    }

    /// Id registered for an extension string.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Id registered for a UUID payload.
    #[must_use]
    pub fn resolve_uuid(&self, uuid: &[u8; 16]) -> Option<TypeId> {
        self.by_uuid.get(uuid).copied()
    }

    /// Extension string registered under `id`.
    #[must_use]
    pub fn name(&self, id: TypeId) -> Option<&str> {
        self.by_id.get(&id).map(|entry| entry.name.as_str())
    }

    /// UUID of the type registered under `id`.
    #[must_use]
    pub fn uuid(&self, id: TypeId) -> Option<[u8; 16]> {
        self.by_id.get(&id).map(|entry| entry.uuid)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registered `(id, name)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &str)> {
        self.by_id
            .iter()
            .map(|(&id, entry)| (id, entry.name.as_str()))
    }
}

/// Registers every extended type of a compiled protocol.
pub fn register_extensions(
    compiled: &CompiledProtocol,
    registry: &mut ExtendedTypeRegistry,
) -> Result<(), RegistrationError> {
    for registration in compiled.registrations() {
        registry.register(registration.id, &registration.extension)?;
    }
    tracing::debug!(
        count = compiled.registrations().len(),
        "extended types registered"
    );
    Ok(())
}
