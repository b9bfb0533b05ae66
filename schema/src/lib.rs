//! Declarative protocol schemas for netproto.
//!
//! This crate defines what can travel over a game connection:
//! - Field kinds with their validation rules and defaults
//! - Object, event and message definitions with single inheritance
//! - A validated registry per protocol generation
//! - Deterministic registry hashing and extended-type UUIDs
//!
//! # Design Principles
//!
//! - **Explicit schemas** - Registries are plain data, built in code or loaded from JSON.
//! - **Validate once** - A [`Registry`] cannot exist unless every invariant holds.
//! - **Deterministic hashing** - The registry hash is stable given the same definition.

mod error;
mod field;
mod hash;
mod registry;
mod typedef;

pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDef, FieldSpec, Scalar, Storage, StringPolicy};
pub use hash::{extension_uuid, registry_hash};
pub use registry::{Registry, RegistryBuilder};
pub use typedef::{Kind, TypeDef};

/// A numeric type identifier within one kind's identifier space.
pub type TypeId = i32;
