//! The activated protocol: compiled tables plus resolved extensions.

use std::sync::Arc;

use packer::Packer;
use schema::{Kind, Registry, TypeId};

use crate::compiler::{compile, CompiledProtocol, KindTable};
use crate::error::{CodecError, CodecResult};
use crate::extended::{register_extensions, ExtendedTypeRegistry};
use crate::limits::CompileOptions;
use crate::types::Value;

/// A compiled protocol whose extended types are all registered.
///
/// `Protocol::activate` is the initialization barrier: it is the only way to
/// obtain a `Protocol`, and a [`Handler`](crate::Handler) can only be built
/// from one.
#[derive(Debug)]
pub struct Protocol {
    compiled: CompiledProtocol,
    extensions: ExtendedTypeRegistry,
}

impl Protocol {
    /// Verifies that every registration of `compiled` resolves to its
    /// reserved id in `extensions`.
    pub fn activate(
        compiled: CompiledProtocol,
        extensions: ExtendedTypeRegistry,
    ) -> CodecResult<Self> {
        for registration in compiled.registrations() {
            match extensions.resolve(&registration.extension) {
                Some(found) if found == registration.id => {}
                Some(found) => {
                    return Err(CodecError::ExtensionIdMismatch {
                        extension: registration.extension.to_string(),
                        expected: registration.id,
                        found,
                    });
                }
                None => {
                    return Err(CodecError::UnregisteredExtension {
                        extension: registration.extension.to_string(),
                        expected: registration.id,
                    });
                }
            }
        }
        tracing::debug!(
            registrations = compiled.registrations().len(),
            "protocol activated"
        );
        Ok(Self {
            compiled,
            extensions,
        })
    }

    /// Compiles `registry`, registers its extended types in a fresh
    /// registry and activates the result.
    pub fn from_registry(registry: &Registry, options: &CompileOptions) -> CodecResult<Self> {
        let compiled = compile(registry, options)?;
        let mut extensions = ExtendedTypeRegistry::new();
        register_extensions(&compiled, &mut extensions)?;
        Self::activate(compiled, extensions)
    }

    /// Wraps the protocol for sharing between handlers.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub const fn compiled(&self) -> &CompiledProtocol {
        &self.compiled
    }

    #[must_use]
    pub const fn extensions(&self) -> &ExtendedTypeRegistry {
        &self.extensions
    }

    #[must_use]
    pub fn table(&self, kind: Kind) -> &KindTable {
        self.compiled.table(kind)
    }

    #[must_use]
    pub fn objects(&self) -> &KindTable {
        self.compiled.objects()
    }

    #[must_use]
    pub fn events(&self) -> &KindTable {
        self.compiled.events()
    }

    #[must_use]
    pub fn messages(&self) -> &KindTable {
        self.compiled.messages()
    }

    /// Packs the body of a record of type `id`.
    pub fn pack(
        &self,
        kind: Kind,
        id: TypeId,
        values: &[Value],
        packer: &mut Packer,
    ) -> CodecResult<()> {
        let layout = self
            .table(kind)
            .layout(id)
            .ok_or(CodecError::UnknownType { kind, id })?;
        layout.pack(values, packer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{FieldSpec, TypeDef};

    fn registry() -> Registry {
        Registry::builder()
            .add(TypeDef::message("Sv_Chat").field("m_Team", FieldSpec::int_range(-2, 3)))
            .add(TypeDef::message("Cl_IsDDNet").extension("is-ddnet@ddnet.tw"))
            .build()
            .unwrap()
    }

    #[test]
    fn activation_requires_registration() {
        let compiled = compile(&registry(), &CompileOptions::for_testing()).unwrap();
        let err = Protocol::activate(compiled, ExtendedTypeRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnregisteredExtension {
                extension: "is-ddnet@ddnet.tw".to_string(),
                expected: 0x300
            }
        );
    }

    #[test]
    fn activation_rejects_wrong_id() {
        let compiled = compile(&registry(), &CompileOptions::for_testing()).unwrap();
        let mut extensions = ExtendedTypeRegistry::new();
        extensions.register(0x301, "is-ddnet@ddnet.tw").unwrap();
        let err = Protocol::activate(compiled, extensions).unwrap_err();
        assert!(matches!(err, CodecError::ExtensionIdMismatch { found: 0x301, .. }));
    }

    #[test]
    fn from_registry_activates() {
        let protocol = Protocol::from_registry(&registry(), &CompileOptions::for_testing()).unwrap();
        assert_eq!(protocol.extensions().resolve("is-ddnet@ddnet.tw"), Some(0x300));
        assert_eq!(protocol.messages().id_of("Sv_Chat"), Some(1));
    }

    #[test]
    fn pack_unknown_type_fails() {
        let protocol = Protocol::from_registry(&registry(), &CompileOptions::for_testing()).unwrap();
        let mut packer = Packer::new();
        let err = protocol.pack(Kind::Message, 9, &[], &mut packer).unwrap_err();
        assert_eq!(err, CodecError::UnknownType { kind: Kind::Message, id: 9 });
    }
}
