//! The schema registry and its validation.

use std::collections::{HashMap, HashSet};

use crate::error::{SchemaError, SchemaResult};
use crate::{FieldDef, FieldSpec, Kind, TypeDef};

/// The validated object, event and message definitions of one protocol
/// generation.
///
/// Declaration order within each kind is significant: it determines dense
/// identifier assignment. Base references are resolved to indices once,
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RegistryBuilder", into = "RegistryBuilder")
)]
pub struct Registry {
    types: [Vec<TypeDef>; 3],
    bases: [Vec<Option<usize>>; 3],
}

impl Registry {
    /// Creates a registry from per-kind definition lists after validation.
    pub fn new(
        objects: Vec<TypeDef>,
        events: Vec<TypeDef>,
        messages: Vec<TypeDef>,
    ) -> SchemaResult<Self> {
        let types = [objects, events, messages];
        let mut bases: [Vec<Option<usize>>; 3] = Default::default();
        // Extended types of every kind share one registration namespace.
        let mut extensions = HashSet::new();
        for kind in Kind::ALL {
            bases[kind.index()] = validate_kind(kind, &types[kind.index()], &mut extensions)?;
        }
        let registry = Self { types, bases };
        registry.validate_layouts()?;
        Ok(registry)
    }

    /// Creates a registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Definitions of one kind, in declaration order.
    #[must_use]
    pub fn types(&self, kind: Kind) -> &[TypeDef] {
        &self.types[kind.index()]
    }

    #[must_use]
    pub fn objects(&self) -> &[TypeDef] {
        self.types(Kind::Object)
    }

    #[must_use]
    pub fn events(&self) -> &[TypeDef] {
        self.types(Kind::Event)
    }

    #[must_use]
    pub fn messages(&self) -> &[TypeDef] {
        self.types(Kind::Message)
    }

    /// Position of a named type within its kind.
    #[must_use]
    pub fn position(&self, kind: Kind, name: &str) -> Option<usize> {
        self.types(kind).iter().position(|def| def.name == name)
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get(&self, kind: Kind, name: &str) -> Option<&TypeDef> {
        self.position(kind, name).map(|index| &self.types(kind)[index])
    }

    /// Resolved base index of the type at `index`.
    #[must_use]
    pub fn base_of(&self, kind: Kind, index: usize) -> Option<usize> {
        self.bases[kind.index()].get(index).copied().flatten()
    }

    /// Indices of the type at `index` and its ancestors, outermost first.
    #[must_use]
    pub fn ancestry(&self, kind: Kind, index: usize) -> Vec<usize> {
        let mut chain = vec![index];
        let mut current = index;
        while let Some(base) = self.base_of(kind, current) {
            chain.push(base);
            current = base;
        }
        chain.reverse();
        chain
    }

    /// Flattened fields of the type at `index`: ancestor fields first,
    /// outermost first, each type's own fields in declaration order.
    #[must_use]
    pub fn flattened_fields(&self, kind: Kind, index: usize) -> Vec<&FieldDef> {
        let defs = self.types(kind);
        let mut fields = Vec::new();
        for ancestor in self.ancestry(kind, index) {
            let mut own: Vec<&FieldDef> = defs[ancestor].fields.iter().collect();
            own.sort_by_key(|field| field.order);
            fields.extend(own);
        }
        fields
    }

    /// Total number of type definitions across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the registry defines no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate_layouts(&self) -> SchemaResult<()> {
        for kind in Kind::ALL {
            for (index, def) in self.types(kind).iter().enumerate() {
                for field in &def.fields {
                    validate_field(&def.name, field)?;
                    if kind.is_snapshot_item() && field.spec.is_string() {
                        return Err(SchemaError::StringInSnapshotItem {
                            kind,
                            type_name: def.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }

                let mut names = HashSet::new();
                for field in self.flattened_fields(kind, index) {
                    if !names.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateFieldName {
                            type_name: def.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    if !def.validate_exact_size && field.spec.default_value().is_none() {
                        return Err(SchemaError::MissingDefault {
                            type_name: def.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }

                if def.validate_exact_size {
                    let chain = self.ancestry(kind, index);
                    let unvalidated = chain
                        .iter()
                        .map(|&ancestor| &self.types(kind)[ancestor])
                        .find(|ancestor| !ancestor.validate_exact_size);
                    if let Some(base) = unvalidated {
                        return Err(SchemaError::SizeValidationMismatch {
                            type_name: def.name.clone(),
                            base: base.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`Registry`], routing each definition by its kind.
///
/// This is also the unvalidated serialized form of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryBuilder {
    #[cfg_attr(feature = "serde", serde(default))]
    objects: Vec<TypeDef>,
    #[cfg_attr(feature = "serde", serde(default))]
    events: Vec<TypeDef>,
    #[cfg_attr(feature = "serde", serde(default))]
    messages: Vec<TypeDef>,
}

impl RegistryBuilder {
    /// Appends a definition to the list of its kind.
    #[must_use]
    pub fn add(mut self, def: TypeDef) -> Self {
        match def.kind {
            Kind::Object => self.objects.push(def),
            Kind::Event => self.events.push(def),
            Kind::Message => self.messages.push(def),
        }
        self
    }

    /// Appends several definitions in order.
    #[must_use]
    pub fn extend(self, defs: impl IntoIterator<Item = TypeDef>) -> Self {
        defs.into_iter().fold(self, Self::add)
    }

    /// Builds the registry after validation.
    pub fn build(self) -> SchemaResult<Registry> {
        Registry::new(self.objects, self.events, self.messages)
    }
}

impl TryFrom<RegistryBuilder> for Registry {
    type Error = SchemaError;

    fn try_from(builder: RegistryBuilder) -> SchemaResult<Self> {
        builder.build()
    }
}

impl From<Registry> for RegistryBuilder {
    fn from(registry: Registry) -> Self {
        let [objects, events, messages] = registry.types;
        Self {
            objects,
            events,
            messages,
        }
    }
}

/// Checks names, extensions and base references of one kind, returning the
/// resolved base index of every type. `extensions` collects extension
/// strings across kinds.
fn validate_kind<'a>(
    kind: Kind,
    defs: &'a [TypeDef],
    extensions: &mut HashSet<&'a str>,
) -> SchemaResult<Vec<Option<usize>>> {
    let mut index_of = HashMap::with_capacity(defs.len());
    for (index, def) in defs.iter().enumerate() {
        if def.kind != kind {
            return Err(SchemaError::KindMismatch {
                name: def.name.clone(),
                expected: kind,
                found: def.kind,
            });
        }
        if index_of.insert(def.name.as_str(), index).is_some() {
            return Err(SchemaError::DuplicateTypeName {
                kind,
                name: def.name.clone(),
            });
        }
        if let Some(extension) = &def.extension {
            if !extensions.insert(extension.as_str()) {
                return Err(SchemaError::DuplicateExtension {
                    kind,
                    extension: extension.clone(),
                });
            }
        }
    }

    let mut bases = Vec::with_capacity(defs.len());
    for def in defs {
        let base = match &def.base {
            None => None,
            Some(base) => match index_of.get(base.as_str()) {
                Some(&index) => Some(index),
                None => {
                    return Err(SchemaError::UnknownBase {
                        kind,
                        name: def.name.clone(),
                        base: base.clone(),
                    })
                }
            },
        };
        bases.push(base);
    }

    for (index, def) in defs.iter().enumerate() {
        let mut current = index;
        let mut steps = 0;
        while let Some(base) = bases[current] {
            steps += 1;
            if steps > defs.len() {
                return Err(SchemaError::CyclicBase {
                    kind,
                    name: def.name.clone(),
                });
            }
            current = base;
        }
    }

    Ok(bases)
}

fn validate_field(type_name: &str, field: &FieldDef) -> SchemaResult<()> {
    let spec = match &field.spec {
        FieldSpec::FixedArray { inner, count } => {
            if *count == 0 {
                return Err(SchemaError::EmptyArray {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                });
            }
            if matches!(**inner, FieldSpec::FixedArray { .. }) {
                return Err(SchemaError::NestedArray {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                });
            }
            &**inner
        }
        spec => spec,
    };

    match spec {
        FieldSpec::IntRange { min, max, .. } if min > max => {
            return Err(SchemaError::InvalidRange {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                min: *min,
                max: *max,
            });
        }
        FieldSpec::Enum { count, .. } if *count < 1 => {
            return Err(SchemaError::InvalidRange {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                min: 0,
                max: count.saturating_sub(1),
            });
        }
        _ => {}
    }

    if let Some(default) = spec.default_value() {
        if !spec.accepts(default) {
            return Err(SchemaError::DefaultOutOfRange {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                default,
            });
        }
    }
    Ok(())
}
