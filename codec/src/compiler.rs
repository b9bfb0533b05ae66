//! The protocol compiler: identifiers, layouts and lookup tables.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::sync::Arc;

use schema::{Kind, Registry, TypeId};

use crate::error::{CodecError, CodecResult};
use crate::layout::CompiledLayout;
use crate::limits::CompileOptions;
use crate::types::{EXTENDED_SENTINEL, INVALID_NAME, OUT_OF_RANGE_NAME, UUID_SIZE};

/// An extended type that must be registered at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub kind: Kind,
    /// Reserved id in the kind's extended range.
    pub id: TypeId,
    pub extension: Arc<str>,
    pub uuid: [u8; 16],
}

/// Compiled identifiers and layouts of one kind.
///
/// The dense table and the extended table are disjoint lookups, each guarded
/// by its own bounds check.
#[derive(Debug, Clone)]
pub struct KindTable {
    kind: Kind,
    dense: Vec<CompiledLayout>,
    extended: Vec<CompiledLayout>,
    extended_base: TypeId,
    by_name: HashMap<Arc<str>, TypeId>,
    non_recordable: BTreeSet<TypeId>,
}

impl KindTable {
    /// The kind this table describes.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// `NUM_<KIND>TYPES`: one past the highest dense id.
    #[must_use]
    pub fn num_types(&self) -> TypeId {
        to_type_id(self.dense.len() + 1)
    }

    /// Number of extended types.
    #[must_use]
    pub fn num_extended(&self) -> usize {
        self.extended.len()
    }

    /// Ids assigned to extended types.
    #[must_use]
    pub fn extended_range(&self) -> Range<TypeId> {
        self.extended_base..self.extended_base + to_type_id(self.extended.len())
    }

    /// First id of the reserved extended range.
    #[must_use]
    pub const fn extended_base(&self) -> TypeId {
        self.extended_base
    }

    /// Looks up the layout of a dense or extended id.
    #[must_use]
    pub fn layout(&self, id: TypeId) -> Option<&CompiledLayout> {
        if id > 0 && id < self.num_types() {
            let index = usize::try_from(id - 1).ok()?;
            return self.dense.get(index);
        }
        if self.extended_range().contains(&id) {
            let index = usize::try_from(id - self.extended_base).ok()?;
            return self.extended.get(index);
        }
        None
    }

    /// Name of `id`: `"invalid"` for 0, `"(out of range)"` outside both ranges.
    #[must_use]
    pub fn name(&self, id: TypeId) -> &str {
        if id == EXTENDED_SENTINEL {
            return INVALID_NAME;
        }
        self.layout(id)
            .map_or(OUT_OF_RANGE_NAME, |layout| &*layout.name)
    }

    /// Declared size of `id`, or 0 when unknown or unvalidated.
    #[must_use]
    pub fn size(&self, id: TypeId) -> usize {
        self.layout(id).map_or(0, CompiledLayout::size)
    }

    /// In-memory size of a decoded `id`. The sentinel reports the UUID size.
    #[must_use]
    pub fn unpacked_size(&self, id: TypeId) -> usize {
        if id == EXTENDED_SENTINEL {
            return UUID_SIZE;
        }
        self.layout(id).map_or(0, CompiledLayout::unpacked_size)
    }

    /// Id of the type with the given name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Dense layouts in id order.
    pub fn dense(&self) -> impl Iterator<Item = &CompiledLayout> {
        self.dense.iter()
    }

    /// Extended layouts in id order.
    pub fn extended(&self) -> impl Iterator<Item = &CompiledLayout> {
        self.extended.iter()
    }

    /// All layouts, dense first.
    pub fn layouts(&self) -> impl Iterator<Item = &CompiledLayout> {
        self.dense.iter().chain(&self.extended)
    }

    /// Whether the historian records messages of this id. Ids not marked
    /// otherwise are recordable.
    #[must_use]
    pub fn is_recordable(&self, id: TypeId) -> bool {
        !self.non_recordable.contains(&id)
    }

    /// Ids explicitly excluded from historian recording, ascending.
    pub fn non_recordable(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.non_recordable.iter().copied()
    }
}

/// The compiler output for one registry.
#[derive(Debug, Clone)]
pub struct CompiledProtocol {
    tables: [KindTable; 3],
    registrations: Vec<Registration>,
    registry_hash: u64,
}

impl CompiledProtocol {
    /// Table of one kind.
    #[must_use]
    pub fn table(&self, kind: Kind) -> &KindTable {
        &self.tables[kind.index()]
    }

    #[must_use]
    pub fn objects(&self) -> &KindTable {
        self.table(Kind::Object)
    }

    #[must_use]
    pub fn events(&self) -> &KindTable {
        self.table(Kind::Event)
    }

    #[must_use]
    pub fn messages(&self) -> &KindTable {
        self.table(Kind::Message)
    }

    /// Every extended type of every kind, in declaration order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Hash of the registry this protocol was compiled from.
    #[must_use]
    pub const fn registry_hash(&self) -> u64 {
        self.registry_hash
    }

    /// Largest slot count of any layout.
    #[must_use]
    pub fn max_slots(&self) -> usize {
        self.tables
            .iter()
            .flat_map(KindTable::layouts)
            .map(CompiledLayout::slot_count)
            .max()
            .unwrap_or(0)
    }
}

/// Compiles a registry.
///
/// The output is a pure function of the registry's content and declaration
/// order. Errors abort the whole compile.
pub fn compile(registry: &Registry, options: &CompileOptions) -> CodecResult<CompiledProtocol> {
    check_extended_ranges(options)?;

    let mut registrations = Vec::new();
    let tables = Kind::ALL.map(|kind| compile_kind(registry, kind, options));
    let [objects, events, messages] = tables;
    let tables = [objects?, events?, messages?];

    for table in &tables {
        for layout in table.extended() {
            if let (Some(extension), Some(uuid)) = (&layout.extension, layout.uuid) {
                registrations.push(Registration {
                    kind: table.kind,
                    id: layout.id,
                    extension: Arc::clone(extension),
                    uuid,
                });
            }
        }
    }

    let compiled = CompiledProtocol {
        tables,
        registrations,
        registry_hash: schema::registry_hash(registry),
    };
    tracing::info!(
        objects = compiled.objects().num_types() - 1,
        events = compiled.events().num_types() - 1,
        messages = compiled.messages().num_types() - 1,
        extended = compiled.registrations.len(),
        hash = format_args!("{:016x}", compiled.registry_hash),
        "protocol compiled"
    );
    Ok(compiled)
}

fn compile_kind(registry: &Registry, kind: Kind, options: &CompileOptions) -> CodecResult<KindTable> {
    let defs = registry.types(kind);
    let extended_base = options.extended_base(kind);
    let extended_count = defs.iter().filter(|def| def.is_extended()).count();
    let dense_count = defs.len() - extended_count;
    let dense_end = to_type_id(dense_count + 1);

    if extended_base < dense_end {
        return Err(CodecError::ExtendedRangeOverlap {
            kind,
            base: extended_base,
            dense_end,
        });
    }
    if extended_count > options.extended_capacity {
        return Err(CodecError::ExtendedRangeOverflow {
            kind,
            capacity: options.extended_capacity,
            count: extended_count,
        });
    }

    let mut dense = Vec::with_capacity(dense_count);
    let mut extended = Vec::with_capacity(extended_count);
    let mut by_name = HashMap::with_capacity(defs.len());
    let mut non_recordable = BTreeSet::new();

    for (index, def) in defs.iter().enumerate() {
        let id = if def.is_extended() {
            extended_base + to_type_id(extended.len())
        } else {
            to_type_id(dense.len() + 1)
        };
        let flattened = registry.flattened_fields(kind, index);
        let layout = CompiledLayout::new(kind, id, def, &flattened);
        tracing::trace!(%kind, name = %layout.name, id, slots = layout.slot_count(), "type compiled");

        by_name.insert(Arc::clone(&layout.name), id);
        if kind == Kind::Message && !def.recordable {
            non_recordable.insert(id);
        }
        if def.is_extended() {
            extended.push(layout);
        } else {
            dense.push(layout);
        }
    }

    Ok(KindTable {
        kind,
        dense,
        extended,
        extended_base,
        by_name,
        non_recordable,
    })
}

fn check_extended_ranges(options: &CompileOptions) -> CodecResult<()> {
    let capacity = i64::try_from(options.extended_capacity).unwrap_or(i64::MAX);
    let range = |kind: Kind| {
        let start = i64::from(options.extended_base(kind));
        start..start.saturating_add(capacity)
    };

    for (i, &first) in Kind::ALL.iter().enumerate() {
        let a = range(first);
        if a.end > i64::from(TypeId::MAX) + 1 {
            return Err(CodecError::ExtendedRangeOverflow {
                kind: first,
                capacity: options.extended_capacity,
                count: options.extended_capacity,
            });
        }
        for &second in &Kind::ALL[i + 1..] {
            let b = range(second);
            if a.start < b.end && b.start < a.end {
                return Err(CodecError::ExtendedRangesCollide { first, second });
            }
        }
    }
    Ok(())
}

/// Converts a table index to an id. Tables never approach `i32::MAX`
/// entries because extended ranges are checked to fit.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_type_id(value: usize) -> TypeId {
    value as TypeId
}
