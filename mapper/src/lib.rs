//! Cross-version mapping: translate type ids between two protocol generations.
//!
//! Types are matched by canonical declared name. Only dense ids are mapped;
//! extended types are identified by UUID on the wire and need no translation.
//! Id 0 (`"invalid"`) always maps to 0.
//!
//! Built tables are immutable and can be shared freely between threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use codec::{CompiledProtocol, INVALID_NAME};
use schema::{Kind, Registry, TypeId};

/// Marker returned for ids without a counterpart.
pub const UNMAPPED: TypeId = -1;

/// Bidirectional id translation for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossVersionMap {
    kind: Kind,
    names_a: Vec<Arc<str>>,
    names_b: Vec<Arc<str>>,
    a_to_b: Vec<TypeId>,
    b_to_a: Vec<TypeId>,
}

impl CrossVersionMap {
    /// Builds the map from the dense tables of two compiled protocols.
    #[must_use]
    pub fn build(kind: Kind, a: &CompiledProtocol, b: &CompiledProtocol) -> Self {
        let names = |protocol: &CompiledProtocol| -> Vec<Arc<str>> {
            protocol
                .table(kind)
                .dense()
                .map(|layout| Arc::clone(&layout.name))
                .collect()
        };
        Self::from_names(kind, names(a), names(b))
    }

    /// Builds the map from two registries, using declaration order of their
    /// non-extended types as the dense numbering.
    #[must_use]
    pub fn from_registries(kind: Kind, a: &Registry, b: &Registry) -> Self {
        let names = |registry: &Registry| -> Vec<Arc<str>> {
            registry
                .types(kind)
                .iter()
                .filter(|def| !def.is_extended())
                .map(|def| Arc::from(def.name.as_str()))
                .collect()
        };
        Self::from_names(kind, names(a), names(b))
    }

    /// Builds the map from dense name lists; `names[i]` has id `i + 1`.
    #[must_use]
    pub fn from_names(kind: Kind, dense_a: Vec<Arc<str>>, dense_b: Vec<Arc<str>>) -> Self {
        let with_invalid = |dense: Vec<Arc<str>>| {
            let mut names: Vec<Arc<str>> = Vec::with_capacity(dense.len() + 1);
            names.push(Arc::from(INVALID_NAME));
            names.extend(dense);
            names
        };
        let names_a = with_invalid(dense_a);
        let names_b = with_invalid(dense_b);

        let a_to_b = translate(&names_a, &names_b);
        let b_to_a = translate(&names_b, &names_a);

        let map = Self {
            kind,
            names_a,
            names_b,
            a_to_b,
            b_to_a,
        };
        tracing::debug!(
            %kind,
            types_a = map.names_a.len(),
            types_b = map.names_b.len(),
            unmapped_a = map.unmapped_a().count(),
            unmapped_b = map.unmapped_b().count(),
            "cross-version map built"
        );
        map
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Table length on the `a` side (`NUM_<KIND>TYPES` of `a`).
    #[must_use]
    pub fn len_a(&self) -> usize {
        self.a_to_b.len()
    }

    /// Table length on the `b` side.
    #[must_use]
    pub fn len_b(&self) -> usize {
        self.b_to_a.len()
    }

    /// Translates an `a` id, or returns [`UNMAPPED`].
    #[must_use]
    pub fn map_a_to_b(&self, id: TypeId) -> TypeId {
        lookup(&self.a_to_b, id)
    }

    /// Translates a `b` id, or returns [`UNMAPPED`].
    #[must_use]
    pub fn map_b_to_a(&self, id: TypeId) -> TypeId {
        lookup(&self.b_to_a, id)
    }

    #[must_use]
    pub fn a_to_b(&self, id: TypeId) -> Option<TypeId> {
        mapped(self.map_a_to_b(id))
    }

    #[must_use]
    pub fn b_to_a(&self, id: TypeId) -> Option<TypeId> {
        mapped(self.map_b_to_a(id))
    }

    /// Name of an `a` id.
    #[must_use]
    pub fn name_a(&self, id: TypeId) -> Option<&str> {
        name(&self.names_a, id)
    }

    /// Name of a `b` id.
    #[must_use]
    pub fn name_b(&self, id: TypeId) -> Option<&str> {
        name(&self.names_b, id)
    }

    /// Names present only on the `a` side, in id order.
    pub fn unmapped_a(&self) -> impl Iterator<Item = &str> + '_ {
        unmapped(&self.names_a, &self.a_to_b)
    }

    /// Names present only on the `b` side, in id order.
    pub fn unmapped_b(&self) -> impl Iterator<Item = &str> + '_ {
        unmapped(&self.names_b, &self.b_to_a)
    }

    /// `(a id, name, b id)` rows in `a` id order, `b id` being [`UNMAPPED`]
    /// when absent.
    pub fn rows(&self) -> impl Iterator<Item = (TypeId, &str, TypeId)> + '_ {
        self.names_a
            .iter()
            .zip(&self.a_to_b)
            .enumerate()
            .map(|(index, (name, &b))| (index_to_id(index), &**name, b))
    }
}

/// The three per-kind maps between two generations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMaps {
    pub objects: CrossVersionMap,
    pub events: CrossVersionMap,
    pub messages: CrossVersionMap,
}

impl VersionMaps {
    #[must_use]
    pub fn build(a: &CompiledProtocol, b: &CompiledProtocol) -> Self {
        Self {
            objects: CrossVersionMap::build(Kind::Object, a, b),
            events: CrossVersionMap::build(Kind::Event, a, b),
            messages: CrossVersionMap::build(Kind::Message, a, b),
        }
    }

    #[must_use]
    pub fn from_registries(a: &Registry, b: &Registry) -> Self {
        Self {
            objects: CrossVersionMap::from_registries(Kind::Object, a, b),
            events: CrossVersionMap::from_registries(Kind::Event, a, b),
            messages: CrossVersionMap::from_registries(Kind::Message, a, b),
        }
    }

    #[must_use]
    pub const fn get(&self, kind: Kind) -> &CrossVersionMap {
        match kind {
            Kind::Object => &self.objects,
            Kind::Event => &self.events,
            Kind::Message => &self.messages,
        }
    }
}

fn translate(from: &[Arc<str>], to: &[Arc<str>]) -> Vec<TypeId> {
    let index: BTreeMap<&str, TypeId> = to
        .iter()
        .enumerate()
        .map(|(position, name)| (&**name, index_to_id(position)))
        .collect();
    from.iter()
        .map(|name| index.get(&**name).copied().unwrap_or(UNMAPPED))
        .collect()
}

fn lookup(table: &[TypeId], id: TypeId) -> TypeId {
    usize::try_from(id)
        .ok()
        .and_then(|index| table.get(index))
        .copied()
        .unwrap_or(UNMAPPED)
}

fn name(names: &[Arc<str>], id: TypeId) -> Option<&str> {
    let index = usize::try_from(id).ok()?;
    names.get(index).map(|name| &**name)
}

const fn mapped(id: TypeId) -> Option<TypeId> {
    if id == UNMAPPED {
        None
    } else {
        Some(id)
    }
}

fn unmapped<'a>(names: &'a [Arc<str>], table: &'a [TypeId]) -> impl Iterator<Item = &'a str> {
    names
        .iter()
        .zip(table)
        .filter(|(_, id)| **id == UNMAPPED)
        .map(|(name, _)| &**name)
}

/// Dense tables are small; positions always fit in a type id.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn index_to_id(index: usize) -> TypeId {
    index as TypeId
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Vec<Arc<str>> {
        list.iter().map(|name| Arc::from(*name)).collect()
    }

    fn sample() -> CrossVersionMap {
        CrossVersionMap::from_names(
            Kind::Message,
            names(&["Sv_Motd", "Sv_Chat", "Sv_SoundGlobal", "Cl_Say"]),
            names(&["Sv_Motd", "Sv_Team", "Sv_Chat", "Cl_Say", "Cl_Command"]),
        )
    }

    #[test]
    fn invalid_maps_to_invalid() {
        let map = sample();
        assert_eq!(map.map_a_to_b(0), 0);
        assert_eq!(map.map_b_to_a(0), 0);
        assert_eq!(map.name_a(0), Some("invalid"));
    }

    #[test]
    fn shifted_ids() {
        let map = sample();
        assert_eq!(map.map_a_to_b(2), 3);
        assert_eq!(map.map_b_to_a(3), 2);
        assert_eq!(map.map_a_to_b(4), 4);
        assert_eq!(map.a_to_b(3), None);
        assert_eq!(map.b_to_a(2), None);
    }

    #[test]
    fn out_of_bounds_is_unmapped() {
        let map = sample();
        assert_eq!(map.len_a(), 5);
        assert_eq!(map.len_b(), 6);
        assert_eq!(map.map_a_to_b(5), UNMAPPED);
        assert_eq!(map.map_a_to_b(-1), UNMAPPED);
        assert_eq!(map.map_b_to_a(TypeId::MAX), UNMAPPED);
        assert_eq!(map.name_b(6), None);
    }

    #[test]
    fn unmapped_names() {
        let map = sample();
        assert_eq!(map.unmapped_a().collect::<Vec<_>>(), vec!["Sv_SoundGlobal"]);
        assert_eq!(
            map.unmapped_b().collect::<Vec<_>>(),
            vec!["Sv_Team", "Cl_Command"]
        );
    }

    #[test]
    fn rows_follow_a_order() {
        let map = sample();
        let rows: Vec<_> = map.rows().collect();
        assert_eq!(rows[0], (0, "invalid", 0));
        assert_eq!(rows[3], (3, "Sv_SoundGlobal", UNMAPPED));
        assert_eq!(rows.len(), 5);
    }

    fn name_pool() -> Vec<String> {
        (0..24).map(|index| format!("Type{index}")).collect()
    }

    proptest! {
        #[test]
        fn mapping_is_symmetric(
            a in Just(name_pool()).prop_shuffle().prop_flat_map(|pool| {
                (0..=pool.len()).prop_map(move |len| pool[..len].to_vec())
            }),
            b in Just(name_pool()).prop_shuffle().prop_flat_map(|pool| {
                (0..=pool.len()).prop_map(move |len| pool[..len].to_vec())
            }),
        ) {
            let to_arcs = |list: &[String]| -> Vec<Arc<str>> {
                list.iter().map(|name| Arc::from(name.as_str())).collect()
            };
            let map = CrossVersionMap::from_names(Kind::Object, to_arcs(&a), to_arcs(&b));

            for id in 0..index_to_id(map.len_a()) {
                let forward = map.map_a_to_b(id);
                if forward != UNMAPPED {
                    prop_assert_eq!(map.map_b_to_a(forward), id);
                    prop_assert_eq!(map.name_a(id), map.name_b(forward));
                }
            }
            for id in 0..index_to_id(map.len_b()) {
                let backward = map.map_b_to_a(id);
                if backward != UNMAPPED {
                    prop_assert_eq!(map.map_a_to_b(backward), id);
                }
            }
        }
    }
}
