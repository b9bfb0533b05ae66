use proptest::prelude::*;
use schema::{FieldSpec, Kind, Registry, SchemaError, TypeDef};

fn linear_chain(depth: usize) -> Vec<TypeDef> {
    (0..depth)
        .map(|i| {
            let def = TypeDef::object(format!("T{i}")).field(format!("f{i}"), FieldSpec::int_any());
            if i == 0 {
                def
            } else {
                def.extends(format!("T{}", i - 1))
            }
        })
        .collect()
}

#[test]
fn deep_chain_flattens_in_order() {
    let registry = Registry::builder().extend(linear_chain(6)).build().unwrap();
    let fields: Vec<String> = registry
        .flattened_fields(Kind::Object, 5)
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(fields, vec!["f0", "f1", "f2", "f3", "f4", "f5"]);
}

#[test]
fn three_way_cycle_rejected() {
    let err = Registry::builder()
        .add(TypeDef::message("A").extends("C"))
        .add(TypeDef::message("B").extends("A"))
        .add(TypeDef::message("C").extends("B"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::CyclicBase { kind: Kind::Message, .. }));
}

#[cfg(feature = "serde")]
#[test]
fn json_round_trip_revalidates() {
    let registry = Registry::builder()
        .add(TypeDef::message("Sv_Chat").field("m_Team", FieldSpec::int_range(-2, 3)))
        .build()
        .unwrap();
    let json = serde_json::to_string(&registry).unwrap();
    let back: Registry = serde_json::from_str(&json).unwrap();
    assert_eq!(registry, back);

    let broken = json.replace("\"min\":-2", "\"min\":9");
    assert!(serde_json::from_str::<Registry>(&broken).is_err());
}

proptest! {
    #[test]
    fn prop_chain_field_count_matches_depth(depth in 1usize..12) {
        let registry = Registry::builder().extend(linear_chain(depth)).build().unwrap();
        for index in 0..depth {
            prop_assert_eq!(registry.flattened_fields(Kind::Object, index).len(), index + 1);
            prop_assert_eq!(registry.ancestry(Kind::Object, index).len(), index + 1);
        }
    }

    #[test]
    fn prop_range_defaults_validated(min in -50i32..50, span in 0i32..50, default in -120i32..120) {
        let max = min + span;
        let result = Registry::builder()
            .add(TypeDef::message("M").field("f", FieldSpec::int_range(min, max).with_default(default)))
            .build();
        prop_assert_eq!(result.is_ok(), (min..=max).contains(&default));
    }
}
