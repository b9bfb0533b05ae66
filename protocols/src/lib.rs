//! Built-in protocol registries.
//!
//! [`six::registry`] and [`seven::registry`] describe the two incompatible
//! wire generations. Both are validated when built; an invalid built-in
//! registry is a programming error and panics.

pub mod consts;
pub mod seven;
pub mod six;

#[cfg(test)]
mod tests {
    use schema::Kind;

    #[test]
    fn generations_share_core_names() {
        let six = crate::six::registry();
        let seven = crate::seven::registry();
        for name in ["Sv_Motd", "Sv_Chat", "Cl_Say", "Cl_Vote", "Sv_RaceFinish"] {
            assert!(six.get(Kind::Message, name).is_some(), "{name}");
            assert!(seven.get(Kind::Message, name).is_some(), "{name}");
        }
        assert_ne!(schema::registry_hash(&six), schema::registry_hash(&seven));
    }
}
