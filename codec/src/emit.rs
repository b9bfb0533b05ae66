//! Rust source emission for compiled identifier tables.

use std::fmt::{self, Write};

use schema::Kind;

use crate::compiler::{CompiledProtocol, KindTable};
use crate::types::{EXTENDED_SENTINEL, INVALID_NAME};

const fn type_prefix(kind: Kind) -> &'static str {
    match kind {
        Kind::Object => "NETOBJTYPE",
        Kind::Event => "NETEVENTTYPE",
        Kind::Message => "NETMSGTYPE",
    }
}

const fn table_prefix(kind: Kind) -> &'static str {
    match kind {
        Kind::Object => "NETOBJ",
        Kind::Event => "NETEVENT",
        Kind::Message => "NETMSG",
    }
}

/// Upper-cases a type name for use in a constant identifier.
fn constant_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Renders the identifiers, name and size tables, the historian opt-out list
/// and the extension registration table of `protocol` as a Rust module.
///
/// The output depends only on the compiled registry, so regenerating from an
/// unchanged registry yields identical text.
#[must_use]
pub fn emit_rust_module(protocol: &CompiledProtocol) -> String {
    let mut out = String::new();
    // Writing into a String is infallible.
    let _ = write_rust_module(protocol, &mut out);
    out
}

/// Writes the module rendered by [`emit_rust_module`] into `out`.
pub fn write_rust_module(protocol: &CompiledProtocol, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "// @generated by netproto. Do not edit.")?;
    writeln!(out, "// registry hash: {:#018x}", protocol.registry_hash())?;

    for kind in Kind::ALL {
        writeln!(out)?;
        write_kind(protocol.table(kind), out)?;
    }

    writeln!(out)?;
    let messages = protocol.messages();
    write!(out, "pub static NON_RECORDABLE_NETMSGS: &[i32] = &[")?;
    for (index, id) in messages.non_recordable().enumerate() {
        if index > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{id}")?;
    }
    writeln!(out, "];")?;

    writeln!(out)?;
    writeln!(out, "/// Extended types to register at startup: (id, extension, uuid).")?;
    writeln!(out, "pub static EXTENSIONS: &[(i32, &str, [u8; 16])] = &[")?;
    for registration in protocol.registrations() {
        writeln!(
            out,
            "    ({:#x}, {:?}, {:?}),",
            registration.id, &*registration.extension, registration.uuid
        )?;
    }
    writeln!(out, "];")
}

fn write_kind(table: &KindTable, out: &mut impl Write) -> fmt::Result {
    let kind = table.kind();
    let prefix = type_prefix(kind);
    let tables = table_prefix(kind);

    writeln!(out, "pub const {prefix}_EX: i32 = {EXTENDED_SENTINEL};")?;
    for layout in table.dense() {
        writeln!(
            out,
            "pub const {prefix}_{}: i32 = {};",
            constant_name(&layout.name),
            layout.id
        )?;
    }
    writeln!(out, "pub const NUM_{tables}TYPES: i32 = {};", table.num_types())?;
    writeln!(
        out,
        "pub const OFFSET_{prefix}_UUID: i32 = {:#x};",
        table.extended_base()
    )?;
    for layout in table.extended() {
        writeln!(
            out,
            "pub const {prefix}_{}: i32 = {:#x};",
            constant_name(&layout.name),
            layout.id
        )?;
    }

    write!(out, "pub static {tables}_NAMES: &[&str] = &[{INVALID_NAME:?}")?;
    for layout in table.dense() {
        write!(out, ", {:?}", &*layout.name)?;
    }
    writeln!(out, "];")?;

    write!(out, "pub static {tables}_SIZES: &[usize] = &[0")?;
    for layout in table.dense() {
        write!(out, ", {}", layout.size())?;
    }
    writeln!(out, "];")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::limits::CompileOptions;
    use schema::{FieldSpec, Registry, TypeDef};

    fn protocol() -> CompiledProtocol {
        let registry = Registry::builder()
            .add(
                TypeDef::object("PlayerInput")
                    .field("m_Direction", FieldSpec::int_range(-1, 1))
                    .field("m_Fire", FieldSpec::int_any()),
            )
            .add(
                TypeDef::object("MyOwnObject")
                    .extension("my-own-object@heinrich5991.de")
                    .field("m_Test", FieldSpec::int_any()),
            )
            .add(TypeDef::event("Common").field("m_X", FieldSpec::int_any()))
            .add(TypeDef::message("Sv_Motd").field("m_pMessage", FieldSpec::string()))
            .add(TypeDef::message("Cl_Vote").not_recordable())
            .build()
            .unwrap();
        compile(&registry, &CompileOptions::for_testing()).unwrap()
    }

    #[test]
    fn constant_names_are_upper_case() {
        assert_eq!(constant_name("Sv_Motd"), "SV_MOTD");
        assert_eq!(constant_name("my-type"), "MY_TYPE");
    }

    #[test]
    fn renders_identifiers_and_tables() {
        let source = emit_rust_module(&protocol());
        assert!(source.contains("pub const NETOBJTYPE_EX: i32 = 0;"));
        assert!(source.contains("pub const NETOBJTYPE_PLAYERINPUT: i32 = 1;"));
        assert!(source.contains("pub const NUM_NETOBJTYPES: i32 = 2;"));
        assert!(source.contains("pub const OFFSET_NETOBJTYPE_UUID: i32 = 0x100;"));
        assert!(source.contains("pub const NETOBJTYPE_MYOWNOBJECT: i32 = 0x100;"));
        assert!(source.contains("pub static NETOBJ_NAMES: &[&str] = &[\"invalid\", \"PlayerInput\"];"));
        assert!(source.contains("pub static NETOBJ_SIZES: &[usize] = &[0, 8];"));
        assert!(source.contains("pub const NETEVENTTYPE_COMMON: i32 = 1;"));
        assert!(source.contains("pub const NETMSGTYPE_CL_VOTE: i32 = 2;"));
        assert!(source.contains("pub static NON_RECORDABLE_NETMSGS: &[i32] = &[2];"));
        assert!(source.contains("(0x100, \"my-own-object@heinrich5991.de\", ["));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(emit_rust_module(&protocol()), emit_rust_module(&protocol()));
    }
}
