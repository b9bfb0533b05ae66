//! Inspection tools for netproto protocols.
//!
//! This crate backs the `netproto` binary:
//!
//! - Print the compiled identifier tables of a protocol
//! - Emit the generated Rust constants module
//! - Print cross-version id tables
//! - Decode captured message frames and explain rejections
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the decoder decided.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codec::{CompileOptions, CompiledProtocol, Decoded, FieldValue, Handler, KindTable};
use glob::Pattern;
use mapper::{CrossVersionMap, UNMAPPED};
use schema::{Kind, Registry, TypeId};
use serde::Serialize;

/// A protocol generation shipped with the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    Six,
    Seven,
}

impl BuiltIn {
    #[must_use]
    pub fn registry(self) -> Registry {
        match self {
            Self::Six => protocols::six::registry(),
            Self::Seven => protocols::seven::registry(),
        }
    }
}

/// Reads a registry from JSON. Deserialization re-runs schema validation.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read registry {}", path.display()))?;
    let registry: Registry = serde_json::from_str(&contents)
        .with_context(|| format!("parse registry json {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        types = registry.len(),
        "registry loaded"
    );
    Ok(registry)
}

/// Compiles with default options, turning codec errors into `anyhow` ones.
pub fn compile_registry(registry: &Registry) -> Result<CompiledProtocol> {
    codec::compile(registry, &CompileOptions::default()).context("compile protocol")
}

/// Identifier tables of a compiled protocol.
#[derive(Debug, Clone, Serialize)]
pub struct IdsReport {
    pub registry_hash: String,
    pub kinds: Vec<KindReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KindReport {
    pub kind: &'static str,
    pub num_types: TypeId,
    pub extended_base: TypeId,
    pub types: Vec<TypeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    pub id: TypeId,
    pub name: String,
    /// Validated snapshot size in bytes; 0 when unchecked.
    pub size: usize,
    pub slots: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub recordable: bool,
}

#[must_use]
pub fn ids_report(compiled: &CompiledProtocol) -> IdsReport {
    IdsReport {
        registry_hash: format!("{:016x}", compiled.registry_hash()),
        kinds: Kind::ALL
            .iter()
            .map(|&kind| kind_report(compiled.table(kind)))
            .collect(),
    }
}

fn kind_report(table: &KindTable) -> KindReport {
    KindReport {
        kind: table.kind().as_str(),
        num_types: table.num_types(),
        extended_base: table.extended_base(),
        types: table
            .layouts()
            .map(|layout| TypeReport {
                id: layout.id,
                name: layout.name.to_string(),
                size: layout.size(),
                slots: layout.slot_count(),
                extension: layout.extension.as_deref().map(str::to_string),
                recordable: layout.recordable,
            })
            .collect(),
    }
}

#[must_use]
pub fn format_ids_text(report: &IdsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "registry hash: {}", report.registry_hash);
    for kind in &report.kinds {
        let _ = writeln!(
            out,
            "{}s: {} dense, extended base 0x{:x}",
            kind.kind, kind.num_types, kind.extended_base
        );
        for entry in &kind.types {
            let _ = write!(
                out,
                "  {:>7} {:<24} {:>4} bytes {:>3} slots",
                format_id(entry.id),
                entry.name,
                entry.size,
                entry.slots
            );
            if let Some(extension) = &entry.extension {
                let _ = write!(out, "  {extension}");
            }
            if !entry.recordable {
                out.push_str("  (not recorded)");
            }
            out.push('\n');
        }
    }
    out
}

fn format_id(id: TypeId) -> String {
    if id >= 0x100 {
        format!("0x{id:x}")
    } else {
        id.to_string()
    }
}

/// Formats the `a`-ordered rows of a cross-version map, followed by the
/// names only present on the `b` side.
#[must_use]
pub fn format_map(map: &CrossVersionMap, label_a: &str, label_b: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} map: {label_a} -> {label_b}", map.kind());
    for (id, name, other) in map.rows() {
        if other == UNMAPPED {
            let _ = writeln!(out, "  {id:>3} {name:<24}   -");
        } else {
            let _ = writeln!(out, "  {id:>3} {name:<24} {other:>3}");
        }
    }
    let only_b: Vec<&str> = map.unmapped_b().collect();
    if !only_b.is_empty() {
        let _ = writeln!(out, "only in {label_b}: {}", only_b.join(", "));
    }
    out
}

/// Owned result of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecodeOutcome {
    Record {
        id: TypeId,
        name: String,
        fields: Vec<(String, serde_json::Value)>,
    },
    ExtendedUuid {
        uuid: String,
    },
    Failed {
        reason: String,
        detail: String,
    },
}

/// Decodes one message frame and copies the result out of the handler.
pub fn decode_frame(handler: &mut Handler, bytes: &[u8]) -> DecodeOutcome {
    match handler.decode_message_frame(bytes) {
        Ok(Decoded::Record(record)) => DecodeOutcome::Record {
            id: record.id(),
            name: record.name().to_string(),
            fields: record
                .iter()
                .map(|(name, value)| {
                    let value = match value {
                        FieldValue::Int(value) => serde_json::Value::from(value),
                        FieldValue::Str(value) => serde_json::Value::from(value),
                    };
                    (name.to_string(), value)
                })
                .collect(),
        },
        Ok(Decoded::ExtendedUuid(uuid)) => DecodeOutcome::ExtendedUuid {
            uuid: hex(&uuid),
        },
        Err(failure) => DecodeOutcome::Failed {
            reason: failure.reason().to_string(),
            detail: failure.to_string(),
        },
    }
}

#[must_use]
pub fn format_outcome(outcome: &DecodeOutcome) -> String {
    match outcome {
        DecodeOutcome::Record { id, name, fields } => {
            let mut out = format!("{name} ({})", format_id(*id));
            for (field, value) in fields {
                let _ = write!(out, "\n  {field} = {value}");
            }
            out
        }
        DecodeOutcome::ExtendedUuid { uuid } => format!("extended type uuid {uuid}"),
        DecodeOutcome::Failed { reason, detail } => format!("rejected: {reason} ({detail})"),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// A capture file selected for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists the files of `dir`, keeping those whose path or file name matches
/// `glob`. Entries are sorted by path.
pub fn collect_frame_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FrameEntry>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        entries.push(FrameEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
