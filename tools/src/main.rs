use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{CompileOptions, Handler, Protocol};
use mapper::CrossVersionMap;
use netproto_tools::{
    collect_frame_entries, compile_registry, decode_frame, format_ids_text, format_map,
    format_outcome, ids_report, load_registry, BuiltIn,
};
use schema::{Kind, Registry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "netproto",
    version,
    about = "netproto protocol inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the compiled identifier tables.
    Ids {
        #[command(flatten)]
        source: ProtocolArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the generated Rust constants module.
    Emit {
        #[command(flatten)]
        source: ProtocolArgs,
    },
    /// Print the six -> seven id table of one kind.
    Map {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Print the seven -> six direction instead.
        #[arg(long)]
        reverse: bool,
    },
    /// Decode message frame files.
    Decode {
        /// A frame file, or a directory of frame files.
        path: PathBuf,
        #[command(flatten)]
        source: ProtocolArgs,
        /// Glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct ProtocolArgs {
    /// Built-in protocol generation.
    #[arg(long, value_enum, default_value_t = ProtocolArg::Six)]
    protocol: ProtocolArg,
    /// Registry JSON file; overrides `--protocol`.
    #[arg(long)]
    registry: Option<PathBuf>,
}

impl ProtocolArgs {
    fn registry(&self) -> Result<Registry> {
        match &self.registry {
            Some(path) => load_registry(path),
            None => Ok(self.protocol.built_in().registry()),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProtocolArg {
    Six,
    Seven,
}

impl ProtocolArg {
    const fn built_in(self) -> BuiltIn {
        match self {
            Self::Six => BuiltIn::Six,
            Self::Seven => BuiltIn::Seven,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Object,
    Event,
    Message,
}

impl From<KindArg> for Kind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Object => Self::Object,
            KindArg::Event => Self::Event,
            KindArg::Message => Self::Message,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ids { source, format } => {
            let compiled = compile_registry(&source.registry()?)?;
            let report = ids_report(&compiled);
            match format {
                OutputFormat::Text => print!("{}", format_ids_text(&report)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
            }
        }
        Command::Emit { source } => {
            let compiled = compile_registry(&source.registry()?)?;
            print!("{}", codec::emit_rust_module(&compiled));
        }
        Command::Map { kind, reverse } => {
            let six = compile_registry(&BuiltIn::Six.registry())?;
            let seven = compile_registry(&BuiltIn::Seven.registry())?;
            let output = if reverse {
                format_map(
                    &CrossVersionMap::build(kind.into(), &seven, &six),
                    "seven",
                    "six",
                )
            } else {
                format_map(
                    &CrossVersionMap::build(kind.into(), &six, &seven),
                    "six",
                    "seven",
                )
            };
            print!("{output}");
        }
        Command::Decode {
            path,
            source,
            glob,
            format,
        } => {
            let protocol = Protocol::from_registry(&source.registry()?, &CompileOptions::default())
                .context("activate protocol")?
                .into_shared();
            let mut handler = Handler::new(protocol);

            let files = if path.is_dir() {
                collect_frame_entries(&path, glob.as_deref())?
                    .into_iter()
                    .map(|entry| entry.path)
                    .collect()
            } else {
                vec![path]
            };
            for file in files {
                let bytes =
                    fs::read(&file).with_context(|| format!("read frame {}", file.display()))?;
                let outcome = decode_frame(&mut handler, &bytes);
                match format {
                    OutputFormat::Text => {
                        println!("== {} ({} bytes) ==", file.display(), bytes.len());
                        println!("{}", format_outcome(&outcome));
                    }
                    OutputFormat::Json => {
                        let json = serde_json::json!({
                            "path": file.display().to_string(),
                            "decoded": outcome,
                        });
                        println!("{json}");
                    }
                }
            }
        }
    }
    Ok(())
}
