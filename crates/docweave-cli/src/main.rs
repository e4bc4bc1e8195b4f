use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use docweave_config::Config;
use docweave_engine::{
    BatchUpdate, ConvertOptions, EditOperation, IndexUnit, OperationSequence, ReplayDocument,
    TextRange, check_invariants, convert::DEFAULT_START_INDEX, convert_html, convert_markdown, io,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(about = "Compile rich-text markup into document edit batches", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a markup file into a batchUpdate request body
    Convert {
        /// HTML (or Markdown with --markdown) input file
        input: PathBuf,

        /// Treat the input as Markdown
        #[arg(long)]
        markdown: bool,

        /// What to emit
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Offset the first insertion lands on
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX))]
        start_index: Option<u32>,

        /// Document tab to target
        #[arg(long)]
        tab_id: Option<String>,

        /// Unit document offsets are counted in
        #[arg(long, value_enum)]
        index_unit: Option<Unit>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file to use instead of ~/.config/docweave/config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replay a batchUpdate body and print the text it adds
    ///
    /// The document starts with one empty paragraph per offset before the
    /// batch's start index, so batches converted with `--start-index` apply.
    Replay {
        /// Request body produced by `docweave convert`
        batch: PathBuf,

        /// Offset the batch was converted for [default: index of its first insert]
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX))]
        start_index: Option<u32>,

        /// Unit the batch offsets are counted in
        #[arg(long, value_enum, default_value_t = Unit::Utf16)]
        index_unit: Unit,
    },
    /// Write a config file holding the default settings
    Init {
        /// Where to write it instead of ~/.config/docweave/config.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Remote document offsets are signed 32-bit values.
const MAX_INDEX: i64 = i32::MAX as i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Unit {
    Utf16,
    Chars,
}

impl From<Unit> for IndexUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Utf16 => IndexUnit::Utf16,
            Unit::Chars => IndexUnit::Chars,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match Args::parse().command {
        Commands::Convert {
            input,
            markdown,
            format,
            start_index,
            tab_id,
            index_unit,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let mut options = config.convert_options();
            if let Some(start_index) = start_index {
                options.start_index = start_index as usize;
            }
            if let Some(tab_id) = tab_id {
                options.tab_id = Some(tab_id);
            }
            if let Some(unit) = index_unit {
                options.index_unit = unit.into();
            }

            let markdown = markdown || input.extension().is_some_and(|ext| ext == "md");
            let seq = convert_file(&input, markdown, &options)?;
            let rendered = render(&seq, format)?;

            let destination = output.or_else(|| {
                config
                    .output_dir
                    .as_ref()
                    .map(|dir| dir.join(default_file_name(&input, format)))
            });
            match destination {
                Some(path) => {
                    io::write_output(&path, &rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("Wrote {} operations to {}", seq.len(), path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Replay {
            batch,
            start_index,
            index_unit,
        } => {
            let json = io::read_markup(&batch)
                .with_context(|| format!("Failed to read {}", batch.display()))?;
            let batch: BatchUpdate = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", batch.display()))?;
            let ops = batch
                .into_operations()
                .context("Batch contains an unsupported request")?;

            let start_index = start_index
                .map(|index| index as usize)
                .or_else(|| first_insert_index(&ops))
                .unwrap_or(DEFAULT_START_INDEX);
            let mut doc = ReplayDocument::starting_at(index_unit.into(), start_index);
            doc.apply_all(&ops).with_context(|| {
                format!("Batch does not apply to a document starting at {start_index}")
            })?;

            let added = TextRange::new(start_index, doc.body_end())
                .and_then(|range| doc.slice(range))
                .unwrap_or_default();
            print!("{added}");
        }
        Commands::Init { config, force } => {
            let path = config.clone().unwrap_or_else(Config::config_path);
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to replace it)",
                    path.display()
                );
            }
            match config {
                Some(path) => Config::default().save_to_path(path)?,
                None => Config::default().save()?,
            }
            log::info!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let config = Config::load_from_path(path)?;
            if config.is_none() {
                bail!("Config file not found: {}", path.display());
            }
            config
        }
        None => Config::load()?,
    };
    match &loaded {
        Some(_) => log::debug!("Using config file"),
        None => log::debug!("No config file, using defaults"),
    }
    Ok(loaded.unwrap_or_default())
}

fn convert_file(input: &Path, markdown: bool, options: &ConvertOptions) -> Result<OperationSequence> {
    let source = io::read_markup(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let seq = if markdown {
        convert_markdown(&source, options)
    } else {
        convert_html(&source, options)
    };
    check_invariants(&seq).context("Generated operations failed the offset check")?;
    log::info!(
        "Converted {} into {} operations ({}..{})",
        input.display(),
        seq.len(),
        seq.start_index(),
        seq.end_index()
    );
    Ok(seq)
}

fn first_insert_index(ops: &[EditOperation]) -> Option<usize> {
    ops.iter().find_map(|op| match op {
        EditOperation::InsertText { index, .. } => Some(*index),
        _ => None,
    })
}

fn render(seq: &OperationSequence, format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(&seq.to_batch_update())
            .context("Failed to serialise batch"),
        Format::Text => Ok(seq.plain_text()),
    }
}

fn default_file_name(input: &Path, format: Format) -> String {
    let title = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default();
    let extension = match format {
        Format::Json => "json",
        Format::Text => "txt",
    };
    io::output_file_name(&title, extension)
}
