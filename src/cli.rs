//! Minimal CLI: shape definition → (schema | normalized NDJSON)
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use crate::catalog::JsonDataType;
use crate::codec::ByteCodec;
use crate::json;
use crate::json_schema::JsonSchema;
use crate::shape::Shape;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate JSON schemas and catalog-ready NDJSON from shape definitions
#[derive(Parser, Debug)]
#[command(name = "shape-json", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the JSON schema of a shape definition
    Schema(SchemaOut),
    /// re-encode NDJSON records into the data-catalog layout
    Normalize(NormalizeOut),
}

#[derive(Args, Debug, Clone)]
struct ShapeSettings {
    /// shape definition file (JSON)
    #[arg(long, short)]
    shape: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    shape_settings: ShapeSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    shape_settings: ShapeSettings,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// timestamp convention of the input records
    #[arg(long, value_enum, default_value_t = TimestampFormat::Iso)]
    timestamps: TimestampFormat,

    /// drop records that fail to decode instead of aborting
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339, e.g. 2024-03-01T12:00:00.250Z
    Iso,
    /// data-catalog literal, e.g. 2024-03-01 12:00:00.250
    Catalog,
}

/// Outcome of normalizing one buffer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub output: Vec<u8>,
    pub written: usize,
    pub skipped: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ShapeSettings {
    fn load(&self) -> Result<Shape> {
        let source = std::fs::read_to_string(&self.shape)
            .with_context(|| format!("failed to read shape definition {}", self.shape.display()))?;
        let shape: Shape = crate::path_de::from_str_with_path(&source)
            .with_context(|| format!("invalid shape definition {}", self.shape.display()))?;
        tracing::debug!(path = %self.shape.display(), kind = %shape.kind(), "loaded shape");
        Ok(shape)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let shape = target.shape_settings.load()?;
                let schema = JsonSchema::of(&shape);
                let schema_src = serde_json::to_string_pretty(&schema)?;
                emit(target.out.as_deref(), format!("{schema_src}\n").as_bytes())
            }
            Command::Normalize(target) => {
                let shape = target.shape_settings.load()?;
                let source_paths = resolve_file_path_patterns(&target.input)?;
                let mut output = Vec::new();
                for source_path in source_paths {
                    let source_path_str = source_path.to_string_lossy().to_string();
                    let buffer = std::fs::read(&source_path)
                        .with_context(|| format!("failed to read source file {source_path_str}"))?;
                    tracing::info!(path = %source_path_str, bytes = buffer.len(), "normalizing");
                    let normalized = normalize_buffer(
                        &shape,
                        &buffer,
                        target.timestamps,
                        target.skip_invalid,
                    )
                    .with_context(|| format!("failed to normalize {source_path_str}"))?;
                    let mark = if normalized.skipped == 0 { "✔".green() } else { "⚠".yellow() };
                    eprintln!(
                        "{mark} {source_path_str}: {} records written, {} skipped",
                        normalized.written, normalized.skipped,
                    );
                    output.extend(normalized.output);
                }
                emit(target.out.as_deref(), &output)
            }
        }
    }
}

/// Decodes every record of `buffer` with the `timestamps` convention and
/// re-encodes it with the catalog codec. Records are decoded in parallel.
pub fn normalize_buffer(
    shape: &Shape,
    buffer: &[u8],
    timestamps: TimestampFormat,
    skip_invalid: bool,
) -> Result<Normalized> {
    let data_type = JsonDataType;
    let reader = match timestamps {
        TimestampFormat::Iso => ByteCodec::new(json::mapper(shape)),
        TimestampFormat::Catalog => data_type.mapper(shape),
    };
    let writer = data_type.mapper(shape);

    let lines: Vec<&[u8]> = data_type.split(buffer).collect();
    let results: Vec<Result<Vec<u8>>> = lines
        .par_iter()
        .map(|line| {
            let value = reader.decode(line)?;
            Ok(writer.encode(&value)?)
        })
        .collect();

    let mut records = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(error) if skip_invalid => {
                tracing::warn!(record = index + 1, %error, "skipping invalid record");
                skipped += 1;
            }
            Err(error) => return Err(error.context(format!("record {}", index + 1))),
        }
    }
    Ok(Normalized {
        written: records.len(),
        skipped,
        output: data_type.join(records),
    })
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, bytes).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
