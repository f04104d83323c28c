//! `jsonarena` CLI: validate, minify, pretty-print and query JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Minify (stdin → stdout)
//! echo '{ "name": "Alice", "age": 30 }' | jsonarena minify
//!
//! # Pretty-print from file to file
//! jsonarena pretty -i data.json -o data.pretty.json
//!
//! # Check that a file is a single JSON document
//! jsonarena validate -i data.json
//!
//! # Extract a sub-value by dot path (object keys and array indices)
//! jsonarena get items.0.summary -i calendar.json
//!
//! # Arena statistics for a document
//! jsonarena stats -i calendar.json
//! ```
//!
//! Set `RUST_LOG=debug` to see parser diagnostics on stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsonarena::{Arena, JsonType, ParseOptions, TrailingContent, ValueRef};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonarena",
    version,
    about = "Arena-backed JSON validator, minifier and query tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ignore anything after the first complete JSON value
    #[arg(long, global = true)]
    allow_trailing: bool,

    /// Maximum nesting depth of arrays and objects
    #[arg(long, global = true, default_value_t = ParseOptions::default().max_depth)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON and emit it without insignificant whitespace
    Minify {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse JSON and emit it indented
    Pretty {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check that the input is one well-formed JSON document
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the minified value found at a dot-separated path (e.g. `a.b.0.c`)
    Get {
        /// Path of object keys and array indices; empty or "." selects the root
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print a string value unescaped and without quotes
        #[arg(short, long)]
        raw: bool,
    },
    /// Show arena statistics for the parsed document
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Emit the statistics as a JSON object
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let options = ParseOptions {
        max_depth: cli.max_depth,
        trailing: if cli.allow_trailing {
            TrailingContent::Allow
        } else {
            TrailingContent::Reject
        },
    };

    match cli.command {
        Commands::Minify { input, output } => {
            let (arena, doc) = load(input.as_deref(), options)?;
            let mut json = arena
                .stringify(doc)
                .context("Failed to serialize document")?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
        Commands::Pretty { input, output } => {
            let (arena, doc) = load(input.as_deref(), options)?;
            let value = arena
                .to_serde_value(doc)
                .context("Failed to convert document for pretty-printing")?;
            let mut pretty = serde_json::to_string_pretty(&value)?;
            pretty.push('\n');
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Validate { input } => {
            load(input.as_deref(), options)?;
            println!("valid");
        }
        Commands::Get {
            path,
            input,
            output,
            raw,
        } => {
            let (arena, doc) = load(input.as_deref(), options)?;
            let found = resolve_path(&arena, doc, &path)?;
            let mut text = match arena.get_unescaped_str(found) {
                Some(s) if raw => s.to_string(),
                _ => arena
                    .stringify(found)
                    .context("Failed to serialize value")?,
            };
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Stats { input, json } => {
            let bytes = read_input(input.as_deref())?;
            let mut arena = Arena::new();
            let doc = arena.new_value();
            arena
                .parse_with(doc, &bytes, options)
                .context("Failed to parse JSON")?;
            let top_level = arena.json_type(doc).unwrap_or(JsonType::Null);
            let size = arena.size(doc);
            let stats = arena.release();
            if json {
                let report = serde_json::json!({
                    "type": top_level,
                    "size": size,
                    "input_bytes": bytes.len(),
                    "arena": stats,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Type:        {}", top_level);
                println!("Size:        {}", size);
                println!("Input:       {} bytes", bytes.len());
                println!("Nodes:       {}", stats.nodes);
                println!("Live nodes:  {}", stats.live_nodes);
                println!("Text:        {} bytes", stats.text_bytes);
            }
        }
    }

    Ok(())
}

/// Read and parse the input into a fresh arena.
fn load(path: Option<&str>, options: ParseOptions) -> Result<(Arena, ValueRef)> {
    let bytes = read_input(path)?;
    tracing::debug!(bytes = bytes.len(), source = path.unwrap_or("stdin"), "read input");
    let mut arena = Arena::with_capacity(bytes.len() / 4, bytes.len());
    let doc = arena.new_value();
    arena
        .parse_with(doc, &bytes, options)
        .context("Failed to parse JSON")?;
    Ok((arena, doc))
}

/// Walk a dot-separated path. A segment selects an object member by its
/// escaped key, or an array element by decimal index.
fn resolve_path(arena: &Arena, root: ValueRef, path: &str) -> Result<ValueRef> {
    let mut current = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match arena.json_type(current) {
            Some(JsonType::Object) => arena
                .obj_get(current, segment)
                .with_context(|| format!("No member '{}' in path '{}'", segment, path))?,
            Some(JsonType::Array) => {
                let index: usize = segment.parse().with_context(|| {
                    format!("Expected an array index, found '{}' in path '{}'", segment, path)
                })?;
                arena.array_get(current, index).with_context(|| {
                    format!(
                        "Index {} out of bounds (length {}) in path '{}'",
                        index,
                        arena.size(current),
                        path
                    )
                })?
            }
            Some(other) => bail!(
                "Cannot select '{}' inside a {} value in path '{}'",
                segment,
                other,
                path
            ),
            None => bail!("Value disappeared while resolving path '{}'", path),
        };
    }
    Ok(current)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
