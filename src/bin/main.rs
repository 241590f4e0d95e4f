//! HAL Normalization CLI
//!
//! Command-line tool for normalizing HAL+JSON documents into a flat
//! identifier-keyed table.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

use hal_normalize::{
    normalize, parse_document, to_json_string, NormalizeError, NormalizeOptions,
};

#[derive(Parser)]
#[command(name = "hal-normalize")]
#[command(about = "Normalize a HAL+JSON document into a flat identifier-keyed table")]
#[command(version)]
struct Cli {
    /// Path to a HAL+JSON document, or "-" for stdin
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Don't camelize attribute and relation keys
    #[arg(long)]
    no_camelize: bool,

    /// Key under which per-resource metadata is attached
    #[arg(long, default_value = "_meta")]
    meta_key: String,

    /// Suppress attribute entries for bare references
    #[arg(long)]
    filter_references: bool,

    /// Key under which reconciled collection contents are stored
    /// (enables collection reconciliation)
    #[arg(long, value_name = "KEY")]
    list_key: Option<String>,

    /// Synthesize virtual identifiers for embedded collections without
    /// a standalone link
    #[arg(long)]
    virtual_self_links: bool,

    /// Strip this origin (scheme://host[:port]) from every href
    #[arg(long, value_name = "URL")]
    strip_origin: Option<String>,
}

/// Read the input document from a file or stdin
fn read_input(input: &str) -> Result<String, NormalizeError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    fs::read_to_string(input).map_err(|e| NormalizeError::ReadError {
        path: input.to_string(),
        reason: e.to_string(),
    })
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), NormalizeError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote normalized table to {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// Build a URI normalizer stripping a fixed origin prefix from hrefs
fn origin_stripper(origin: &str) -> Result<Box<dyn Fn(&str) -> String>, NormalizeError> {
    let url = Url::parse(origin)
        .map_err(|e| NormalizeError::InvalidOption(format!("--strip-origin {}: {}", origin, e)))?;
    let origin = url.origin().ascii_serialization();

    Ok(Box::new(move |href: &str| {
        match href.strip_prefix(&origin) {
            Some(stripped) => stripped.to_string(),
            None => href.to_string(),
        }
    }))
}

fn run(cli: Cli) -> Result<(), NormalizeError> {
    let content = read_input(&cli.input)?;
    let document = parse_document(&content)?;

    let options = NormalizeOptions {
        camelize_keys: !cli.no_camelize,
        normalize_uri: match &cli.strip_origin {
            Some(origin) => Some(origin_stripper(origin)?),
            None => None,
        },
        meta_key: cli.meta_key.clone(),
        filter_references: cli.filter_references,
        embedded_standalone_list_key: cli.list_key.clone(),
        virtual_self_links: cli.virtual_self_links,
    };

    let table = normalize(&document, &options);

    let entries = table.as_object().map(|t| t.len()).unwrap_or(0);
    eprintln!("Normalized {} table entries", entries);

    let output = to_json_string(&table, cli.pretty)?;
    write_output(&output, cli.output.as_ref())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
