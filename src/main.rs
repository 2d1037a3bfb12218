//! # svg2scr CLI
//!
//! Usage:
//!   svg2scr drawing.svg                  # writes drawing.scr
//!   svg2scr drawing.svg -o board.scr
//!   svg2scr drawing.svg --json > shapes.json
//!   svg2scr drawing.svg --config options.json --strict -v

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use svg2scr::{convert_file, ConvertOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svg2scr")]
#[command(about = "Convert SVG paths into an EAGLE script", long_about = None)]
#[command(version)]
struct Cli {
    /// SVG drawing to convert
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Script to write (defaults to INPUT with a .scr extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Conversion options as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail on the first path that cannot be converted
    #[arg(long)]
    strict: bool,

    /// Print the converted shapes as JSON instead of writing a script
    #[arg(long)]
    json: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("✗ {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut options = match &cli.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    options.strict |= cli.strict;

    let conversion = convert_file(&cli.input, &options)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if !conversion.warnings.is_empty() {
        tracing::info!(count = conversion.warnings.len(), "document used unsupported features");
    }
    if !conversion.failures.is_empty() {
        eprintln!(
            "! {} path(s) could not be converted and were skipped",
            conversion.failures.len()
        );
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&conversion)?;
        println!("{}", json);
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("scr"));
    let script = conversion.to_script();
    fs::write(&output_path, &script)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    eprintln!(
        "✓ Written {} shape(s) to {}",
        conversion.shapes.len(),
        output_path.display()
    );
    Ok(())
}
