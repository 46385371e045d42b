//! docdantic CLI - model field tables for markdown documentation.
//!
//! Provides commands for:
//! - `process`: Expand `!docdantic:` directives in a single file
//! - `build`: Process every markdown file under a source directory
//! - `models`: List the models loaded from schema files

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ModelsArgs, ProcessArgs};
use output::Output;

/// docdantic - render model field tables into markdown.
#[derive(Parser)]
#[command(name = "docdantic", version, about)]
struct Cli {
    /// Enable verbose output (INFO logging).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand directives in a single markdown file.
    Process(ProcessArgs),
    /// Process every markdown file in the source directory.
    Build(BuildArgs),
    /// List registered models.
    Models(ModelsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Models(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
