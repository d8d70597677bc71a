//! Locus CLI - Command-line interface
//!
//! Runs the region pipeline over a search config and manages the provider
//! cache.

mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::run::RunArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "locus", version = locus::VERSION)]
#[command(about = "Combine commute, proximity and elevation criteria into one eligible area")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve, generate, aggregate and compose; write the GeoJSON export
    Run(RunArgs),

    /// Inspect or clear the provider cache
    Cache {
        /// Cache directory
        #[arg(long, default_value = locus::app::DEFAULT_CACHE_DIR)]
        cache: PathBuf,

        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Held until exit so buffered file logs are flushed
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Command::Run(args) => commands::run::run(args),
        Command::Cache { cache, action } => commands::cache::run(&cache, action),
    }
}
