//! fslocate - builds the path index used by the fslocate search tool.
//!
//! Usage:
//!   fslocate                 Re-index using the default list files
//!   fslocate -v              Re-index, printing progress
//!   fslocate -vv             Re-index, printing every entry
//!   fslocate --help          Show help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use fslocate_core::{DEFAULT_IGNORE_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_SEED_FILE, IndexConfig};
use fslocate_index::{IndexSummary, Indexer, PublishOutcome};

#[derive(Parser)]
#[command(
    name = "fslocate",
    version,
    about = "Build the fslocate path index",
    long_about = "fslocate walks the directories named in the seed list, skips \
                  paths matching the ignore list, and atomically replaces the \
                  index file with a freshly built one."
)]
struct Cli {
    /// Print progress (repeat for per-entry detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// File listing the top-level directories to index
    #[arg(long, default_value = DEFAULT_SEED_FILE)]
    seeds: PathBuf,

    /// File listing ignore patterns
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    ignore: PathBuf,

    /// Where to publish the index
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = IndexConfig::builder()
        .seed_file(cli.seeds)
        .ignore_file(cli.ignore)
        .output(cli.output)
        .verbose(cli.verbose > 0)
        .build()
        .context("Invalid configuration")?;

    let verbose = config.verbose;
    let block_size = config.block_size;
    let summary = Indexer::new(config).run().context("Indexing failed")?;

    Ok(report(&summary, verbose, block_size))
}

/// Progress goes to stdout, warnings and errors to stderr.
fn init_logging(verbosity: u8) {
    let default_level = if verbosity > 1 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();
}

/// Print the outcome of a run and pick the exit status.
fn report(summary: &IndexSummary, verbose: bool, block_size: usize) -> ExitCode {
    match &summary.outcome {
        PublishOutcome::Published { path } => {
            if verbose {
                let stats = &summary.stats;
                println!(
                    "Indexed {} entries ({} dirs, {} files, {} ignored) into {} ({}) in {:.2}s",
                    stats.walk.entries(),
                    stats.walk.dirs,
                    stats.walk.files,
                    stats.walk.ignored,
                    path.display(),
                    humansize::format_size(summary.bytes_written(block_size), humansize::BINARY),
                    summary.duration.as_secs_f64()
                );
            }
            ExitCode::SUCCESS
        }
        PublishOutcome::Failed { temp_path, error } => {
            eprintln!(
                "ERROR: Unable to move new index {} to {}: {}",
                temp_path.display(),
                summary.output.display(),
                error
            );
            ExitCode::FAILURE
        }
    }
}
