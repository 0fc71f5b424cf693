//! confsync CLI - mirror Markdown folders into Confluence.
//!
//! Provides commands for:
//! - `sync`: Synchronize the documents tree to Confluence pages
//! - `state`: Show the folder to page mapping stored in Confluence

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{StateArgs, SyncArgs};
use output::Output;

/// confsync - Mirror Markdown folders into Confluence.
#[derive(Parser)]
#[command(name = "confsync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize documents to Confluence.
    Sync(SyncArgs),
    /// Show the stored sync state.
    State(StateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Sync(args) => args.verbose,
        Commands::State(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(),
        Commands::State(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
