//! kako CLI - imageboard post renderer.
//!
//! Provides commands for:
//! - `render`: Render a JSON dump of posts to HTML
//! - `tripcode`: Derive the tripcode of a name field

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, TripcodeArgs};
use output::Output;

/// kako - imageboard post renderer.
#[derive(Parser)]
#[command(name = "kako", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render posts and print them as JSON.
    Render(RenderArgs),
    /// Print the display name and tripcode of a name field.
    Tripcode(TripcodeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

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
        Commands::Render(args) => args.execute(),
        Commands::Tripcode(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
