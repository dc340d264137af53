//! qmaze CLI - Maze generation and tabular Q-learning
//!
//! This CLI provides a unified interface for:
//! - Generating random mazes with the recursive backtracker
//! - Training a Q-learning agent and printing its greedy path

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qmaze")]
#[command(version, about = "Maze generation and Q-learning toolkit", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a maze and print it
    Generate(qmaze::cli::commands::generate::GenerateArgs),

    /// Train an agent on a fresh maze and show the learned path
    Train(Box<qmaze::cli::commands::train::TrainArgs>),
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => qmaze::cli::commands::generate::execute(args),
        Commands::Train(args) => qmaze::cli::commands::train::execute(*args),
    }
}
