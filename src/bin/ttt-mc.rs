//! ttt-mc CLI - Monte Carlo value learning for tic-tac-toe
//!
//! This CLI provides a unified interface for:
//! - Training a value table with Monte Carlo control
//! - Evaluating a trained table against scripted opponents
//! - Playing single turns against the trained AI
//! - Inspecting stored tables and individual decisions

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ttt-mc")]
#[command(version, about = "Monte Carlo tic-tac-toe trainer and move server", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a value table with Monte Carlo self-improvement
    Train(Box<ttt_mc::cli::commands::train::TrainArgs>),

    /// Evaluate a trained table against an opponent
    Evaluate(ttt_mc::cli::commands::evaluate::EvaluateArgs),

    /// Apply a player move and answer with the AI move as JSON
    Play(ttt_mc::cli::commands::play::PlayArgs),

    /// Summarize a table or explain the move chosen on a board
    Inspect(ttt_mc::cli::commands::inspect::InspectArgs),
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output (JSON for `play`), logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Train(args) => ttt_mc::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => ttt_mc::cli::commands::evaluate::execute(args),
        Commands::Play(args) => ttt_mc::cli::commands::play::execute(args),
        Commands::Inspect(args) => ttt_mc::cli::commands::inspect::execute(args),
    }
}
