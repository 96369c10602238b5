//! Evaluate command - Play a trained table against an opponent

use std::{fs::File, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        config::{TABLE_ENV, build_opponent, load_table, table_path},
        output::{format_number, print_kv, print_match_result, print_section},
    },
    monte_carlo::OpponentKind,
    pipeline::{GreedyPolicy, MatchConfig, MatchPipeline, MatchResult, ProgressObserver},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained value table")]
pub struct EvaluateArgs {
    /// Path to the trained table
    #[arg(long, env = TABLE_ENV)]
    pub table: Option<PathBuf>,

    /// Opponent to evaluate against (random, defensive, tactical or self-play)
    #[arg(long, short = 'o', default_value = "random")]
    pub opponent: String,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1_000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use only the value lookup, without the win / block tiers
    #[arg(long)]
    pub value_only: bool,

    /// Export results to file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Serialize)]
struct EvaluationExport<'a> {
    table: String,
    opponent: String,
    value_only: bool,
    seed: Option<u64>,
    #[serde(flatten)]
    result: &'a MatchResult,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let opponent_kind = args.opponent.parse::<OpponentKind>()?;
    let path = table_path(args.table.as_deref());

    let saved = load_table(&path)?;
    print_section("Loaded Table");
    print_kv("Path", &path.display().to_string());
    print_kv("States", &format_number(saved.table.len()));
    if let Some(config) = &saved.metadata.config {
        print_kv("Trained episodes", &format_number(config.episodes));
        print_kv("Trained against", &config.opponent.to_string());
    }

    let table = Arc::new(saved.into_table());
    let mut agent = if args.value_only {
        GreedyPolicy::value_only("trained", Arc::clone(&table))
    } else {
        GreedyPolicy::new("trained", Arc::clone(&table))
    };
    let mut opponent = build_opponent(opponent_kind, &table);

    print_section("Evaluation Configuration");
    print_kv("Opponent", opponent.name());
    print_kv("Games", &format_number(args.games));
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut pipeline = MatchPipeline::new(MatchConfig {
        num_games: args.games,
        seed: args.seed,
    });
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let result = pipeline.run(&mut agent, opponent.as_mut())?;

    print_section("Evaluation Results");
    print_match_result(&result);

    if let Some(export_path) = &args.export {
        let export = EvaluationExport {
            table: path.display().to_string(),
            opponent: opponent_kind.to_string(),
            value_only: args.value_only,
            seed: args.seed,
            result: &result,
        };
        let file = File::create(export_path)
            .with_context(|| format!("failed to create {}", export_path.display()))?;
        serde_json::to_writer_pretty(file, &export)?;
        println!("\n✓ Results exported to: {}", export_path.display());
    }

    Ok(())
}
