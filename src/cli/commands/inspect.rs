//! Inspect command - summarize a saved table or explain a decision

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        config::{TABLE_ENV, load_table, parse_board, table_path},
        output::{format_number, print_kv, print_section, print_subsection},
    },
    persistence::SavedValueTable,
    selector::{MoveSelector, ValueGreedy},
    tictactoe::{Board, Side},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a trained value table")]
pub struct InspectArgs {
    /// Path to the trained table
    #[arg(long, env = TABLE_ENV)]
    pub table: Option<PathBuf>,

    /// Show move values and the selected tier for this board
    #[arg(long)]
    pub board: Option<String>,

    /// Side to move on `--board` (player or ai); derived from counts if omitted
    #[arg(long)]
    pub side: Option<String>,

    /// List the N highest and lowest valued states
    #[arg(long, default_value_t = 0)]
    pub top: usize,
}

fn parse_side(raw: &str) -> Result<Side> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "player" | "o" => Ok(Side::Player),
        "ai" | "x" => Ok(Side::Ai),
        other => bail!("invalid side '{other}' (expected 'player' or 'ai')"),
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let path = table_path(args.table.as_deref());
    let saved = load_table(&path)?;

    print_summary(&path, &saved);

    if args.top > 0 {
        print_extremes(&saved, args.top);
    }

    if let Some(raw) = &args.board {
        let board = parse_board(raw)?;
        let side = match &args.side {
            Some(side) => parse_side(side)?,
            None => board.side_to_move()?,
        };
        explain(&saved, &board, side)?;
    }

    Ok(())
}

fn print_summary(path: &std::path::Path, saved: &SavedValueTable) {
    print_section("Value Table");
    print_kv("Path", &path.display().to_string());
    print_kv("Format version", &saved.version.to_string());
    print_kv("States", &format_number(saved.table.len()));
    print_kv("Default value", &saved.table.default_value().to_string());
    if let Some((min, max)) = saved.table.value_range() {
        print_kv("Value range", &format!("{min:.4} .. {max:.4}"));
    }

    if let Some(config) = &saved.metadata.config {
        print_subsection("Training configuration");
        print_kv("Episodes", &format_number(config.episodes));
        print_kv("Opponent", &config.opponent.to_string());
        print_kv("Opponent credit", &config.opponent_credit.to_string());
        print_kv("Gamma", &config.gamma.to_string());
        print_kv("Update", &config.update.to_string());
        print_kv("Step penalty", &config.step_penalty.to_string());
        if let Some(seed) = config.seed {
            print_kv("Seed", &seed.to_string());
        }
    }
    if let Some(result) = &saved.metadata.result {
        print_subsection("Training games (AI view)");
        print_kv(
            "W / D / L",
            &format!(
                "{} / {} / {}",
                format_number(result.games.wins),
                format_number(result.games.draws),
                format_number(result.games.losses)
            ),
        );
    }
}

fn print_extremes(saved: &SavedValueTable, n: usize) {
    let mut entries: Vec<_> = saved.table.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    print_subsection(&format!("Top {n} states"));
    for (key, value) in entries.iter().take(n) {
        print_kv(&key.to_string(), &format!("{value:.4}"));
    }
    print_subsection(&format!("Bottom {n} states"));
    for (key, value) in entries.iter().rev().take(n) {
        print_kv(&key.to_string(), &format!("{value:.4}"));
    }
}

fn explain(saved: &SavedValueTable, board: &Board, side: Side) -> Result<()> {
    print_section(&format!("Board ({side} to move)"));
    println!("{board}");

    print_subsection("Afterstate values");
    for (position, value) in ValueGreedy::scored_moves(board, side, &saved.table) {
        let seen = board
            .apply(position, side)
            .map(|after| saved.table.contains(after.canonical_key()))
            .unwrap_or(false);
        print_kv(
            &format!("move {position}"),
            &format!("{value:.4}{}", if seen { "" } else { " (default)" }),
        );
    }

    let decision = MoveSelector::standard().decide(board, side, &saved.table)?;
    print_subsection("Decision");
    print_kv("Move", &decision.position.to_string());
    print_kv("Tier", decision.tier);
    Ok(())
}
