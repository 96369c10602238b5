//! Shared configuration helpers for CLI commands

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::{
    adapters::MsgPackRepository,
    monte_carlo::{OpponentKind, TrainerConfig},
    pipeline::{DefensivePolicy, GreedyPolicy, RandomPolicy, TacticalPolicy},
    persistence::SavedValueTable,
    ports::{Policy, TableRepository},
    tictactoe::Board,
    value_table::ValueTable,
};

/// Environment variable consulted when `--table` is not given
pub const TABLE_ENV: &str = "TTT_TABLE";

/// Where `train` writes and the other commands look by default
pub const DEFAULT_TABLE_PATH: &str = "train_result/mc_tictactoe.msgpack";

/// Table path from the flag (clap already folds in `TTT_TABLE`) or the default
pub fn table_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TABLE_PATH))
}

/// Read a JSON trainer configuration; missing fields take their defaults.
pub fn load_trainer_config(path: &Path) -> Result<TrainerConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Load a saved table, failing if it is missing or unreadable.
pub fn load_table(path: &Path) -> Result<SavedValueTable> {
    MsgPackRepository::new()
        .load(path)
        .with_context(|| format!("failed to load value table from {}", path.display()))
}

/// Load a saved table, or start from an empty one if the file does not exist.
///
/// An empty table values every move at the default, so play falls back to the
/// win / block tiers and the lowest free cell.
pub fn load_table_or_empty(path: &Path) -> Result<ValueTable> {
    if !path.exists() {
        warn!(path = %path.display(), "value table not found, playing with an empty table");
        return Ok(ValueTable::new());
    }
    Ok(load_table(path)?.into_table())
}

/// Parse a board given either as 9 characters of `.`/`O`/`X` or as a JSON
/// list of `0`/`1`/`-1`.
pub fn parse_board(raw: &str) -> Result<Board> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let values: Vec<i8> = serde_json::from_str(trimmed)
            .with_context(|| format!("failed to parse board list '{trimmed}'"))?;
        Ok(Board::from_values(&values)?)
    } else {
        Ok(Board::from_string(trimmed)?)
    }
}

/// Build an opponent policy for matches against a trained table.
///
/// `self-play` pits the table against itself.
pub fn build_opponent(kind: OpponentKind, table: &Arc<ValueTable>) -> Box<dyn Policy> {
    match kind {
        OpponentKind::Random => Box::new(RandomPolicy::new("random")),
        OpponentKind::Defensive => Box::new(DefensivePolicy::new("defensive")),
        OpponentKind::Tactical => Box::new(TacticalPolicy::new("tactical")),
        OpponentKind::SelfPlay => Box::new(GreedyPolicy::new("self-play", Arc::clone(table))),
    }
}

/// Parse a `win=1,draw=0,loss=-1` reward schedule onto `config`.
pub fn apply_reward_schedule(config: &mut TrainerConfig, raw: &str) -> Result<()> {
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .with_context(|| format!("invalid reward entry '{part}' (expected key=value)"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid reward value in '{part}'"))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "win" => config.rewards.win = value,
            "draw" => config.rewards.draw = value,
            "loss" => config.rewards.loss = value,
            other => bail!("unknown reward key '{other}' (expected win, draw or loss)"),
        }
    }
    Ok(())
}
