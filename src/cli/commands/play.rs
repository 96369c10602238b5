//! Play command - answer a single player turn, printing the JSON response

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::config::{TABLE_ENV, load_table_or_empty, parse_board, table_path},
    serving::{MoveService, TurnRequest},
};

#[derive(Parser, Debug)]
#[command(about = "Play one turn against the trained table", allow_negative_numbers = true)]
pub struct PlayArgs {
    /// Path to the trained table; a missing file plays with an empty table
    #[arg(long, env = TABLE_ENV)]
    pub table: Option<PathBuf>,

    /// Board before the move: 9 chars of `.`/`O`/`X` or a JSON list of 0/1/-1
    #[arg(long, default_value = ".........")]
    pub board: String,

    /// Cell (0-8) the player takes
    #[arg(long = "move", short = 'm')]
    pub position: usize,

    /// Print compact single-line JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let table = load_table_or_empty(&table_path(args.table.as_deref()))?;
    let board = parse_board(&args.board)?;

    let service = MoveService::new(Arc::new(table));
    let response = service.play_turn(&TurnRequest {
        board: board.values().to_vec(),
        position: args.position,
    })?;

    let json = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{json}");
    Ok(())
}
