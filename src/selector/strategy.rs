//! Decision tiers used by the move selector

use crate::{
    tictactoe::{Board, Side},
    value_table::ValueTable,
};

/// One tier of the decision cascade.
///
/// A strategy either proposes a move for `side` or passes. Strategies are pure:
/// they only read the board and the table.
pub trait Strategy: Send + Sync {
    /// Short name reported alongside the chosen move
    fn name(&self) -> &'static str;

    /// Propose a legal move, or `None` to defer to the next tier
    fn propose(&self, board: &Board, side: Side, table: &ValueTable) -> Option<usize>;
}

/// Complete a line of three for the side to move
#[derive(Debug, Clone, Copy, Default)]
pub struct WinNow;

impl Strategy for WinNow {
    fn name(&self) -> &'static str {
        "win"
    }

    fn propose(&self, board: &Board, side: Side, _table: &ValueTable) -> Option<usize> {
        board.winning_move_for(side)
    }
}

/// Occupy the cell where the opponent would complete a line
#[derive(Debug, Clone, Copy, Default)]
pub struct Block;

impl Strategy for Block {
    fn name(&self) -> &'static str {
        "block"
    }

    fn propose(&self, board: &Board, side: Side, _table: &ValueTable) -> Option<usize> {
        board.winning_move_for(side.opponent())
    }
}

/// Pick the move whose resulting board has the highest learned value
///
/// Ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueGreedy;

impl ValueGreedy {
    /// Value of every legal move's afterstate, in ascending move order
    pub fn scored_moves(board: &Board, side: Side, table: &ValueTable) -> Vec<(usize, f64)> {
        board
            .legal_moves()
            .into_iter()
            .filter_map(|pos| {
                board
                    .apply(pos, side)
                    .ok()
                    .map(|after| (pos, table.board_value(&after)))
            })
            .collect()
    }

    /// Every legal move sharing the maximum value, ascending
    pub fn best_moves(board: &Board, side: Side, table: &ValueTable) -> Vec<usize> {
        let scored = Self::scored_moves(board, side, table);
        let best = scored
            .iter()
            .map(|&(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max);
        scored
            .into_iter()
            .filter(|&(_, value)| value == best)
            .map(|(pos, _)| pos)
            .collect()
    }
}

impl Strategy for ValueGreedy {
    fn name(&self) -> &'static str {
        "value"
    }

    fn propose(&self, board: &Board, side: Side, table: &ValueTable) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (pos, value) in Self::scored_moves(board, side, table) {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((pos, value)),
            }
        }
        best.map(|(pos, _)| pos)
    }
}
