//! Move selection (inference policy)
//!
//! The selector runs an ordered cascade of [`Strategy`] tiers and returns the
//! first proposal. The standard cascade is:
//!
//! 1. [`WinNow`] - complete a line if possible
//! 2. [`Block`] - otherwise occupy the opponent's winning cell
//! 3. [`ValueGreedy`] - otherwise the legal move whose resulting board has the
//!    highest value in the table, lowest index on ties
//!
//! Selection never mutates the table, so one `Arc<ValueTable>` can serve any
//! number of concurrent callers.
//!
//! ```
//! use ttt_mc::{
//!     selector::select_move,
//!     tictactoe::{Board, Side},
//!     value_table::ValueTable,
//! };
//!
//! // The player threatens the top row; the AI has to block.
//! let board = Board::from_values(&[1, 1, 0, 0, -1, 0, 0, 0, 0]).unwrap();
//! let table = ValueTable::new();
//! assert_eq!(select_move(&board, Side::Ai, &table).unwrap(), 2);
//! ```

pub mod strategy;

use serde::Serialize;
use tracing::debug;

pub use strategy::{Block, Strategy, ValueGreedy, WinNow};

use crate::{
    Error, Result,
    tictactoe::{Board, Side},
    value_table::ValueTable,
};

/// A chosen move and the tier that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub position: usize,
    pub tier: &'static str,
}

/// Ordered cascade of decision tiers
pub struct MoveSelector {
    strategies: Vec<Box<dyn Strategy>>,
}

impl MoveSelector {
    /// Selector with no tiers; add them with [`MoveSelector::with_strategy`]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Win, then block, then highest value
    pub fn standard() -> Self {
        Self::empty()
            .with_strategy(WinNow)
            .with_strategy(Block)
            .with_strategy(ValueGreedy)
    }

    /// Only the tactical tiers (win, block)
    pub fn tactical() -> Self {
        Self::empty().with_strategy(WinNow).with_strategy(Block)
    }

    /// Only the value lookup, without tactical shortcuts
    pub fn value_only() -> Self {
        Self::empty().with_strategy(ValueGreedy)
    }

    /// Append a tier at the end of the cascade
    pub fn with_strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Insert a tier at `index` (clamped to the cascade length)
    pub fn insert_strategy<S: Strategy + 'static>(mut self, index: usize, strategy: S) -> Self {
        let index = index.min(self.strategies.len());
        self.strategies.insert(index, Box::new(strategy));
        self
    }

    /// Names of the tiers in evaluation order
    pub fn tiers(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the cascade without precondition checks; `None` if every tier passes
    pub fn propose(&self, board: &Board, side: Side, table: &ValueTable) -> Option<Decision> {
        self.strategies.iter().find_map(|strategy| {
            strategy
                .propose(board, side, table)
                .map(|position| Decision {
                    position,
                    tier: strategy.name(),
                })
        })
    }

    /// Choose a move for `side`, reporting which tier decided.
    ///
    /// # Errors
    ///
    /// - [`Error::BoardInvariant`] if the piece counts are impossible
    /// - [`Error::NoLegalMove`] if the game is already decided or no tier
    ///   proposes a move
    pub fn decide(&self, board: &Board, side: Side, table: &ValueTable) -> Result<Decision> {
        let count = board.counts();
        if count.ai > count.player || count.player > count.ai + 1 {
            return Err(Error::board(format!(
                "piece counts player={}, ai={} cannot arise from alternating play",
                count.player, count.ai
            )));
        }

        let outcome = board.outcome();
        if outcome.is_terminal() {
            return Err(Error::NoLegalMove { outcome });
        }

        let decision = self
            .propose(board, side, table)
            .ok_or(Error::NoLegalMove { outcome })?;
        debug!(board = %board.encode(), %side, position = decision.position, tier = decision.tier, "selected move");
        Ok(decision)
    }

    /// Choose a move for `side`
    ///
    /// # Errors
    ///
    /// See [`MoveSelector::decide`].
    pub fn select_move(&self, board: &Board, side: Side, table: &ValueTable) -> Result<usize> {
        self.decide(board, side, table).map(|d| d.position)
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for MoveSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveSelector")
            .field("tiers", &self.tiers())
            .finish()
    }
}

/// Choose a move with the standard win / block / value cascade.
///
/// # Errors
///
/// See [`MoveSelector::decide`].
pub fn select_move(board: &Board, side: Side, table: &ValueTable) -> Result<usize> {
    MoveSelector::standard().select_move(board, side, table)
}
