//! Outcomes and game records

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Side};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub side: Side,
}

/// Outcome of a board, derived purely from its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Ongoing,
    PlayerWin,
    AiWin,
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::Ongoing
    }

    /// The outcome in which `side` wins
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::Player => GameOutcome::PlayerWin,
            Side::Ai => GameOutcome::AiWin,
        }
    }

    /// Swap the winner perspective (Player <-> AI).
    pub fn swap_sides(self) -> Self {
        match self {
            GameOutcome::PlayerWin => GameOutcome::AiWin,
            GameOutcome::AiWin => GameOutcome::PlayerWin,
            other => other,
        }
    }

    /// Short message for the caller to show after a turn
    pub fn message(self) -> &'static str {
        match self {
            GameOutcome::PlayerWin => "You win",
            GameOutcome::AiWin => "AI wins",
            GameOutcome::Draw => "Draw",
            GameOutcome::Ongoing => "",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameOutcome::Ongoing => "ongoing",
            GameOutcome::PlayerWin => "player win",
            GameOutcome::AiWin => "ai win",
            GameOutcome::Draw => "draw",
        };
        write!(f, "{s}")
    }
}

/// A game played from the empty board, the player moving first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    moves: Vec<Move>,
}

impl Game {
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            moves: Vec::with_capacity(9),
        }
    }

    /// Side whose turn it is
    pub fn to_move(&self) -> Side {
        if self.moves.len().is_multiple_of(2) {
            Side::Player
        } else {
            Side::Ai
        }
    }

    /// Play a move for the side to move
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalMove`] once the game is decided and
    /// [`crate::Error::InvalidMove`] for an illegal position.
    pub fn play(&mut self, position: usize) -> Result<GameOutcome, crate::Error> {
        let outcome = self.board.outcome();
        if outcome.is_terminal() {
            return Err(crate::Error::NoLegalMove { outcome });
        }

        let side = self.to_move();
        self.board = self.board.apply(position, side)?;
        self.moves.push(Move { position, side });
        Ok(self.board.outcome())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn outcome(&self) -> GameOutcome {
        self.board.outcome()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
