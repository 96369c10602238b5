//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GameOutcome, lines::LineAnalyzer};
use crate::{
    error::{Error, MoveRejection},
    types::{BOARD_SIZE, StateKey},
};

/// A cell on the Tic-Tac-Toe board
///
/// Cells cross the service boundary as integers: `0` empty, `1` the human
/// player, `-1` the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Cell {
    Empty,
    Player,
    Ai,
}

impl Cell {
    pub fn value(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Player => 1,
            Cell::Ai => -1,
        }
    }

    pub fn from_value(value: i8) -> Option<Cell> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Player),
            -1 => Some(Cell::Ai),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Player => 'O',
            Cell::Ai => 'X',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' | '-' => Some(Cell::Empty),
            'O' | 'o' | '0' => Some(Cell::Player),
            'X' | 'x' => Some(Cell::Ai),
            _ => None,
        }
    }

    /// The side owning this cell, if any
    pub fn to_side(self) -> Option<Side> {
        match self {
            Cell::Player => Some(Side::Player),
            Cell::Ai => Some(Side::Ai),
            Cell::Empty => None,
        }
    }
}

impl TryFrom<i8> for Cell {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Cell::from_value(value)
            .ok_or_else(|| Error::board(format!("cell value {value} is not one of 0, 1, -1")))
    }
}

impl From<Cell> for i8 {
    fn from(cell: Cell) -> Self {
        cell.value()
    }
}

/// One of the two sides of the game
///
/// The human player always opens; the AI answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    /// Get the other side
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Convert side to the cell it marks
    pub fn to_cell(self) -> Cell {
        match self {
            Side::Player => Cell::Player,
            Side::Ai => Cell::Ai,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Ai => write!(f, "ai"),
        }
    }
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCount {
    pub player: usize,
    pub ai: usize,
    pub empty: usize,
}

/// A 3x3 board, indexed row-major from 0 (top left) to 8 (bottom right)
///
/// `Board` is a small `Copy` value: applying a move returns a new board and
/// leaves the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Board { cells }
    }

    /// Build a board from the integer encoding used at the service boundary.
    ///
    /// Only the shape and the cell values are checked here; call
    /// [`Board::validate`] for the alternating-play invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardInvariant`] if there are not exactly nine values or
    /// a value is not one of `0`, `1`, `-1`.
    pub fn from_values(values: &[i8]) -> Result<Self, Error> {
        if values.len() != BOARD_SIZE {
            return Err(Error::board(format!(
                "expected {BOARD_SIZE} cells, got {}",
                values.len()
            )));
        }

        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (i, &value) in values.iter().enumerate() {
            cells[i] = Cell::from_value(value).ok_or_else(|| {
                Error::board(format!(
                    "cell {i} has value {value} (expected 0, 1 or -1)"
                ))
            })?;
        }
        Ok(Board { cells })
    }

    /// Parse a board from its 9-character form (`.` empty, `O` player, `X` AI).
    /// Whitespace is ignored so that multi-line boards parse too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardInvariant`] on a wrong length or unknown character.
    pub fn from_string(s: &str) -> Result<Self, Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != BOARD_SIZE {
            return Err(Error::board(format!(
                "expected {BOARD_SIZE} cells, got {} in '{s}'",
                chars.len()
            )));
        }

        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| {
                Error::board(format!("invalid character '{c}' at position {i} in '{s}'"))
            })?;
        }
        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// The integer encoding of the board (`0`, `1`, `-1`)
    pub fn values(&self) -> [i8; BOARD_SIZE] {
        self.cells.map(Cell::value)
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Check if a position exists and is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    pub fn counts(&self) -> PieceCount {
        let mut count = PieceCount {
            player: 0,
            ai: 0,
            empty: 0,
        };
        for cell in &self.cells {
            match cell {
                Cell::Player => count.player += 1,
                Cell::Ai => count.ai += 1,
                Cell::Empty => count.empty += 1,
            }
        }
        count
    }

    /// All empty positions in ascending order
    ///
    /// The order is part of the contract: tie-breaking in the move selector
    /// relies on it.
    pub fn legal_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `side`'s mark at `pos` and return the new board
    #[must_use = "apply returns a new board; the original is unchanged"]
    pub fn apply(&self, pos: usize, side: Side) -> Result<Board, Error> {
        match self.get(pos) {
            None => Err(Error::InvalidMove {
                position: pos,
                reason: MoveRejection::OutOfBounds,
            }),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[pos] = side.to_cell();
                Ok(next)
            }
            Some(_) => Err(Error::InvalidMove {
                position: pos,
                reason: MoveRejection::Occupied,
            }),
        }
    }

    /// Check if a side has three in a row
    pub fn has_won(&self, side: Side) -> bool {
        LineAnalyzer::has_won(&self.cells, side)
    }

    /// Derive the outcome purely from the cells
    pub fn outcome(&self) -> GameOutcome {
        match LineAnalyzer::completed_line(&self.cells) {
            Some((side, _)) => GameOutcome::win_for(side),
            None if !self.cells.contains(&Cell::Empty) => GameOutcome::Draw,
            None => GameOutcome::Ongoing,
        }
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// First legal move (ascending) that wins immediately for `side`.
    ///
    /// Used both to take a win and, with the opponent's side, to find the
    /// cell that has to be blocked.
    pub fn winning_move_for(&self, side: Side) -> Option<usize> {
        let mark = side.to_cell();
        self.legal_moves().into_iter().find(|&pos| {
            let mut test = self.cells;
            test[pos] = mark;
            LineAnalyzer::has_won(&test, side)
        })
    }

    /// Value-table key for this exact board
    pub fn canonical_key(&self) -> StateKey {
        StateKey::from_cells(&self.cells)
    }

    /// Check the alternating-play invariant (the player opens).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardInvariant`] if
    /// - the piece counts are not `player == ai` or `player == ai + 1`
    /// - both sides have a completed line
    /// - a completed line contradicts who moved last
    pub fn validate(&self) -> Result<(), Error> {
        let count = self.counts();
        let diff = count.player as isize - count.ai as isize;

        if !(0..=1).contains(&diff) {
            return Err(Error::board(format!(
                "piece counts player={}, ai={} are impossible when the player opens",
                count.player, count.ai
            )));
        }

        let player_won = self.has_won(Side::Player);
        let ai_won = self.has_won(Side::Ai);

        if player_won && ai_won {
            return Err(Error::board("both sides cannot have winning lines"));
        }
        if player_won && diff != 1 {
            return Err(Error::board(
                "a player win requires the player to have moved last",
            ));
        }
        if ai_won && diff != 0 {
            return Err(Error::board("an AI win requires the AI to have moved last"));
        }

        Ok(())
    }

    /// Whose turn it is, derived from the piece counts
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardInvariant`] if the board fails [`Board::validate`].
    pub fn side_to_move(&self) -> Result<Side, Error> {
        self.validate()?;
        let count = self.counts();
        if count.player == count.ai {
            Ok(Side::Player)
        } else {
            Ok(Side::Ai)
        }
    }

    /// Swap the two sides' marks.
    #[must_use = "swap_sides returns a new board; the original is unchanged"]
    pub fn swap_sides(&self) -> Self {
        Board {
            cells: self.cells.map(|cell| match cell {
                Cell::Player => Cell::Ai,
                Cell::Ai => Cell::Player,
                Cell::Empty => Cell::Empty,
            }),
        }
    }

    /// Compact 9-character representation
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
