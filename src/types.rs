//! Newtype wrappers and shared constants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Board, Cell};

/// Board size constant for Tic-Tac-Toe.
pub const BOARD_SIZE: usize = 9;

/// Number of distinct raw cell assignments (3^9).
pub const STATE_SPACE_SIZE: usize = 19_683;

/// Lookup key for a board in the value table.
///
/// The key is the base-3 number formed by the nine cells, cell 0 being the
/// most significant digit (`Empty = 0`, `Player = 1`, `Ai = 2`). Every raw
/// board has its own key; no symmetry reduction is applied, so the encoding is
/// a bijection between boards and `0..3^9`.
///
/// # Examples
///
/// ```
/// use ttt_mc::tictactoe::{Board, Side};
/// use ttt_mc::types::StateKey;
///
/// let board = Board::new().apply(4, Side::Player).unwrap();
/// let key = board.canonical_key();
/// assert_eq!(key.to_board(), board);
/// assert_eq!(key.to_string(), "....O....");
/// assert_eq!(StateKey::parse("....O....").unwrap(), key);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct StateKey(u16);

impl StateKey {
    /// Encode a full set of cells.
    pub fn from_cells(cells: &[Cell; BOARD_SIZE]) -> Self {
        let raw = cells
            .iter()
            .fold(0u16, |acc, &cell| acc * 3 + Self::digit(cell));
        StateKey(raw)
    }

    /// Wrap a raw encoded value, validating it is inside the state space.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BoardInvariant`] if `raw >= 3^9`.
    pub fn new(raw: u16) -> Result<Self, crate::Error> {
        if usize::from(raw) < STATE_SPACE_SIZE {
            Ok(StateKey(raw))
        } else {
            Err(crate::Error::board(format!(
                "state key {raw} is outside the 3^9 state space"
            )))
        }
    }

    /// Parse the 9-character display form (`.`, `O`, `X`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid board string.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        Board::from_string(s).map(|board| board.canonical_key())
    }

    /// Get the inner value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Decode the key back into the board it was built from.
    pub fn to_board(&self) -> Board {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        let mut raw = self.0;
        for cell in cells.iter_mut().rev() {
            *cell = match raw % 3 {
                0 => Cell::Empty,
                1 => Cell::Player,
                _ => Cell::Ai,
            };
            raw /= 3;
        }
        Board::from_cells(cells)
    }

    fn digit(cell: Cell) -> u16 {
        match cell {
            Cell::Empty => 0,
            Cell::Player => 1,
            Cell::Ai => 2,
        }
    }
}

impl TryFrom<u16> for StateKey {
    type Error = crate::Error;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        StateKey::new(raw)
    }
}

impl From<StateKey> for u16 {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_board().encode())
    }
}

/// Default terminal rewards from the AI's point of view.
pub mod reward {
    /// Reward for an AI win.
    pub const WIN: f64 = 1.0;

    /// Reward for a draw. Draws still update visited states.
    pub const DRAW: f64 = 0.0;

    /// Reward for an AI loss.
    pub const LOSS: f64 = -1.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_key_is_zero() {
        assert_eq!(Board::new().canonical_key().value(), 0);
    }

    #[test]
    fn test_key_bounds() {
        assert!(StateKey::new(0).is_ok());
        assert!(StateKey::new(19_682).is_ok());
        assert!(StateKey::new(19_683).is_err());
    }

    #[test]
    fn test_full_ai_board_is_max_key() {
        let key = StateKey::from_cells(&[Cell::Ai; BOARD_SIZE]);
        assert_eq!(usize::from(key.value()), STATE_SPACE_SIZE - 1);
    }

    #[test]
    fn test_every_raw_key_decodes_and_reencodes() {
        for raw in 0..STATE_SPACE_SIZE as u16 {
            let key = StateKey::new(raw).unwrap();
            assert_eq!(key.to_board().canonical_key(), key);
        }
    }

    #[test]
    fn test_display_uses_board_symbols() {
        let key = StateKey::parse("XO.......").unwrap();
        assert_eq!(key.to_string(), "XO.......");
    }
}
