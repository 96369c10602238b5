//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Side};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a side has three in a row
    pub fn has_won(cells: &[Cell; 9], side: Side) -> bool {
        let target = side.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// The first line (in [`WINNING_LINES`] order) that is uniform and non-empty
    pub fn completed_line(cells: &[Cell; 9]) -> Option<(Side, [usize; 3])> {
        WINNING_LINES.iter().find_map(|&line| {
            let first = cells[line[0]].to_side()?;
            line.iter()
                .all(|&idx| cells[idx] == cells[line[0]])
                .then_some((first, line))
        })
    }
}
