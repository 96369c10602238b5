//! Observer port - abstraction for training and evaluation observation
//!
//! This port lets progress bars and log reporters follow a run without the
//! training loop knowing about any output format.

use crate::{Result, tictactoe::GameOutcome};

/// Observer trait for monitoring training and evaluation runs
///
/// # Event Sequence
///
/// 1. `on_run_start(total_games)` - once
/// 2. `on_game_end(game_num, outcome, epsilon)` - after every game
/// 3. `on_run_end()` - once
///
/// `epsilon` is the exploration rate the game was played with; evaluation
/// runs report `0.0`.
///
/// # Examples
///
/// ```no_run
/// use ttt_mc::{ports::Observer, tictactoe::GameOutcome};
///
/// struct DrawCounter {
///     draws: usize,
/// }
///
/// impl Observer for DrawCounter {
///     fn on_game_end(
///         &mut self,
///         _game_num: usize,
///         outcome: GameOutcome,
///         _epsilon: f64,
///     ) -> ttt_mc::Result<()> {
///         if outcome == GameOutcome::Draw {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first game.
    fn on_run_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each game reaches a terminal outcome.
    fn on_game_end(&mut self, _game_num: usize, _outcome: GameOutcome, _epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
