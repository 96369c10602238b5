//! Policy port - anything that can pick a move for one side
//!
//! Training opponents, evaluation opponents and the frozen learned agent all
//! implement this trait so the match loop does not care which is which.

use crate::{
    Result,
    tictactoe::{Board, Side},
};

/// Policy trait - choose a move for a side on a board
///
/// Unlike the move selector, a policy may hold mutable state such as a random
/// number generator, hence `&mut self`.
///
/// # Examples
///
/// ```no_run
/// use ttt_mc::{
///     ports::Policy,
///     tictactoe::{Board, Side},
/// };
///
/// fn first_move<P: Policy>(policy: &mut P) -> ttt_mc::Result<usize> {
///     policy.select_move(&Board::new(), Side::Player)
/// }
/// ```
pub trait Policy: Send {
    /// Select a move for `side`.
    ///
    /// # Errors
    ///
    /// Returns an error if no legal move is available.
    fn select_move(&mut self, board: &Board, side: Side) -> Result<usize>;

    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Reseed the policy's random number generator.
    ///
    /// Pipelines call this when given a deterministic seed. Deterministic
    /// policies can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
