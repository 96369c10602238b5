//! Move policies used as training opponents and evaluation players

use std::sync::Arc;

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ports::Policy,
    selector::MoveSelector,
    tictactoe::{Board, Side},
    value_table::ValueTable,
};

fn random_legal_move(board: &Board, rng: &mut StdRng) -> Result<usize> {
    let moves = board.legal_moves();
    if moves.is_empty() || board.is_terminal() {
        return Err(Error::NoLegalMove {
            outcome: board.outcome(),
        });
    }
    let index = rng.random_range(0..moves.len());
    Ok(moves[index])
}

/// Uniformly random legal moves
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a random policy with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_move(&mut self, board: &Board, _side: Side) -> Result<usize> {
        random_legal_move(board, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Defensive policy (blocks immediate threats)
///
/// 1. Block the opponent's winning move if there is one
/// 2. Otherwise play randomly
///
/// It never looks for its own win.
pub struct DefensivePolicy {
    name: String,
    rng: StdRng,
}

impl DefensivePolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for DefensivePolicy {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<usize> {
        if !board.is_terminal()
            && let Some(block) = board.winning_move_for(side.opponent())
        {
            return Ok(block);
        }
        random_legal_move(board, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Tactical policy: win now, else block, else random
pub struct TacticalPolicy {
    name: String,
    rng: StdRng,
}

impl TacticalPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for TacticalPolicy {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<usize> {
        if !board.is_terminal()
            && let Some(position) = board
                .winning_move_for(side)
                .or_else(|| board.winning_move_for(side.opponent()))
        {
            return Ok(position);
        }
        random_legal_move(board, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Frozen learned policy: runs a [`MoveSelector`] against a shared table
///
/// Deterministic, so reseeding is a no-op.
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    name: String,
    table: Arc<ValueTable>,
    selector: Arc<MoveSelector>,
}

impl GreedyPolicy {
    /// Full cascade: win, block, then value
    pub fn new(name: impl Into<String>, table: Arc<ValueTable>) -> Self {
        Self::with_selector(name, table, MoveSelector::standard())
    }

    /// Value lookups only, the way the agent exploits during training
    pub fn value_only(name: impl Into<String>, table: Arc<ValueTable>) -> Self {
        Self::with_selector(name, table, MoveSelector::value_only())
    }

    pub fn with_selector(
        name: impl Into<String>,
        table: Arc<ValueTable>,
        selector: MoveSelector,
    ) -> Self {
        Self {
            name: name.into(),
            table,
            selector: Arc::new(selector),
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }
}

impl Policy for GreedyPolicy {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<usize> {
        self.selector.select_move(board, side, &self.table)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Cell;

    fn board(values: [i8; 9]) -> Board {
        Board::from_values(&values).unwrap()
    }

    #[test]
    fn test_random_policy_returns_legal_moves() {
        let mut policy = RandomPolicy::with_seed("random", 7);
        let position = board([1, -1, 1, -1, 1, 0, 0, 0, 0]);
        for _ in 0..50 {
            let mv = policy.select_move(&position, Side::Ai).unwrap();
            assert_eq!(position.get(mv), Some(Cell::Empty));
        }
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let mut a = RandomPolicy::with_seed("a", 42);
        let mut b = RandomPolicy::new("b");
        b.set_rng_seed(42).unwrap();
        let empty = Board::new();
        for _ in 0..20 {
            assert_eq!(
                a.select_move(&empty, Side::Player).unwrap(),
                b.select_move(&empty, Side::Player).unwrap()
            );
        }
    }

    #[test]
    fn test_random_policy_rejects_finished_game() {
        let mut policy = RandomPolicy::with_seed("random", 1);
        let won = board([1, 1, 1, -1, -1, 0, 0, 0, 0]);
        assert!(matches!(
            policy.select_move(&won, Side::Ai),
            Err(Error::NoLegalMove { .. })
        ));
    }

    #[test]
    fn test_defensive_policy_blocks_but_does_not_win() {
        // PLAYER threatens 2; the AI could win at 5 but a defensive policy blocks.
        let position = board([1, 1, 0, -1, -1, 0, 1, 0, 0]);
        let mut policy = DefensivePolicy::with_seed("defensive", 3);
        assert_eq!(policy.select_move(&position, Side::Ai).unwrap(), 2);
    }

    #[test]
    fn test_tactical_policy_prefers_win() {
        let position = board([1, 1, 0, -1, -1, 0, 1, 0, 0]);
        let mut policy = TacticalPolicy::with_seed("tactical", 3);
        assert_eq!(policy.select_move(&position, Side::Ai).unwrap(), 5);
    }

    #[test]
    fn test_greedy_policy_follows_values() {
        let mut table = ValueTable::new();
        let empty = Board::new();
        let after = empty.apply(6, Side::Player).unwrap();
        table.set(after.canonical_key(), 0.5);
        let mut policy = GreedyPolicy::new("greedy", Arc::new(table));
        assert_eq!(policy.select_move(&empty, Side::Player).unwrap(), 6);
        assert_eq!(policy.name(), "greedy");
    }
}
