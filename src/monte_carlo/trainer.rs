//! Monte Carlo control over afterstate values

use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng, random, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    config::{OpponentCredit, OpponentKind, TieBreak, TrainerConfig, UpdateMode},
    episode::{Episode, Step, Trajectory},
};
use crate::{
    Error, Result,
    pipeline::{DefensivePolicy, MatchResult, RandomPolicy, TacticalPolicy},
    ports::{Observer, Policy},
    selector::{MoveSelector, ValueGreedy},
    tictactoe::{Board, Side},
    types::StateKey,
    value_table::ValueTable,
};

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Outcomes of the training games, from the AI's side
    pub games: MatchResult,

    /// Number of states with a learned value
    pub table_size: usize,

    /// Exploration rate of the last episode
    pub final_epsilon: f64,
}

enum Opponent {
    Fixed(Box<dyn Policy>),
    SelfPlay,
}

/// Every-visit (or first-visit) Monte Carlo trainer
///
/// The AI learns the value of the afterstates it produces. Each episode starts
/// on an empty board with the PLAYER (the opponent) to move; once the game
/// ends the discounted returns of the AI's moves are averaged into the table.
///
/// ```
/// use ttt_mc::monte_carlo::{MonteCarloTrainer, TrainerConfig};
///
/// let config = TrainerConfig {
///     episodes: 200,
///     seed: Some(7),
///     ..TrainerConfig::default()
/// };
/// let mut trainer = MonteCarloTrainer::new(config).unwrap();
/// let result = trainer.train().unwrap();
/// assert_eq!(result.games.total_games, 200);
/// assert!(!trainer.into_table().is_empty());
/// ```
pub struct MonteCarloTrainer {
    config: TrainerConfig,
    table: ValueTable,
    visits: HashMap<StateKey, u64>,
    opponent: Opponent,
    tactics: Option<MoveSelector>,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
}

impl MonteCarloTrainer {
    /// Create a trainer with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration does not
    /// validate.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(random()),
        };

        let mut opponent = match config.opponent {
            OpponentKind::Random => Opponent::Fixed(Box::new(RandomPolicy::new("random"))),
            OpponentKind::Defensive => {
                Opponent::Fixed(Box::new(DefensivePolicy::new("defensive")))
            }
            OpponentKind::Tactical => Opponent::Fixed(Box::new(TacticalPolicy::new("tactical"))),
            OpponentKind::SelfPlay => Opponent::SelfPlay,
        };
        if let (Opponent::Fixed(policy), Some(seed)) = (&mut opponent, config.seed) {
            policy.set_rng_seed(seed.wrapping_add(1))?;
        }

        if config.opponent == OpponentKind::SelfPlay
            && config.opponent_credit == OpponentCredit::None
        {
            warn!("self-play without opponent credit: PLAYER moves will never be learned");
        }

        let tactics = config.agent_tactics.then(MoveSelector::tactical);

        Ok(Self {
            table: ValueTable::with_default(config.default_value),
            visits: HashMap::new(),
            opponent,
            tactics,
            rng,
            observers: Vec::new(),
            config,
        })
    }

    /// Add an observer notified after every episode
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replace the configured opponent with a custom policy
    pub fn with_opponent(mut self, opponent: Box<dyn Policy>) -> Self {
        self.opponent = Opponent::Fixed(opponent);
        self
    }

    /// Continue training from an existing table; visit counts start over
    pub fn with_table(mut self, table: ValueTable) -> Self {
        self.table = table;
        self.visits.clear();
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Consume the trainer, keeping only the learned values
    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// Number of updates applied to `key` so far
    pub fn visit_count(&self, key: StateKey) -> u64 {
        self.visits.get(&key).copied().unwrap_or(0)
    }

    /// Exploration rate used for `episode` (0-based)
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        self.config.epsilon.epsilon_at(episode, self.config.episodes)
    }

    /// Play one episode without touching the table.
    ///
    /// # Errors
    ///
    /// Propagates failures from the opponent policy.
    pub fn run_episode(&mut self, episode: usize) -> Result<Episode> {
        let epsilon = self.epsilon_at(episode);
        let mut board = Board::new();
        let mut side = Side::Player;
        let mut agent = Trajectory::new();
        let mut opponent = Trajectory::new();

        loop {
            let position = match side {
                Side::Ai => self.epsilon_greedy_move(&board, Side::Ai, epsilon)?,
                Side::Player => self.opponent_move(&board, epsilon)?,
            };
            board = board.apply(position, side)?;

            let step = Step {
                state: board.canonical_key(),
                action: position,
                reward: self.config.step_penalty,
            };
            match side {
                Side::Ai => agent.push(step),
                Side::Player => opponent.push(step),
            }

            let outcome = board.outcome();
            if outcome.is_terminal() {
                let reward = self.config.rewards.for_ai(outcome);
                agent.finish(reward);
                opponent.finish(-reward);
                return Ok(Episode {
                    outcome,
                    epsilon,
                    agent,
                    opponent,
                });
            }
            side = side.opponent();
        }
    }

    /// Apply the Monte Carlo update for every step of `trajectory`.
    ///
    /// `N[s] += 1`, `alpha = max(1/N[s], min_step_size)`,
    /// `V[s] += alpha * (G - V[s])`. Returns the number of updates made.
    pub fn update_from_trajectory(&mut self, trajectory: &Trajectory) -> usize {
        let returns = trajectory.returns(self.config.gamma);
        let mut seen = HashSet::new();
        let mut updated = 0;

        for (step, &target) in trajectory.steps().iter().zip(&returns) {
            if self.config.update == UpdateMode::FirstVisit && !seen.insert(step.state) {
                continue;
            }

            let count = self.visits.entry(step.state).or_insert(0);
            *count += 1;
            let alpha = (1.0 / *count as f64).max(self.config.min_step_size);
            self.table.update_toward(step.state, target, alpha);
            updated += 1;
        }

        updated
    }

    /// Learn from a finished episode: always the AI's moves, and the
    /// opponent's moves when opponent credit is enabled.
    pub fn learn(&mut self, episode: &Episode) -> usize {
        let mut updated = self.update_from_trajectory(&episode.agent);
        if self.config.opponent_credit == OpponentCredit::Negated {
            updated += self.update_from_trajectory(&episode.opponent);
        }
        updated
    }

    /// Run every configured episode.
    ///
    /// # Errors
    ///
    /// Propagates policy and observer failures.
    pub fn train(&mut self) -> Result<TrainingResult> {
        let total = self.config.episodes;
        info!(
            episodes = total,
            gamma = self.config.gamma,
            opponent = %self.config.opponent,
            update = %self.config.update,
            credit = %self.config.opponent_credit,
            seed = ?self.config.seed,
            "starting Monte Carlo training"
        );

        for observer in &mut self.observers {
            observer.on_run_start(total)?;
        }

        let mut games = MatchResult::default();
        let mut final_epsilon = self.config.epsilon.start;
        for episode_num in 0..total {
            let episode = self.run_episode(episode_num)?;
            self.learn(&episode);
            games.record(episode.outcome);
            final_epsilon = episode.epsilon;

            for observer in &mut self.observers {
                observer.on_game_end(episode_num, episode.outcome, episode.epsilon)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        info!(
            wins = games.wins,
            draws = games.draws,
            losses = games.losses,
            states = self.table.len(),
            "training finished"
        );

        Ok(TrainingResult {
            games,
            table_size: self.table.len(),
            final_epsilon,
        })
    }

    fn opponent_move(&mut self, board: &Board, epsilon: f64) -> Result<usize> {
        if let Opponent::Fixed(policy) = &mut self.opponent {
            return policy.select_move(board, Side::Player);
        }
        self.epsilon_greedy_move(board, Side::Player, epsilon)
    }

    fn epsilon_greedy_move(&mut self, board: &Board, side: Side, epsilon: f64) -> Result<usize> {
        let legal = board.legal_moves();
        if legal.is_empty() {
            return Err(Error::NoLegalMove {
                outcome: board.outcome(),
            });
        }

        if self.rng.random::<f64>() < epsilon {
            return Ok(legal[self.rng.random_range(0..legal.len())]);
        }

        if let Some(tactics) = &self.tactics
            && let Some(decision) = tactics.propose(board, side, &self.table)
        {
            debug!(position = decision.position, tier = decision.tier, "tactical move");
            return Ok(decision.position);
        }

        let best = ValueGreedy::best_moves(board, side, &self.table);
        match (self.config.tie_break, best.as_slice()) {
            (_, []) => Err(Error::NoLegalMove {
                outcome: board.outcome(),
            }),
            (TieBreak::Lowest, [first, ..]) => Ok(*first),
            (TieBreak::Random, candidates) => {
                Ok(candidates[self.rng.random_range(0..candidates.len())])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monte_carlo::EpsilonSchedule,
        tictactoe::{GameOutcome, WINNING_LINES},
    };

    fn config(episodes: usize) -> TrainerConfig {
        TrainerConfig {
            episodes,
            seed: Some(11),
            ..TrainerConfig::default()
        }
    }

    fn key(values: [i8; 9]) -> StateKey {
        Board::from_values(&values).unwrap().canonical_key()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = MonteCarloTrainer::new(TrainerConfig {
            gamma: 0.0,
            ..config(10)
        });
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_episode_alternates_and_terminates() {
        let mut trainer = MonteCarloTrainer::new(config(10)).unwrap();
        for episode_num in 0..20 {
            let episode = trainer.run_episode(episode_num).unwrap();
            assert!(episode.outcome.is_terminal());

            let player_moves = episode.opponent.len();
            let ai_moves = episode.agent.len();
            assert!(player_moves == ai_moves || player_moves == ai_moves + 1);
            assert!(player_moves + ai_moves <= 9);

            let reward = episode.agent.steps().last().unwrap().reward;
            let expected = match episode.outcome {
                GameOutcome::AiWin => 1.0,
                GameOutcome::PlayerWin => -1.0,
                _ => 0.0,
            };
            assert_eq!(reward, expected);
        }
        assert!(trainer.table().is_empty(), "running episodes must not learn");
    }

    #[test]
    fn test_player_moves_first() {
        let mut trainer = MonteCarloTrainer::new(config(10)).unwrap();
        let episode = trainer.run_episode(0).unwrap();
        let first = episode.opponent.steps()[0].state.to_board();
        assert_eq!(first.counts().player, 1);
        assert_eq!(first.counts().ai, 0);
    }

    #[test]
    fn test_update_uses_sample_average() {
        let mut trainer = MonteCarloTrainer::new(TrainerConfig {
            gamma: 1.0,
            ..config(10)
        })
        .unwrap();
        let state = key([1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let win: Trajectory = [Step {
            state,
            action: 4,
            reward: 1.0,
        }]
        .into_iter()
        .collect();
        let loss: Trajectory = [Step {
            state,
            action: 4,
            reward: -1.0,
        }]
        .into_iter()
        .collect();

        assert_eq!(trainer.update_from_trajectory(&win), 1);
        assert_eq!(trainer.table().value(state), 1.0);
        trainer.update_from_trajectory(&loss);
        assert_eq!(trainer.table().value(state), 0.0);
        trainer.update_from_trajectory(&win);
        assert!((trainer.table().value(state) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(trainer.visit_count(state), 3);
    }

    #[test]
    fn test_min_step_size_floors_alpha() {
        let mut trainer = MonteCarloTrainer::new(TrainerConfig {
            min_step_size: 0.5,
            ..config(10)
        })
        .unwrap();
        let state = key([1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let step = |reward| -> Trajectory {
            [Step {
                state,
                action: 4,
                reward,
            }]
            .into_iter()
            .collect()
        };
        trainer.update_from_trajectory(&step(1.0));
        trainer.update_from_trajectory(&step(1.0));
        trainer.update_from_trajectory(&step(0.0));
        // third update uses alpha = max(1/3, 0.5)
        assert!((trainer.table().value(state) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_first_visit_skips_repeats() {
        let state = key([1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let repeated: Trajectory = [
            Step {
                state,
                action: 4,
                reward: 0.0,
            },
            Step {
                state,
                action: 4,
                reward: 1.0,
            },
        ]
        .into_iter()
        .collect();

        let mut every = MonteCarloTrainer::new(config(10)).unwrap();
        assert_eq!(every.update_from_trajectory(&repeated), 2);

        let mut first = MonteCarloTrainer::new(TrainerConfig {
            update: UpdateMode::FirstVisit,
            ..config(10)
        })
        .unwrap();
        assert_eq!(first.update_from_trajectory(&repeated), 1);
        assert!((first.table().value(state) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_negated_credit_learns_player_states() {
        let mut trainer = MonteCarloTrainer::new(TrainerConfig {
            opponent_credit: OpponentCredit::Negated,
            ..config(10)
        })
        .unwrap();
        let episode = trainer.run_episode(0).unwrap();
        let updated = trainer.learn(&episode);
        assert_eq!(updated, episode.agent.len() + episode.opponent.len());
        for step in episode.opponent.steps() {
            assert!(trainer.table().contains(step.state));
        }
    }

    #[test]
    fn test_greedy_agent_takes_learned_win() {
        // AI holds 3 and 4; the value table knows completing at 5 wins.
        let mut table = ValueTable::new();
        let board = Board::from_values(&[1, 1, 0, -1, -1, 0, 1, 0, 0]).unwrap();
        let winning = board.apply(5, Side::Ai).unwrap();
        table.set(winning.canonical_key(), 1.0);

        let mut trainer = MonteCarloTrainer::new(TrainerConfig {
            epsilon: EpsilonSchedule::constant(0.0),
            ..config(10)
        })
        .unwrap()
        .with_table(table);
        assert_eq!(trainer.epsilon_greedy_move(&board, Side::Ai, 0.0).unwrap(), 5);
    }

    #[test]
    fn test_agent_tactics_block_before_values() {
        let board = Board::from_values(&[1, 1, 0, 0, -1, 0, 0, 0, 0]).unwrap();
        let mut trainer = MonteCarloTrainer::new(TrainerConfig {
            agent_tactics: true,
            tie_break: TieBreak::Lowest,
            ..config(10)
        })
        .unwrap();
        assert_eq!(trainer.epsilon_greedy_move(&board, Side::Ai, 0.0).unwrap(), 2);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let run = || {
            let mut trainer = MonteCarloTrainer::new(config(300)).unwrap();
            let result = trainer.train().unwrap();
            (result, trainer.into_table())
        };
        let (first_result, first_table) = run();
        let (second_result, second_table) = run();
        assert_eq!(first_result, second_result);
        assert_eq!(first_table, second_table);
    }

    #[test]
    fn test_training_result_counts() {
        let mut trainer = MonteCarloTrainer::new(config(150)).unwrap();
        let result = trainer.train().unwrap();
        assert_eq!(result.games.total_games, 150);
        assert_eq!(
            result.games.wins + result.games.draws + result.games.losses,
            150
        );
        assert_eq!(result.table_size, trainer.table().len());
        assert!((result.final_epsilon - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_learned_terminal_states_are_wins() {
        let mut trainer = MonteCarloTrainer::new(config(2_000)).unwrap();
        trainer.train().unwrap();
        for (key, value) in trainer.table().iter() {
            let board = key.to_board();
            let ai_won = WINNING_LINES
                .iter()
                .any(|line| line.iter().all(|&i| board.values()[i] == -1));
            if ai_won {
                assert_eq!(value, 1.0, "{key} is an AI win");
            }
        }
    }
}
