//! Match pipeline: play a policy for the AI side against an opponent

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    ports::{Observer, Policy},
    tictactoe::{Game, GameOutcome, Side},
};

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: usize,

    /// Random seed for both policies
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10_000,
            seed: None,
        }
    }
}

/// Win/draw/loss tally, always from the AI's point of view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Total games played
    pub total_games: usize,

    /// Number of wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,
}

impl MatchResult {
    /// Create a new match result
    pub fn new(total_games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }

    /// Count one finished game
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::AiWin => self.wins += 1,
            GameOutcome::PlayerWin => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => return,
        }
        *self = Self::new(self.total_games + 1, self.wins, self.draws, self.losses);
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Plays `agent` as the AI against `opponent` as the PLAYER, who moves first
pub struct MatchPipeline {
    config: MatchConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl MatchPipeline {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Play every configured game and tally the outcomes
    pub fn run(&mut self, agent: &mut dyn Policy, opponent: &mut dyn Policy) -> Result<MatchResult> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }

        for observer in &mut self.observers {
            observer.on_run_start(self.config.num_games)?;
        }

        let mut result = MatchResult::new(0, 0, 0, 0);
        for game_num in 0..self.config.num_games {
            let outcome = play_game(agent, opponent)?;
            result.record(outcome);

            for observer in &mut self.observers {
                observer.on_game_end(game_num, outcome, 0.0)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        debug!(
            agent = agent.name(),
            opponent = opponent.name(),
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            "match finished"
        );

        Ok(result)
    }
}

/// Play a single game; the PLAYER (`opponent`) opens.
pub fn play_game(agent: &mut dyn Policy, opponent: &mut dyn Policy) -> Result<GameOutcome> {
    let mut game = Game::new();
    loop {
        let side = game.to_move();
        let policy: &mut dyn Policy = match side {
            Side::Ai => &mut *agent,
            Side::Player => &mut *opponent,
        };
        let position = policy.select_move(game.board(), side)?;
        let outcome = game.play(position)?;
        if outcome.is_terminal() {
            return Ok(outcome);
        }
    }
}
