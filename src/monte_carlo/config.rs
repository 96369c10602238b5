//! Trainer configuration

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::schedule::EpsilonSchedule;
use crate::{Error, Result, tictactoe::GameOutcome, types::reward};

/// Which occurrences of a state inside one trajectory receive an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    #[default]
    EveryVisit,
    FirstVisit,
}

/// Policy driving the PLAYER side during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// Uniformly random legal moves
    #[default]
    Random,
    /// Blocks immediate threats, otherwise random
    Defensive,
    /// Takes immediate wins, then blocks, otherwise random
    Tactical,
    /// ε-greedy lookups in the table being trained
    SelfPlay,
}

/// Whether the opponent's moves are credited in the shared table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentCredit {
    #[default]
    None,
    /// Opponent afterstates learn from the negated terminal reward
    Negated,
}

/// How ties between equally valued moves are resolved while exploiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Random,
    Lowest,
}

macro_rules! parse_keyword_enum {
    ($ty:ty, $what:literal, { $($text:literal => $variant:path),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
                    $($text => Ok($variant),)+
                    other => Err(Error::config(format!(
                        concat!("unknown ", $what, " '{}'. Use one of: {}"),
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let text = match self {
                    $($variant => $text,)+
                };
                f.write_str(text)
            }
        }
    };
}

parse_keyword_enum!(UpdateMode, "update mode", {
    "every-visit" => UpdateMode::EveryVisit,
    "first-visit" => UpdateMode::FirstVisit,
});

parse_keyword_enum!(OpponentKind, "opponent", {
    "random" => OpponentKind::Random,
    "defensive" => OpponentKind::Defensive,
    "tactical" => OpponentKind::Tactical,
    "self-play" => OpponentKind::SelfPlay,
});

parse_keyword_enum!(OpponentCredit, "opponent credit", {
    "none" => OpponentCredit::None,
    "negated" => OpponentCredit::Negated,
});

parse_keyword_enum!(TieBreak, "tie break", {
    "random" => TieBreak::Random,
    "lowest" => TieBreak::Lowest,
});

/// Terminal rewards, seen from the AI's side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl RewardSchedule {
    /// Reward the AI receives for `outcome`; ongoing games score nothing
    pub fn for_ai(&self, outcome: GameOutcome) -> f64 {
        match outcome {
            GameOutcome::AiWin => self.win,
            GameOutcome::PlayerWin => self.loss,
            GameOutcome::Draw => self.draw,
            GameOutcome::Ongoing => 0.0,
        }
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            win: reward::WIN,
            draw: reward::DRAW,
            loss: reward::LOSS,
        }
    }
}

/// Monte Carlo training configuration
///
/// Every field has a default, so a JSON file only needs the fields it changes:
///
/// ```
/// use ttt_mc::monte_carlo::{OpponentKind, TrainerConfig};
///
/// let config: TrainerConfig =
///     serde_json::from_str(r#"{ "episodes": 5000, "opponent": "tactical" }"#).unwrap();
/// assert_eq!(config.episodes, 5000);
/// assert_eq!(config.opponent, OpponentKind::Tactical);
/// assert_eq!(config.gamma, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of self-contained games to learn from
    pub episodes: usize,
    /// Discount factor, in (0, 1]
    pub gamma: f64,
    pub epsilon: EpsilonSchedule,
    pub update: UpdateMode,
    pub opponent: OpponentKind,
    pub opponent_credit: OpponentCredit,
    /// Let the AI take immediate wins and blocks before consulting values
    pub agent_tactics: bool,
    pub tie_break: TieBreak,
    pub rewards: RewardSchedule,
    /// Reward attached to every non-terminal move
    pub step_penalty: f64,
    /// Floor for the `1/N` step size
    pub min_step_size: f64,
    /// Value assumed for states the table has never seen
    pub default_value: f64,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 300_000,
            gamma: 0.9,
            epsilon: EpsilonSchedule::default(),
            update: UpdateMode::default(),
            opponent: OpponentKind::default(),
            opponent_credit: OpponentCredit::default(),
            agent_tactics: false,
            tie_break: TieBreak::default(),
            rewards: RewardSchedule::default(),
            step_penalty: 0.0,
            min_step_size: 0.0,
            default_value: 0.0,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Check every field is inside its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::config("episodes must be greater than zero"));
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(Error::config(format!(
                "gamma must be in (0, 1], got {}",
                self.gamma
            )));
        }
        self.epsilon.validate()?;
        if !(0.0..=1.0).contains(&self.min_step_size) {
            return Err(Error::config(format!(
                "min_step_size must be within [0, 1], got {}",
                self.min_step_size
            )));
        }

        let finite = [
            ("rewards.win", self.rewards.win),
            ("rewards.draw", self.rewards.draw),
            ("rewards.loss", self.rewards.loss),
            ("step_penalty", self.step_penalty),
            ("default_value", self.default_value),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::config(format!("{name} must be finite, got {value}")));
        }

        Ok(())
    }

    /// Defaults plus a -0.04 per-move penalty and a 0.01 step-size floor,
    /// the settings the first published tables were trained with.
    pub fn legacy() -> Self {
        Self {
            step_penalty: -0.04,
            min_step_size: 0.01,
            ..Self::default()
        }
    }
}
