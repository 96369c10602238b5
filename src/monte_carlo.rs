//! Monte Carlo value learning
//!
//! Training plays complete games against a configurable opponent, records the
//! afterstates each side produced, and moves every visited state's value toward
//! the discounted return that followed it.

pub mod config;
pub mod episode;
pub mod schedule;
pub mod trainer;

pub use config::{
    OpponentCredit, OpponentKind, RewardSchedule, TieBreak, TrainerConfig, UpdateMode,
};
pub use episode::{Episode, Step, Trajectory};
pub use schedule::{Decay, EpsilonSchedule};
pub use trainer::{MonteCarloTrainer, TrainingResult};
