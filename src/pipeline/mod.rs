//! Match and evaluation pipeline
//!
//! This module provides:
//! - Opponent policies (random, defensive, tactical) and the frozen greedy policy
//! - A match pipeline that tallies outcomes from the AI's side
//! - Observers that report progress during long runs

pub mod evaluation;
pub mod observers;
pub mod policies;

pub use evaluation::{MatchConfig, MatchPipeline, MatchResult, play_game};
pub use observers::{LogObserver, ProgressObserver};
pub use policies::{DefensivePolicy, GreedyPolicy, RandomPolicy, TacticalPolicy};

pub use crate::ports::{Observer, Policy};
