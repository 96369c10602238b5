//! Monte Carlo value learning for tic-tac-toe
//!
//! This crate provides:
//! - Board representation, legality checks and outcome detection
//! - A learned afterstate value table keyed by a compact board encoding
//! - A tiered move selector (win now, block, value lookup)
//! - A Monte Carlo trainer with configurable opponents and exploration
//! - Table persistence, match evaluation and a turn-serving API

pub mod adapters;
pub mod cli;
pub mod error;
pub mod monte_carlo;
pub mod persistence;
pub mod pipeline;
pub mod ports;
pub mod selector;
pub mod serving;
pub mod tictactoe;
pub mod types;
pub mod value_table;

pub use error::{Error, Result};
pub use monte_carlo::{MonteCarloTrainer, TrainerConfig, TrainingResult};
pub use persistence::SavedValueTable;
pub use selector::{Decision, MoveSelector, select_move};
pub use serving::{MoveService, TurnRequest, TurnResponse};
pub use tictactoe::{Board, GameOutcome, Side};
pub use types::StateKey;
pub use value_table::ValueTable;
