//! Stateless turn service
//!
//! A caller sends the current board and the player's move; the service applies
//! it, answers with the AI's move (unless the game just ended), and reports the
//! resulting position. Nothing is kept between calls, so one [`MoveService`]
//! can be cloned into any number of threads.
//!
//! ```
//! use std::sync::Arc;
//! use ttt_mc::{
//!     serving::{MoveService, TurnRequest},
//!     tictactoe::GameOutcome,
//!     value_table::ValueTable,
//! };
//!
//! let service = MoveService::new(Arc::new(ValueTable::new()));
//! let response = service
//!     .play_turn(&TurnRequest {
//!         board: vec![1, 0, 0, 0, -1, 0, 0, 0, 0],
//!         position: 1,
//!     })
//!     .unwrap();
//!
//! // The player threatened the top row, so the AI blocked it.
//! assert_eq!(response.ai_move, Some(2));
//! assert_eq!(response.outcome, GameOutcome::Ongoing);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    selector::{Decision, MoveSelector},
    tictactoe::{Board, GameOutcome, Side},
    value_table::ValueTable,
};

/// One player turn: the board before the move and the cell the player takes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Nine cells: `0` empty, `1` player, `-1` AI
    pub board: Vec<i8>,
    #[serde(rename = "move")]
    pub position: usize,
}

/// Position after the player's move and the AI's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub board_list: Vec<i8>,
    /// Three rows of `.`, `O` and `X`
    pub board_str: String,
    /// `None` when the player's move ended the game
    pub ai_move: Option<usize>,
    pub outcome: GameOutcome,
    /// "You win", "AI wins", "Draw", or empty while the game goes on
    pub message: String,
}

impl TurnResponse {
    fn new(board: &Board, ai_move: Option<usize>) -> Self {
        let outcome = board.outcome();
        Self {
            board_list: board.values().to_vec(),
            board_str: board.to_string(),
            ai_move,
            outcome,
            message: outcome.message().to_string(),
        }
    }
}

/// Read-only move service over a trained table
#[derive(Debug, Clone)]
pub struct MoveService {
    table: Arc<ValueTable>,
    selector: Arc<MoveSelector>,
}

impl MoveService {
    /// Service using the standard win / block / value cascade
    pub fn new(table: Arc<ValueTable>) -> Self {
        Self::with_selector(table, MoveSelector::standard())
    }

    pub fn with_selector(table: Arc<ValueTable>, selector: MoveSelector) -> Self {
        Self {
            table,
            selector: Arc::new(selector),
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Choose a move for `side` on `board`.
    ///
    /// # Errors
    ///
    /// See [`MoveSelector::decide`].
    pub fn select(&self, board: &Board, side: Side) -> Result<Decision> {
        self.selector.decide(board, side, &self.table)
    }

    /// Apply the player's move and answer it.
    ///
    /// # Errors
    ///
    /// - [`Error::BoardInvariant`] if the board is malformed, unreachable, or
    ///   it is not the player's turn
    /// - [`Error::NoLegalMove`] if the game is already over
    /// - [`Error::InvalidMove`] if the player's cell is out of range or taken
    pub fn play_turn(&self, request: &TurnRequest) -> Result<TurnResponse> {
        let board = Board::from_values(&request.board)?;
        if board.side_to_move()? != Side::Player {
            return Err(Error::board("it is not the player's turn"));
        }
        let outcome = board.outcome();
        if outcome.is_terminal() {
            return Err(Error::NoLegalMove { outcome });
        }

        let board = board.apply(request.position, Side::Player)?;
        if board.is_terminal() {
            debug!(board = %board.encode(), outcome = %board.outcome(), "player move ended the game");
            return Ok(TurnResponse::new(&board, None));
        }

        let decision = self.select(&board, Side::Ai)?;
        let board = board.apply(decision.position, Side::Ai)?;
        Ok(TurnResponse::new(&board, Some(decision.position)))
    }
}
