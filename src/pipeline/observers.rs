//! Observer implementations for training and evaluation runs
//!
//! Observers keep output formats out of the training loop.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{Result, ports::Observer, tictactoe::GameOutcome};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    wins: usize,
    draws: usize,
    losses: usize,
}

impl Tally {
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::AiWin => self.wins += 1,
            GameOutcome::PlayerWin => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }
    }

    fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }
}

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            tally: Tally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} D:{} L:{}",
            self.tally.wins, self.tally.draws, self.tally.losses
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome, _epsilon: f64) -> Result<()> {
        self.tally.record(outcome);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            if game_num.is_multiple_of(100) {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Logs a progress line every `interval` games
///
/// Rates cover only the games since the previous line, so the log shows how
/// play changes as exploration decays.
pub struct LogObserver {
    interval: usize,
    total_games: usize,
    window: Tally,
}

impl LogObserver {
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: usize) -> Self {
        assert!(interval > 0, "log interval must be a positive integer");
        Self {
            interval,
            total_games: 0,
            window: Tally::default(),
        }
    }
}

impl Observer for LogObserver {
    fn on_run_start(&mut self, total_games: usize) -> Result<()> {
        self.total_games = total_games;
        self.window = Tally::default();
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome, epsilon: f64) -> Result<()> {
        self.window.record(outcome);

        let played = game_num + 1;
        if played.is_multiple_of(self.interval) {
            let n = self.window.total().max(1) as f64;
            info!(
                game = played,
                total = self.total_games,
                epsilon = %format!("{epsilon:.4}"),
                win_rate = %format!("{:.3}", self.window.wins as f64 / n),
                draw_rate = %format!("{:.3}", self.window.draws as f64 / n),
                loss_rate = %format!("{:.3}", self.window.losses as f64 / n),
                "progress"
            );
            self.window = Tally::default();
        }
        Ok(())
    }
}
