//! Episode bookkeeping: per-side trajectories and discounted returns

use serde::Serialize;

use crate::{tictactoe::GameOutcome, types::StateKey};

/// One move made by one side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Step {
    /// Afterstate produced by the move
    pub state: StateKey,
    pub action: usize,
    pub reward: f64,
}

/// Ordered moves of one side during one episode
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    steps: Vec<Step>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Replace the reward of the final step with the terminal reward.
    ///
    /// Does nothing on an empty trajectory.
    pub fn finish(&mut self, terminal_reward: f64) {
        if let Some(last) = self.steps.last_mut() {
            last.reward = terminal_reward;
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discounted return for every step, computed backwards:
    /// `G_t = r_t + gamma * G_{t+1}`
    pub fn returns(&self, gamma: f64) -> Vec<f64> {
        let mut returns = vec![0.0; self.steps.len()];
        let mut g = 0.0;
        for (i, step) in self.steps.iter().enumerate().rev() {
            g = step.reward + gamma * g;
            returns[i] = g;
        }
        returns
    }
}

impl FromIterator<Step> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Everything recorded while playing one training game
#[derive(Debug, Clone, Serialize)]
pub struct Episode {
    pub outcome: GameOutcome,
    /// Exploration rate the AI played with
    pub epsilon: f64,
    /// Moves made by the AI
    pub agent: Trajectory,
    /// Moves made by the PLAYER side
    pub opponent: Trajectory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(raw: u16, reward: f64) -> Step {
        Step {
            state: StateKey::new(raw).unwrap(),
            action: 0,
            reward,
        }
    }

    #[test]
    fn test_returns_discount_backwards() {
        let trajectory: Trajectory = [step(1, 0.0), step(2, 0.0), step(3, 1.0)]
            .into_iter()
            .collect();
        let returns = trajectory.returns(0.9);
        assert_eq!(returns.len(), 3);
        assert!((returns[2] - 1.0).abs() < 1e-12);
        assert!((returns[1] - 0.9).abs() < 1e-12);
        assert!((returns[0] - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_returns_include_step_penalties() {
        let trajectory: Trajectory = [step(1, -0.04), step(2, -1.0)].into_iter().collect();
        let returns = trajectory.returns(1.0);
        assert!((returns[0] + 1.04).abs() < 1e-12);
        assert!((returns[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_finish_overwrites_last_reward() {
        let mut trajectory: Trajectory = [step(1, -0.04), step(2, -0.04)].into_iter().collect();
        trajectory.finish(1.0);
        assert_eq!(trajectory.steps()[0].reward, -0.04);
        assert_eq!(trajectory.steps()[1].reward, 1.0);

        let mut empty = Trajectory::new();
        empty.finish(1.0);
        assert!(empty.is_empty());
        assert!(empty.returns(0.9).is_empty());
    }
}
