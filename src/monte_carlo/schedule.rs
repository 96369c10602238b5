//! Exploration-rate schedules

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Shape of the decay from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decay {
    /// Straight line from `start` at the first episode to `end` at the last
    Linear,
    /// Geometric interpolation; requires `end > 0`
    Exponential,
    /// `max(end, start * factor^episode)`, independent of the run length
    Multiplicative { factor: f64 },
}

impl std::str::FromStr for Decay {
    type Err = Error;

    /// Parse `linear`, `exponential` or `multiplicative:<factor>`
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.split_once(':') {
            None if lowered == "linear" => Ok(Decay::Linear),
            None if lowered == "exponential" => Ok(Decay::Exponential),
            Some(("multiplicative", factor)) => factor
                .parse::<f64>()
                .map(|factor| Decay::Multiplicative { factor })
                .map_err(|_| Error::config(format!("invalid decay factor '{factor}'"))),
            _ => Err(Error::config(format!(
                "unknown epsilon decay '{s}'. Use 'linear', 'exponential' or 'multiplicative:<factor>'"
            ))),
        }
    }
}

/// ε-greedy exploration schedule, non-increasing over a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub end: f64,
    pub decay: Decay,
}

impl EpsilonSchedule {
    pub fn linear(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            decay: Decay::Linear,
        }
    }

    pub fn exponential(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            decay: Decay::Exponential,
        }
    }

    /// Always explore with the same rate
    pub fn constant(epsilon: f64) -> Self {
        Self::linear(epsilon, epsilon)
    }

    /// Check the schedule can only decrease and stays inside [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("start", self.start), ("end", self.end)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "epsilon {name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.end > self.start {
            return Err(Error::config(format!(
                "epsilon must not increase: end {} is above start {}",
                self.end, self.start
            )));
        }
        match self.decay {
            Decay::Exponential if self.end <= 0.0 => Err(Error::config(
                "exponential epsilon decay needs an end value above 0",
            )),
            Decay::Multiplicative { factor } if !(factor > 0.0 && factor <= 1.0) => Err(
                Error::config(format!("multiplicative decay factor must be in (0, 1], got {factor}")),
            ),
            _ => Ok(()),
        }
    }

    /// Exploration rate for `episode` (0-based) of a run of `total` episodes
    pub fn epsilon_at(&self, episode: usize, total: usize) -> f64 {
        let progress = if total <= 1 {
            0.0
        } else {
            (episode.min(total - 1) as f64) / ((total - 1) as f64)
        };

        let epsilon = match self.decay {
            Decay::Linear => self.start + (self.end - self.start) * progress,
            Decay::Exponential => self.start * (self.end / self.start).powf(progress),
            Decay::Multiplicative { factor } => {
                let exponent = i32::try_from(episode).unwrap_or(i32::MAX);
                self.start * factor.powi(exponent)
            }
        };

        // end may exceed start on a schedule that never went through `validate`
        epsilon.max(self.end.min(self.start)).min(self.start.max(self.end))
    }
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::linear(1.0, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let schedule = EpsilonSchedule::linear(1.0, 0.1);
        assert_eq!(schedule.epsilon_at(0, 11), 1.0);
        assert!((schedule.epsilon_at(5, 11) - 0.55).abs() < 1e-12);
        assert!((schedule.epsilon_at(10, 11) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_endpoints() {
        let schedule = EpsilonSchedule::exponential(1.0, 0.01);
        assert_eq!(schedule.epsilon_at(0, 3), 1.0);
        assert!((schedule.epsilon_at(1, 3) - 0.1).abs() < 1e-12);
        assert!((schedule.epsilon_at(2, 3) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_multiplicative_floors_at_end() {
        let schedule = EpsilonSchedule {
            start: 0.5,
            end: 0.1,
            decay: Decay::Multiplicative { factor: 0.5 },
        };
        assert_eq!(schedule.epsilon_at(1, 100), 0.25);
        assert_eq!(schedule.epsilon_at(10, 100), 0.1);
    }

    #[test]
    fn test_schedules_never_increase() {
        let schedules = [
            EpsilonSchedule::linear(1.0, 0.01),
            EpsilonSchedule::exponential(0.8, 0.05),
            EpsilonSchedule {
                start: 0.9,
                end: 0.0,
                decay: Decay::Multiplicative { factor: 0.99 },
            },
        ];
        for schedule in schedules {
            let mut previous = f64::INFINITY;
            for episode in 0..500 {
                let epsilon = schedule.epsilon_at(episode, 500);
                assert!(epsilon <= previous, "{schedule:?} rose at {episode}");
                previous = epsilon;
            }
        }
    }

    #[test]
    fn test_single_episode_run_uses_start() {
        assert_eq!(EpsilonSchedule::default().epsilon_at(0, 1), 1.0);
    }

    #[test]
    fn test_unvalidated_rising_schedule_stays_in_range() {
        let rising = EpsilonSchedule::linear(0.1, 0.5);
        assert!(rising.validate().is_err());
        assert_eq!(rising.epsilon_at(0, 11), 0.1);
        assert!((rising.epsilon_at(10, 11) - 0.5).abs() < 1e-12);

        let multiplicative = EpsilonSchedule {
            start: 0.2,
            end: 0.6,
            decay: Decay::Multiplicative { factor: 0.5 },
        };
        assert_eq!(multiplicative.epsilon_at(3, 10), 0.2);
    }

    #[test]
    fn test_validation() {
        assert!(EpsilonSchedule::default().validate().is_ok());
        assert!(EpsilonSchedule::linear(1.5, 0.0).validate().is_err());
        assert!(EpsilonSchedule::linear(0.1, 0.5).validate().is_err());
        assert!(EpsilonSchedule::exponential(1.0, 0.0).validate().is_err());
        let bad_factor = EpsilonSchedule {
            start: 1.0,
            end: 0.0,
            decay: Decay::Multiplicative { factor: 1.5 },
        };
        assert!(bad_factor.validate().is_err());
    }

    #[test]
    fn test_parse_decay() {
        assert_eq!("linear".parse::<Decay>().unwrap(), Decay::Linear);
        assert_eq!("Exponential".parse::<Decay>().unwrap(), Decay::Exponential);
        assert_eq!(
            "multiplicative:0.995".parse::<Decay>().unwrap(),
            Decay::Multiplicative { factor: 0.995 }
        );
        assert!("cosine".parse::<Decay>().is_err());
    }
}
