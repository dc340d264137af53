//! Configuration types for learner creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters for a Q-learning agent.
///
/// Defaults are α = 0.1, γ = 0.9, ε starting at 1.0 and decaying by 0.995
/// per episode down to 0.01, with no step cap and no fixed seed.
///
/// # Examples
///
/// ```
/// use qmaze::app::LearnerConfig;
///
/// let config = LearnerConfig::default()
///     .with_seed(42)
///     .with_learning_rate(0.2)
///     .with_max_steps(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Exploration rate at the start of every training run
    pub epsilon_start: f64,
    /// Multiplicative epsilon decay applied after each episode
    pub epsilon_decay: f64,
    /// Floor for epsilon
    pub min_epsilon: f64,
    /// Optional bound on steps per episode (unbounded when `None`)
    pub max_steps_per_episode: Option<usize>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon_start: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
            max_steps_per_episode: None,
            seed: None,
        }
    }
}

impl LearnerConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the epsilon schedule (start, per-episode decay, floor).
    pub fn with_epsilon(mut self, start: f64, decay: f64, min: f64) -> Self {
        self.epsilon_start = start;
        self.epsilon_decay = decay;
        self.min_epsilon = min;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps_per_episode = Some(max_steps);
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter is in range.
    pub fn validate(&self) -> Result<()> {
        check(
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            || format!("learning rate {} must be in (0, 1]", self.learning_rate),
        )?;
        check(
            (0.0..=1.0).contains(&self.discount_factor),
            || format!("discount factor {} must be in [0, 1]", self.discount_factor),
        )?;
        check((0.0..=1.0).contains(&self.epsilon_start), || {
            format!("initial epsilon {} must be in [0, 1]", self.epsilon_start)
        })?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            || format!("epsilon decay {} must be in (0, 1]", self.epsilon_decay),
        )?;
        check(
            self.min_epsilon >= 0.0 && self.min_epsilon <= self.epsilon_start,
            || {
                format!(
                    "minimum epsilon {} must be in [0, {}]",
                    self.min_epsilon, self.epsilon_start
                )
            },
        )?;
        check(self.max_steps_per_episode != Some(0), || {
            "max steps per episode must be positive".to_string()
        })
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration { message: message() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = LearnerConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.9);
        assert_eq!(config.epsilon_start, 1.0);
        assert_eq!(config.epsilon_decay, 0.995);
        assert_eq!(config.min_epsilon, 0.01);
        assert_eq!(config.max_steps_per_episode, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = [
            LearnerConfig::default().with_learning_rate(0.0),
            LearnerConfig::default().with_learning_rate(1.5),
            LearnerConfig::default().with_discount_factor(-0.1),
            LearnerConfig::default().with_epsilon(1.2, 0.995, 0.01),
            LearnerConfig::default().with_epsilon(1.0, 0.0, 0.01),
            LearnerConfig::default().with_epsilon(0.5, 0.995, 0.6),
            LearnerConfig::default().with_max_steps(0),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LearnerConfig =
            serde_json::from_str(r#"{"learning_rate": 0.3, "seed": 9}"#).unwrap();
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.discount_factor, 0.9);
    }
}
