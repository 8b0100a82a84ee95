//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// How a terminal score is distributed along the traversed path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backpropagation {
    /// Score once from the viewpoint of the leaf's last actor and apply the
    /// same value at every node on the path.
    #[default]
    Shared,

    /// Score every node from the viewpoint of its own last actor.
    /// Needed for adversarial scenarios with complementary rewards.
    PerActor,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Random seed for the search RNG.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Score distribution along the path.
    pub backpropagation: Backpropagation,

    /// Initial node arena capacity.
    pub max_nodes: usize,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            seed: 42,
            backpropagation: Backpropagation::Shared,
            max_nodes: 100_000,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom backpropagation mode.
    pub fn with_backpropagation(mut self, mode: Backpropagation) -> Self {
        self.backpropagation = mode;
        self
    }

    /// Check that the parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.exploration_constant;
        if !c.is_finite() || c < 0.0 {
            return Err(ConfigError::InvalidExploration(c));
        }
        Ok(())
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
