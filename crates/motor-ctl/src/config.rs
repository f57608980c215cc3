//! Controller configuration, loaded from YAML.

use std::path::Path;

use anyhow::{Context, Result};
use motor_core::ActionBounds;
use motor_search::{NelderMeadConfig, TreeSearchConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ObjectiveSpec;

/// Semantic problems in an otherwise well-formed config file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("planning depth must be at least 1")]
    ZeroDepth,

    #[error("action bounds have no dimensions")]
    EmptyBounds,

    #[error("action bounds are malformed: min and max must have equal length and min <= max")]
    MalformedBounds,

    #[error("drift threshold must be a non-negative number, got {0}")]
    BadDriftThreshold(f64),
}

/// Top-level controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// `tree`, `simplex`; anything else selects grid search
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Planning horizon in steps
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Bounds of a single action
    #[serde(default = "default_bounds")]
    pub bounds: ActionBounds,

    /// Largest squared distance tolerated between the cached and re-predicted final state
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,

    /// Seed for the controller's random stream
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub simplex: SimplexSection,

    #[serde(default)]
    pub tree: TreeSection,

    /// Objective chain, highest priority first
    #[serde(default)]
    pub objectives: Vec<ObjectiveSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplexSection {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for SimplexSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
        }
    }
}

impl SimplexSection {
    pub fn to_config(&self) -> NelderMeadConfig {
        NelderMeadConfig {
            iterations: self.iterations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSection {
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Depth / branching-factor ratio above which nonleafs get extended
    #[serde(default = "default_tree_threshold")]
    pub threshold: f64,
}

impl Default for TreeSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            threshold: default_tree_threshold(),
        }
    }
}

impl TreeSection {
    /// Tree settings for a plan of `depth` steps.
    pub fn to_config(&self, depth: usize, simplex: NelderMeadConfig) -> TreeSearchConfig {
        TreeSearchConfig {
            iterations: self.iterations,
            threshold: self.threshold,
            max_steps: depth,
            simplex,
        }
    }
}

fn default_strategy() -> String {
    "simplex".to_string()
}
fn default_depth() -> usize {
    3
}
fn default_bounds() -> ActionBounds {
    ActionBounds::new(vec![-1.0; 3], vec![1.0; 3]).with_increment(vec![0.5; 3])
}
fn default_drift_threshold() -> f64 {
    0.01
}
fn default_seed() -> u64 {
    0x5eed
}
fn default_iterations() -> usize {
    50
}
fn default_tree_threshold() -> f64 {
    1.0
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            depth: default_depth(),
            bounds: default_bounds(),
            drift_threshold: default_drift_threshold(),
            seed: default_seed(),
            simplex: SimplexSection::default(),
            tree: TreeSection::default(),
            objectives: Vec::new(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Use `fallback` as the objective chain when none is configured.
    pub fn with_default_objectives(mut self, fallback: Vec<ObjectiveSpec>) -> Self {
        if self.objectives.is_empty() {
            self.objectives = fallback;
        }
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.bounds.stepsize() == 0 {
            return Err(ConfigError::EmptyBounds);
        }
        if !self.bounds.is_well_formed() {
            return Err(ConfigError::MalformedBounds);
        }
        if self.drift_threshold.is_nan() || self.drift_threshold < 0.0 {
            return Err(ConfigError::BadDriftThreshold(self.drift_threshold));
        }
        Ok(())
    }
}
