//! Configuration system for the BMCP solver.
//!
//! Load solver configuration from TOML or YAML files to control the time
//! budget, the random seed and the parameters of both search phases without
//! code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use bmcp_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [cc_search]
//!     iteration_limit = 500
//!     lambda = 0.6
//!
//!     [deep_optimize]
//!     tabu_length = 15
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(10));
//! assert_eq!(config.cc_search.iteration_limit, 500);
//! assert_eq!(config.deep_optimize.tabu_length, 15);
//! // unspecified fields keep their defaults
//! assert_eq!(config.cc_search.sample_size, 30);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use bmcp_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time limit used when the configuration sets none.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Termination configuration.
    #[serde(default)]
    pub termination: TerminationConfig,

    /// Configuration-checking search parameters.
    #[serde(default)]
    pub cc_search: CcSearchConfig,

    /// Tabu deep optimizer parameters.
    #[serde(default)]
    pub deep_optimize: DeepOptimizeConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a file, picking the parser from its extension.
    ///
    /// `.yaml` and `.yml` are read as YAML, everything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Sets the termination time limit in whole seconds.
    pub fn with_time_limit_secs(mut self, seconds: u64) -> Self {
        self.termination.seconds_spent_limit = Some(seconds);
        self.termination.millis_spent_limit = None;
        self
    }

    /// Sets the termination time limit in milliseconds.
    pub fn with_time_limit_millis(mut self, millis: u64) -> Self {
        self.termination.seconds_spent_limit = None;
        self.termination.millis_spent_limit = Some(millis);
        self
    }

    /// Caps the number of outer solver iterations.
    pub fn with_iteration_count_limit(mut self, limit: u64) -> Self {
        self.termination.iteration_count_limit = Some(limit);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Replaces the configuration-checking search parameters.
    pub fn with_cc_search(mut self, cc_search: CcSearchConfig) -> Self {
        self.cc_search = cc_search;
        self
    }

    /// Replaces the deep optimizer parameters.
    pub fn with_deep_optimize(mut self, deep_optimize: DeepOptimizeConfig) -> Self {
        self.deep_optimize = deep_optimize;
        self
    }

    /// Returns the termination time limit.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Duration {
        self.termination.time_limit()
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `lambda` is negative or not
    /// finite, or `sample_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lambda = self.cc_search.lambda;
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cc_search.lambda must be a finite non-negative number, got {lambda}"
            )));
        }
        if self.cc_search.sample_size == 0 {
            return Err(ConfigError::Invalid(
                "cc_search.sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeds the random stream from the OS unless a seed is given.
    #[default]
    NonReproducible,

    /// Seeds the random stream from `random_seed`, or 0.
    Reproducible,

    /// Reproducible, plus a ledger audit when solving ends.
    FastAssert,

    /// Reproducible, plus a full ledger audit after every phase.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if a missing seed should default to a fixed value.
    pub fn is_reproducible(self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }

    /// Returns true if the ledger should be audited when solving ends.
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    /// Returns true if the ledger should be audited after every phase.
    pub fn is_full_assert(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Termination configuration.
///
/// Solving always stops on the time limit; the iteration cap is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of outer solver iterations.
    pub iteration_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit, defaulting to [`DEFAULT_TIME_LIMIT_SECS`].
    pub fn time_limit(&self) -> Duration {
        match (self.seconds_spent_limit, self.millis_spent_limit) {
            (None, None) => Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            (secs, millis) => {
                Duration::from_secs(secs.unwrap_or(0))
                    + Duration::from_millis(millis.unwrap_or(0))
            }
        }
    }
}

/// Configuration-checking search parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CcSearchConfig {
    /// Iterations per phase run.
    pub iteration_limit: u64,

    /// Fraction of the baseline a conf-change counter must fall to before
    /// a recently toggled item may be toggled again.
    pub lambda: f64,

    /// Base number of iterations an item stays protected after a toggle.
    pub timestamp_gap: u64,

    /// Number of candidates sampled per improvement step.
    pub sample_size: usize,
}

impl Default for CcSearchConfig {
    fn default() -> Self {
        Self {
            iteration_limit: 1000,
            lambda: 0.5,
            timestamp_gap: 10,
            sample_size: 30,
        }
    }
}

/// Tabu deep optimizer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DeepOptimizeConfig {
    /// Iterations per phase run.
    pub iteration_limit: u64,

    /// Base tabu tenure in iterations.
    pub tabu_length: u64,

    /// Number of long-uncovered elements whose best item is pinned.
    pub block_list_size: usize,
}

impl Default for DeepOptimizeConfig {
    fn default() -> Self {
        Self {
            iteration_limit: 1000,
            tabu_length: 10,
            block_list_size: 10,
        }
    }
}

#[cfg(test)]
mod tests;
