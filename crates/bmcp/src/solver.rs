//! Solver entry points that hide the phase wiring.

use std::io;

use tracing::debug;

use bmcp_config::{ConfigError, SolverConfig};
use bmcp_core::Instance;
use bmcp_solver::{SolveResult, Solver};

/// Configuration file looked up by [`run_solver`].
pub const CONFIG_FILE: &str = "solver.toml";

/// Solves with `solver.toml` from the working directory, or the default
/// configuration when that file does not exist.
///
/// # Errors
///
/// Returns the parse or validation error of an existing `solver.toml`.
pub fn run_solver(instance: &Instance) -> Result<SolveResult, ConfigError> {
    let config = match SolverConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!(config_file = CONFIG_FILE, "no config file, using defaults");
            SolverConfig::default()
        }
        Err(err) => return Err(err),
    };
    solve(instance, config)
}

/// Validates `config` and solves `instance` with it.
///
/// With the `console` feature, console output is initialized first.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the configuration is out of range.
pub fn solve(instance: &Instance, config: SolverConfig) -> Result<SolveResult, ConfigError> {
    config.validate()?;

    #[cfg(feature = "console")]
    bmcp_console::init();

    Ok(Solver::new(config).solve(instance))
}
