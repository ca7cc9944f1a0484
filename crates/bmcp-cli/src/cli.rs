//! Argument parsing and the solve run behind the binary.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use bmcp_config::{ConfigError, SolverConfig};
use bmcp_core::{read_instance, SolutionSummary};
use bmcp_solver::{SolveResult, Solver};

use crate::error::{CliError, Result};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "solver.toml";

#[derive(Debug, Parser)]
#[command(name = "bmcp", version, about = "Budgeted Maximum Coverage solver")]
pub struct Cli {
    /// Instance file: `m n C`, item weights, element profits, m rows of n flags
    pub instance: PathBuf,

    /// Solver config (TOML, or YAML by extension); defaults to ./solver.toml if present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Time limit in seconds, fractions allowed
    #[arg(short, long, value_name = "SECS", value_parser = parse_seconds)]
    pub time_limit: Option<Duration>,

    /// Outer iteration cap
    #[arg(short, long, value_name = "N")]
    pub iterations: Option<u64>,

    /// Random seed
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress the console log
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_seconds(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("`{s}` is not a valid duration"))
}

/// What the binary prints after a successful solve.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub star: SolutionSummary,
    pub size: usize,
    pub iterations: u64,
    pub elapsed_secs: f64,
    pub terminated_early: bool,
    #[serde(skip)]
    json: bool,
}

impl Report {
    fn new(result: SolveResult, json: bool) -> Self {
        Self {
            size: result.star.size(),
            iterations: result.statistics.total_iterations,
            elapsed_secs: result.statistics.total_duration.as_secs_f64(),
            terminated_early: result.terminated_early,
            star: result.star,
            json,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.json {
            let text = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
            return writeln!(f, "{text}");
        }
        writeln!(f, "{}", self.star)?;
        let items: Vec<String> = self.star.items.iter().map(ToString::to_string).collect();
        writeln!(f, "{}", items.join(" "))
    }
}

/// Builds the config from the file and the command-line overrides.
pub fn load_config(cli: &Cli) -> Result<SolverConfig> {
    let mut config = match &cli.config {
        Some(path) => SolverConfig::from_file(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => load_default_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    if let Some(limit) = cli.time_limit {
        config = config.with_time_limit_millis(limit.as_millis() as u64);
    }
    if let Some(iterations) = cli.iterations {
        config = config.with_iteration_count_limit(iterations);
    }
    if let Some(seed) = cli.seed {
        config = config.with_random_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn load_default_config(path: &Path) -> Result<SolverConfig> {
    match SolverConfig::from_file(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            Ok(SolverConfig::default())
        }
        Err(source) => Err(CliError::Config {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads the instance, solves it and re-evaluates the star from scratch.
pub fn run(cli: &Cli) -> Result<Report> {
    let instance = read_instance(&cli.instance).map_err(|source| CliError::Instance {
        path: cli.instance.clone(),
        source,
    })?;
    let config = load_config(cli)?;

    if !cli.quiet && !cli.json {
        bmcp_console::init();
    }

    let result = Solver::new(config).solve(&instance);

    let evaluated = instance.evaluate(&result.star.items)?;
    if evaluated != result.star || !evaluated.is_feasible(&instance) {
        return Err(CliError::Mismatch {
            reported: result.star,
            evaluated,
        });
    }

    Ok(Report::new(result, cli.json))
}
