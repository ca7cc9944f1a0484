use std::path::PathBuf;

use thiserror::Error;

use bmcp_config::ConfigError;
use bmcp_core::{BmcpError, SolutionSummary};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read instance {path}: {source}")]
    Instance {
        path: PathBuf,
        #[source]
        source: BmcpError,
    },

    #[error("cannot load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("solution failed verification: {0}")]
    Evaluation(#[from] BmcpError),

    #[error("reported solution `{reported}` does not match its evaluation `{evaluated}`")]
    Mismatch {
        reported: SolutionSummary,
        evaluated: SolutionSummary,
    },

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
