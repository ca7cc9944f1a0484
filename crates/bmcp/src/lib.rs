//! BMCP - A Budgeted Maximum Coverage Solver in Rust
//!
//! Select items under a weight budget so that the total profit of the
//! covered elements is as large as possible.
//!
//! # Example
//!
//! ```rust
//! use bmcp::prelude::*;
//!
//! let mut builder = InstanceBuilder::new(5);
//! let a = builder.add_item(2);
//! let b = builder.add_item(3);
//! let c = builder.add_item(4);
//! let left = builder.add_element(5);
//! let right = builder.add_element(5);
//! builder.cover(a, left).cover(b, left).cover(b, right).cover(c, right);
//! let instance = builder.build().unwrap();
//!
//! let config = SolverConfig::new()
//!     .with_random_seed(7)
//!     .with_time_limit_secs(5)
//!     .with_iteration_count_limit(3);
//! let result = bmcp::solve(&instance, config).unwrap();
//! assert_eq!(result.profit(), 10);
//! ```

// Instance model
pub use bmcp_core::{
    format, parse_instance, read_instance, BmcpError, ElementId, Instance, InstanceBuilder,
    ItemId, SolutionSummary,
};

// Configuration
pub use bmcp_config::{
    CcSearchConfig, ConfigError, DeepOptimizeConfig, EnvironmentMode, SolverConfig,
    TerminationConfig,
};

// Solver
pub use bmcp_solver::{
    ProgressCollector, ProgressRecord, SolveResult, Solver, SolverEventListener, SolverHandle,
    SolverStatistics,
};

mod solver;
pub use solver::{run_solver, solve, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        Instance, InstanceBuilder, ProgressRecord, SolutionSummary, SolveResult, Solver,
        SolverConfig, SolverEventListener,
    };
}
