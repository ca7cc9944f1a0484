//! BMCP Core - instance model for the Budgeted Maximum Coverage Problem
//!
//! This crate provides:
//! - [`Instance`]: the immutable item/element bipartite graph with weights,
//!   profits and the capacity bound
//! - [`format`]: the plain-text instance reader and writer
//! - [`SolutionSummary`]: selected items with their weight and profit

pub mod error;
pub mod format;
pub mod instance;
pub mod summary;

pub use error::{BmcpError, Result};
pub use format::{parse_instance, read_instance};
pub use instance::{ElementId, Instance, InstanceBuilder, ItemId};
pub use summary::SolutionSummary;
