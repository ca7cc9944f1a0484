//! Shared test fixtures for BMCP crates.
//!
//! - [`fixtures`] - small hand-checked instances and a seeded generator
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! bmcp-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use bmcp_test::fixtures::{random_instance, three_item_instance};
//!
//! let instance = three_item_instance();
//! assert_eq!(instance.item_count(), 3);
//! let generated = random_instance(1, 20, 30, 0.1);
//! assert_eq!(generated.element_count(), 30);
//! ```

pub mod fixtures;

pub use fixtures::{
    random_instance, single_item_instance, three_item_instance, zero_capacity_instance,
};
