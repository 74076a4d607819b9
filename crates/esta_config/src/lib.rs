//! Parsing and validation of `esta.toml` analysis-run configuration files.
//!
//! This crate reads the run configuration and produces a strongly-typed
//! [`EstaConfig`]: the delay-bin policy, permutation budget, BDD
//! variable-allocation scheme, xfunc cache size, and the two opt-in
//! speed-over-strictness flags the engine accepts.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
