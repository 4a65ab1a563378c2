//! tfdash command-line harness
//!
//! Runs the dashboard mapping engine on JSON files:
//! - `schema` prints the derived schema
//! - `build` turns configuration into an API request body
//! - `flatten` turns an API response back into configuration
//! - `validate` reports every configuration problem
//! - `widgets` lists the supported widget definitions
//!
//! The engine configuration comes from a TOML file (`--config` or
//! `TFDASH_CONFIG`) with flags applied on top.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod settings;
pub mod tracing;

pub use cli::{Cli, CliError, Commands, EXIT_CLI, EXIT_INVALID, EXIT_OK, exit_code_for};
