//! CLI module
//!
//! Command-line interface for running harvests.
//!
//! # Commands
//!
//! - `run` - Fetch, deduplicate and store the listing
//! - `probe` - Count the listing and show the page plan
//! - `validate` - Check the input and print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
