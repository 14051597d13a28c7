//! CLI module
//!
//! Command-line interface for browsing the fleet API.
//!
//! # Commands
//!
//! - `resources` - List the known list endpoints
//! - `page` - Fetch one page with its pagination metadata
//! - `list` - Walk every page lazily, one JSON record per line

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
