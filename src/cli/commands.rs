//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fleet API command-line client
#[derive(Parser, Debug)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON); FLEET_* variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the known resources
    Resources,

    /// Fetch a single page of a resource
    Page {
        /// Resource name (see `fleet resources`)
        resource: String,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Records per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<u32>,

        /// Extra query parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Stream every record of a resource
    List {
        /// Resource name (see `fleet resources`)
        resource: String,

        /// Records per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<u32>,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Extra query parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
