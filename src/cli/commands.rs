//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Harvest a paginated listing into a key-value store
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Inline input JSON
    #[arg(long, global = true)]
    pub input_json: Option<String>,

    /// Override the page size
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// Override the number of pages fetched at once
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Override the destination (local path or cloud URL)
    /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Override the key the collection is stored under
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Fetch every page, deduplicate and store the result
    Run,

    /// Count the listing and show the page plan without fetching pages
    Probe,

    /// Validate the input and print the effective configuration
    Validate,
}
