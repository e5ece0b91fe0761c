//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Page through CREST query endpoints
#[derive(Parser, Debug)]
#[command(name = "crest-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Application configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL, overrides the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

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
    /// Fetch a single page
    Page {
        #[command(flatten)]
        query: QueryArgs,

        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u32,
    },

    /// Follow next pages until the collection is exhausted
    Walk {
        #[command(flatten)]
        query: QueryArgs,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Print the query string for a page without sending it
    Params {
        #[command(flatten)]
        query: QueryArgs,

        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u32,
    },

    /// Print the effective configuration
    Config,

    /// Validate the configuration file
    Validate,
}

/// Query options shared by the paging commands
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Resource path relative to the base URL (e.g. managed/user)
    pub resource: String,

    /// Paging mode: offset or cookie
    #[arg(long)]
    pub mode: Option<String>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort key, `-field` for descending (repeatable)
    #[arg(long = "sort", allow_hyphen_values = true)]
    pub sort: Vec<String>,

    /// Query filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Total count policy: NONE, ESTIMATE or EXACT
    #[arg(long)]
    pub policy: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one page per line)
    Json,
    /// Human-readable output
    Pretty,
}
