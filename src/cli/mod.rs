//! CLI module
//!
//! Command-line interface for paging through query endpoints.
//!
//! # Commands
//!
//! - `page` - Fetch a single page
//! - `walk` - Follow next pages until exhausted
//! - `params` - Print the query string for a page
//! - `config` - Print the effective configuration
//! - `validate` - Validate a configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, QueryArgs};
pub use runner::Runner;
