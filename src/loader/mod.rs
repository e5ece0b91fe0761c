//! YAML Loader module
//!
//! Parse and validate application configuration files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `load_app_config` - Load an `AppConfig` from a YAML file
//! - `load_app_config_from_str` - Load an `AppConfig` from a YAML string
//! - Validation of URLs, routes and navigation links

mod parser;

pub use parser::{load_app_config, load_app_config_from_str, validate_app_config};
