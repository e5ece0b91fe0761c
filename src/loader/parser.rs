//! YAML parser for application configuration
//!
//! Paging values are normalized while parsing and never rejected; structural
//! problems (bad URLs, duplicate ids) are configuration errors.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load an application configuration from a YAML file
pub fn load_app_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    debug!("Loaded config file {}", path.display());
    load_app_config_from_str(&content)
}

/// Load an application configuration from a YAML string
///
/// An empty document yields the default configuration.
pub fn load_app_config_from_str(yaml: &str) -> Result<AppConfig> {
    let config: AppConfig = if yaml.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
    };

    validate_app_config(&config)?;
    Ok(config)
}

/// Validate an application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    if let Some(base_url) = &config.service_invoker.base_url {
        validate_base_url(base_url)?;
    }

    if config.site.lang.is_empty() {
        return Err(Error::invalid_value("site.lang", "cannot be empty"));
    }

    let mut route_urls = HashSet::new();
    for (name, route) in &config.router.routes {
        if route.url.is_empty() {
            return Err(Error::config(format!("Route '{name}' url cannot be empty")));
        }
        if !route_urls.insert(route.url.as_str()) {
            return Err(Error::config(format!(
                "Route '{name}' duplicates url '{}'",
                route.url
            )));
        }
    }

    let mut link_ids = HashSet::new();
    for link in &config.navigation.user_bar {
        if link.id.is_empty() {
            return Err(Error::config("User bar link id cannot be empty"));
        }
        if link.href.is_empty() {
            return Err(Error::config(format!(
                "User bar link '{}' href cannot be empty",
                link.id
            )));
        }
        if !link_ids.insert(link.id.as_str()) {
            return Err(Error::config(format!(
                "Duplicate user bar link id '{}'",
                link.id
            )));
        }
    }

    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.is_empty() {
        return Err(Error::invalid_value(
            "service_invoker.base_url",
            "cannot be empty",
        ));
    }

    let url = url::Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "service_invoker.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}
