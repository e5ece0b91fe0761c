//! Application configuration
//!
//! Typed startup configuration handed to `App::assemble`. Each block
//! configures one concern directly; there is no registry of modules keyed by
//! name. Defaults reproduce the stock single-page application setup.

use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::paging::PagingDefaults;
use crate::types::{BackoffType, LogLevel, StringMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Site-wide settings
    pub site: SiteConfig,

    /// Route table
    pub router: RouterConfig,

    /// REST client settings
    pub service_invoker: ServiceInvokerConfig,

    /// Navigation menu and user bar
    pub navigation: NavigationConfig,

    /// Message catalog for notifications
    pub messages: MessagesConfig,

    /// Paging defaults for every collection
    pub collection: PagingDefaults,

    /// Application log level
    pub logger_level: LogLevel,
}

// ============================================================================
// Site
// ============================================================================

/// Site-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub password_reset_link: String,
    pub self_registration: bool,
    pub password_reset: bool,
    /// Role id to display name
    pub roles: BTreeMap<String, String>,
    pub lang: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            password_reset_link: String::new(),
            self_registration: true,
            password_reset: true,
            roles: BTreeMap::from([("ui-user".to_string(), "User".to_string())]),
            lang: "en".to_string(),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Route table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Route name to route
    pub routes: BTreeMap<String, RouteConfig>,
    /// Additional route tables to load
    pub route_files: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes: BTreeMap::new(),
            route_files: vec![
                "config/routes/CommonRoutesConfig".to_string(),
                "config/routes/UserRoutesConfig".to_string(),
            ],
        }
    }
}

/// A single route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub url: String,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// Service Invoker
// ============================================================================

/// REST client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInvokerConfig {
    /// Base URL every resource path is resolved against
    pub base_url: Option<String>,
    /// Headers sent with every request
    pub default_headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff: BackoffType,
    /// `None` disables rate limiting
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ServiceInvokerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_headers: BTreeMap::new(),
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

impl ServiceInvokerConfig {
    /// Build the HTTP client configuration
    pub fn to_http_config(&self) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        HttpClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            backoff_type: self.backoff,
            rate_limit: self.rate_limit.clone(),
            default_headers: self
                .default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            ..defaults
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Navigation menu and user bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Menu groups by role
    pub links: BTreeMap<String, NavigationGroup>,
    pub user_bar: Vec<UserBarLink>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let examples = NavigationLink {
            url: "#examples/".to_string(),
            name: "Style Guide".to_string(),
            icon: Some("fa fa-compass".to_string()),
        };
        Self {
            links: BTreeMap::from([(
                "user".to_string(),
                NavigationGroup {
                    urls: BTreeMap::from([("examples".to_string(), examples)]),
                },
            )]),
            user_bar: vec![
                UserBarLink::new("profile_link", "#profile/details", "common.user.profile"),
                UserBarLink::new(
                    "change_password",
                    "#profile/password",
                    "common.user.changePassword",
                ),
                UserBarLink::new("logout_link", "#logout/", "common.form.logout"),
            ],
        }
    }
}

/// A group of menu links
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationGroup {
    #[serde(default)]
    pub urls: BTreeMap<String, NavigationLink>,
}

/// A menu link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationLink {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A link in the user bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBarLink {
    pub id: String,
    pub href: String,
    pub i18n_key: String,
}

impl UserBarLink {
    pub fn new(id: impl Into<String>, href: impl Into<String>, i18n_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            i18n_key: i18n_key.into(),
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Message catalog for notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Catalog key to display text
    pub messages: BTreeMap<String, String>,
    /// Additional catalogs to load
    pub message_files: Vec<String>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            messages: BTreeMap::new(),
            message_files: vec![
                "config/messages/CommonMessages".to_string(),
                "config/messages/UserMessages".to_string(),
            ],
        }
    }
}

impl MessagesConfig {
    /// Inline catalog as a lookup map
    pub fn catalog(&self) -> StringMap {
        self.messages
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
