//! Configuration management for Constellation services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__, plus a bare PORT override)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Wikipedia API configuration
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    /// Static layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Deployment environment. Development exposes error details in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    #[default]
    Development,
    Production,
}

impl RuntimeEnv {
    pub fn is_development(&self) -> bool {
        matches!(self, RuntimeEnv::Development)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Development or production
    #[serde(default)]
    pub environment: RuntimeEnv,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikipediaConfig {
    /// MediaWiki Action API endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// User-Agent sent with every upstream request (required by Wikimedia policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Result limit for the plain search endpoint
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Result limit for constellation searches
    #[serde(default = "default_constellation_limit")]
    pub constellation_limit: u32,

    /// Number of open-search suggestions to request
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u32,

    /// Topics shorter than this skip the wildcard retry
    #[serde(default = "default_min_topic_len")]
    pub min_topic_len: usize,

    /// Pause between consecutive detail fetches, in milliseconds
    #[serde(default = "default_detail_delay")]
    pub detail_delay_ms: u64,

    /// Optional client timeout in seconds; the client default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Canvas width used when the request does not specify one
    #[serde(default = "default_width")]
    pub width: f64,

    /// Canvas height used when the request does not specify one
    #[serde(default = "default_height")]
    pub height: f64,

    /// Distance between concentric rings
    #[serde(default = "default_ring_spacing")]
    pub ring_spacing: f64,

    /// Nodes placed on each ring
    #[serde(default = "default_nodes_per_ring")]
    pub nodes_per_ring: usize,

    /// Total jitter span per axis
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Frontend origin allowed to call the API
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Allow credentials on cross-origin requests
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error) or a full EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_api_endpoint() -> String { "https://en.wikipedia.org/w/api.php".to_string() }
fn default_user_agent() -> String {
    format!("ConstellationOfKnowledge/{} (Wikipedia graph explorer)", crate::VERSION)
}
fn default_search_limit() -> u32 { 20 }
fn default_constellation_limit() -> u32 { 10 }
fn default_suggestion_limit() -> u32 { 5 }
fn default_min_topic_len() -> usize { 3 }
fn default_detail_delay() -> u64 { 300 }
fn default_width() -> f64 { 800.0 }
fn default_height() -> f64 { 600.0 }
fn default_ring_spacing() -> f64 { 100.0 }
fn default_nodes_per_ring() -> usize { 8 }
fn default_jitter() -> f64 { 20.0 }
fn default_allowed_origin() -> String { "http://localhost:3000".to_string() }
fn default_allow_credentials() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("server.environment", env.as_str())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            // Bare PORT wins, as most hosting platforms set it
            .set_override_option("server.port", std::env::var("PORT").ok())?

            .build()?;

        config.try_deserialize()
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    pub fn is_development(&self) -> bool {
        self.server.environment.is_development()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: RuntimeEnv::default(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            user_agent: default_user_agent(),
            search_limit: default_search_limit(),
            constellation_limit: default_constellation_limit(),
            suggestion_limit: default_suggestion_limit(),
            min_topic_len: default_min_topic_len(),
            detail_delay_ms: default_detail_delay(),
            timeout_secs: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            ring_spacing: default_ring_spacing(),
            nodes_per_ring: default_nodes_per_ring(),
            jitter: default_jitter(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            wikipedia: WikipediaConfig::default(),
            layout: LayoutConfig::default(),
            cors: CorsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
