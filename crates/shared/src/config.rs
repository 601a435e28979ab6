//! Application configuration management.

use std::fmt;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Cloudflare R2 storage settings.
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// R2 bucket name.
    pub bucket_name: String,
    /// Public base URL objects are served from.
    pub public_url: String,
    /// API token. Server-side only, never logged.
    pub api_token: String,
    /// Base URL of the Cloudflare REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Marker identifying placeholder images that own no stored object.
    #[serde(default = "default_placeholder_marker")]
    pub placeholder_marker: String,
    /// Maximum accepted upload body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Optional timeout for requests to the storage API.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_placeholder_marker() -> String {
    "placeholder.svg".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("account_id", &self.account_id)
            .field("bucket_name", &self.bucket_name)
            .field("public_url", &self.public_url)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("placeholder_marker", &self.placeholder_marker)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SHANTI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
