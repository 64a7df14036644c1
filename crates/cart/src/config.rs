//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Base URL of the product/stock service
//!
//! ## Optional
//! - `CATALOG_API_TOKEN` - Bearer token for the catalog service
//! - `CATALOG_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_STORE_PATH` - Path of the snapshot file (default: rocketshoes-cart.json)
//! - `CART_STORAGE_KEY` - Key the snapshot is stored under (default: @RocketShoes:cart)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the cart snapshot is stored under when none is configured.
///
/// Kept for compatibility with snapshots written by earlier clients.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_PATH: &str = "rocketshoes-cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart manager configuration.
///
/// Implements `Debug` manually to redact the catalog token.
#[derive(Clone)]
pub struct CartConfig {
    /// Base URL of the product/stock service
    pub catalog_base_url: Url,
    /// Bearer token for the catalog service, if it requires one
    pub catalog_api_token: Option<SecretString>,
    /// Timeout applied to every catalog request
    pub catalog_timeout: Duration,
    /// Path of the file the cart snapshot is persisted to
    pub store_path: PathBuf,
    /// Key the serialized cart is stored under
    pub storage_key: String,
}

impl std::fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartConfig")
            .field("catalog_base_url", &self.catalog_base_url.as_str())
            .field(
                "catalog_api_token",
                &self.catalog_api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_timeout", &self.catalog_timeout)
            .field("store_path", &self.store_path)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_base_url = parse_base_url(&get_required_env("CATALOG_BASE_URL")?)?;
        let catalog_api_token = get_optional_env("CATALOG_API_TOKEN").map(SecretString::from);
        let timeout_secs = get_env_or_default("CATALOG_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let store_path = PathBuf::from(get_env_or_default("CART_STORE_PATH", DEFAULT_STORE_PATH));
        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);

        Ok(Self {
            catalog_base_url,
            catalog_api_token,
            catalog_timeout: Duration::from_secs(timeout_secs),
            store_path,
            storage_key,
        })
    }

    /// Build a configuration for a catalog at `base_url` with defaults for
    /// everything else. Intended for wiring in tests and tools.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_base_url: parse_base_url(base_url)?,
            catalog_api_token: None,
            catalog_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_BASE_URL".to_string(),
            "URL cannot be a base".to_string(),
        ));
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
