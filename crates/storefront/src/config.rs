//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ATELIER_API_BASE_URL` - Backend REST API base URL (default: `http://localhost:8080`)
//! - `ATELIER_API_TIMEOUT_MS` - Per-request timeout in milliseconds (default: 15000)
//! - `ATELIER_READ_CACHE_TTL_SECS` - Lifetime of cached GET responses (default: 10)
//! - `ATELIER_API_TOKEN` - Bearer token for authenticated calls
//! - `ATELIER_COMPLETION_DISPLAY_SECS` - How long the order completion view stays up (default: 5)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_MS: &str = "15000";
const DEFAULT_CACHE_TTL_SECS: &str = "10";
const DEFAULT_COMPLETION_DISPLAY_SECS: &str = "5";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Backend REST API base URL
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of a cached GET response
    pub cache_ttl: Duration,
    /// Bearer token, if the caller is already authenticated
    pub api_token: Option<SecretString>,
    /// How long the completion view is shown before returning to products
    pub completion_display: Duration,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("completion_display", &self.completion_display)
            .finish()
    }
}

impl StorefrontConfig {
    /// Configuration for `base_url` with every other setting at its default.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_millis(15_000),
            cache_ttl: Duration::from_secs(10),
            api_token: None,
            completion_display: Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "ATELIER_API_BASE_URL",
            &get_env_or_default("ATELIER_API_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let timeout = Duration::from_millis(get_parsed_env(
            "ATELIER_API_TIMEOUT_MS",
            DEFAULT_TIMEOUT_MS,
        )?);
        let cache_ttl = Duration::from_secs(get_parsed_env(
            "ATELIER_READ_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);
        let completion_display = Duration::from_secs(get_parsed_env(
            "ATELIER_COMPLETION_DISPLAY_SECS",
            DEFAULT_COMPLETION_DISPLAY_SECS,
        )?);
        let api_token = get_optional_env("ATELIER_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            base_url,
            timeout,
            cache_ttl,
            api_token,
            completion_display,
        })
    }

    /// Configuration pointing at a specific backend, with defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an
    /// absolute http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_base_url("base_url", base_url)?))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed as a number, with a default.
fn get_parsed_env(key: &str, default: &str) -> Result<u64, ConfigError> {
    get_env_or_default(key, default)
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a base URL, normalizing it to end with a slash so relative
/// paths join beneath it instead of replacing its last segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
