//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults match a local development setup
//! where the three backend services run next to the storefront.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the client storage file (default: .storefront)
//! - `AUTH_SERVICE_URL` - Auth service base URL (default: <http://localhost:8001/>)
//! - `CATALOG_SERVICE_URL` - Catalog service base URL (default: <http://localhost:8002/>)
//! - `SHOPPING_SERVICE_URL` - Cart/order service base URL (default: <http://localhost:8003/>)
//! - `API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default auth service location.
pub const DEFAULT_AUTH_URL: &str = "http://localhost:8001/";
/// Default catalog service location.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8002/";
/// Default cart/order service location.
pub const DEFAULT_SHOPPING_URL: &str = "http://localhost:8003/";

/// Name of the client storage file inside the data directory.
const STORAGE_FILE_NAME: &str = "storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for durable client storage
    pub data_dir: PathBuf,
    /// Backend service locations
    pub services: ServiceEndpoints,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Base URLs of the backend services. Always end with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub auth: Url,
    pub catalog: Url,
    pub shopping: Url,
}

impl ServiceEndpoints {
    /// Parse and normalize the three service base URLs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` naming the offending service when
    /// a URL does not parse or is not http(s).
    pub fn parse(auth: &str, catalog: &str, shopping: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            auth: parse_base_url("AUTH_SERVICE_URL", auth)?,
            catalog: parse_base_url("CATALOG_SERVICE_URL", catalog)?,
            shopping: parse_base_url("SHOPPING_SERVICE_URL", shopping)?,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;
        let port = get("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;
        let data_dir = PathBuf::from(get("STOREFRONT_DATA_DIR", ".storefront"));

        let services = ServiceEndpoints::parse(
            &get("AUTH_SERVICE_URL", DEFAULT_AUTH_URL),
            &get("CATALOG_SERVICE_URL", DEFAULT_CATALOG_URL),
            &get("SHOPPING_SERVICE_URL", DEFAULT_SHOPPING_URL),
        )?;

        let timeout_secs = get("API_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string()))?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            data_dir,
            services,
            request_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path of the client storage file.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE_NAME)
    }
}

/// Parse a service base URL, forcing a trailing slash so that relative
/// paths join underneath it instead of replacing its last segment.
fn parse_base_url(var: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.services,
            ServiceEndpoints::parse(DEFAULT_AUTH_URL, DEFAULT_CATALOG_URL, DEFAULT_SHOPPING_URL)
                .unwrap()
        );
        assert_eq!(config.services.catalog.as_str(), "http://localhost:8002/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.storage_path(), PathBuf::from(".storefront/storage.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = config_from(&[("CATALOG_SERVICE_URL", "http://catalog.internal/api")]).unwrap();
        assert_eq!(config.services.catalog.as_str(), "http://catalog.internal/api/");
        assert_eq!(
            config.services.catalog.join("wishlist").unwrap().as_str(),
            "http://catalog.internal/api/wishlist"
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("STOREFRONT_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "STOREFRONT_PORT"
        ));
        assert!(matches!(
            config_from(&[("AUTH_SERVICE_URL", "ftp://auth")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "AUTH_SERVICE_URL"
        ));
        assert!(config_from(&[("API_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_ignored() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
