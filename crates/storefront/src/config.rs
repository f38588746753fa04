//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VITRINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). Without one, accounts live in memory and are seeded with
//!   demo users.
//! - `VITRINE_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_PORT` - Listen port (default: 3000)
//! - `VITRINE_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `VITRINE_CATALOG_PATH` - JSON product list replacing the embedded catalog
//! - `VITRINE_INSECURE_DEMO_PASSWORDS` - Store passwords as plaintext (default: false)
//! - `VITRINE_SIMULATED_LATENCY_MS` - Delay for in-memory row-store calls (default: 0)
//! - `VITRINE_AUTH_RATE_LIMIT` - Rate limit the auth routes (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::auth::CredentialScheme;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Product list file; `None` uses the embedded catalog
    pub catalog_path: Option<PathBuf>,
    /// How passwords are stored and checked
    pub credential_scheme: CredentialScheme,
    /// Delay applied to in-memory row-store calls
    pub simulated_latency: Duration,
    /// Whether auth routes are rate limited
    pub auth_rate_limit: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            catalog_path: None,
            credential_scheme: CredentialScheme::Argon2,
            simulated_latency: Duration::ZERO,
            auth_rate_limit: true,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env("VITRINE_DATABASE_URL")
            .or_else(|| env("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .map(SecretString::from);

        let host = parse_or(&env, "VITRINE_HOST", defaults.host)?;
        let port = parse_or(&env, "VITRINE_PORT", defaults.port)?;
        let base_url = env("VITRINE_BASE_URL").unwrap_or(defaults.base_url);
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_BASE_URL".to_owned(), e.to_string()))?;

        let catalog_path = env("VITRINE_CATALOG_PATH").map(PathBuf::from);

        let credential_scheme = if parse_bool(&env, "VITRINE_INSECURE_DEMO_PASSWORDS", false)? {
            CredentialScheme::InsecurePlaintext
        } else {
            CredentialScheme::Argon2
        };

        let simulated_latency =
            Duration::from_millis(parse_or(&env, "VITRINE_SIMULATED_LATENCY_MS", 0_u64)?);
        let auth_rate_limit = parse_bool(&env, "VITRINE_AUTH_RATE_LIMIT", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            catalog_path,
            credential_scheme,
            simulated_latency,
            auth_rate_limit,
            sentry_dsn: env("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
fn parse_bool(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = env(key) else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.credential_scheme, CredentialScheme::Argon2);
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert!(config.auth_rate_limit);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/vitrine")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/vitrine"
        );

        let config = load(&[
            ("VITRINE_DATABASE_URL", "postgres://primary/db"),
            ("DATABASE_URL", "postgres://fallback/db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.unwrap().expose_secret(), "postgres://primary/db");
    }

    #[test]
    fn test_insecure_demo_passwords_flag() {
        let config = load(&[("VITRINE_INSECURE_DEMO_PASSWORDS", "true")]).unwrap();
        assert_eq!(config.credential_scheme, CredentialScheme::InsecurePlaintext);

        let config = load(&[("VITRINE_INSECURE_DEMO_PASSWORDS", "0")]).unwrap();
        assert_eq!(config.credential_scheme, CredentialScheme::Argon2);
    }

    #[test]
    fn test_latency_and_port() {
        let config = load(&[
            ("VITRINE_SIMULATED_LATENCY_MS", "250"),
            ("VITRINE_PORT", "8080"),
            ("VITRINE_HOST", "0.0.0.0"),
        ])
        .unwrap();
        assert_eq!(config.simulated_latency, Duration::from_millis(250));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("VITRINE_PORT", "http"),
            ("VITRINE_HOST", "localhost:80"),
            ("VITRINE_SIMULATED_LATENCY_MS", "-5"),
            ("VITRINE_INSECURE_DEMO_PASSWORDS", "maybe"),
            ("VITRINE_BASE_URL", "not a url"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidEnvVar(k, _) if k == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_https_base_url_enables_secure_cookies() {
        let config = load(&[("VITRINE_BASE_URL", "https://shop.example.com")]).unwrap();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("VITRINE_DATABASE_URL", "postgres://user:hunter2@db/x")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
