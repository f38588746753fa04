//! CLI subcommands.

pub mod catalog;
pub mod migrate;
pub mod seed;
pub mod session;

use secrecy::SecretString;
use thiserror::Error;

use vitrine_storefront::catalog::CatalogLoadError;
use vitrine_storefront::config::{ConfigError, StorefrontConfig};
use vitrine_storefront::services::auth::AuthError;

/// Errors shared by the subcommands.
#[derive(Debug, Error)]
pub enum CliError {
    /// No database configured.
    #[error("Missing environment variable: VITRINE_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Load configuration the same way the server does.
fn load_config() -> Result<StorefrontConfig, CliError> {
    Ok(StorefrontConfig::from_env()?)
}

/// The configured database URL, which these commands require.
fn require_database_url(config: &StorefrontConfig) -> Result<SecretString, CliError> {
    config
        .database_url
        .clone()
        .ok_or(CliError::MissingDatabaseUrl)
}
