//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! vitrine migrate
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded at
//! compile time.

use vitrine_storefront::db;

use super::{CliError, load_config, require_database_url};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CliError` if no database is configured, the connection fails, or
/// a migration fails.
pub async fn run() -> Result<(), CliError> {
    let config = load_config()?;
    let database_url = require_database_url(&config)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
