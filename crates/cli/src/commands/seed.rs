//! Seed the database with the demo accounts.
//!
//! Creates `john@example.com` and `jane@example.com` (password `password`),
//! skipping any that already exist. Passwords are encoded with the scheme
//! selected by `VITRINE_INSECURE_DEMO_PASSWORDS`, so seed with the same
//! setting the server runs with.

use tracing::{info, warn};

use vitrine_storefront::db::{self, PgUserStore};
use vitrine_storefront::services::auth::CredentialScheme;

use super::{CliError, load_config, require_database_url};

/// Insert the demo users.
///
/// # Errors
///
/// Returns `CliError` if no database is configured or a write fails.
pub async fn demo_users() -> Result<(), CliError> {
    let config = load_config()?;
    let database_url = require_database_url(&config)?;

    if config.credential_scheme == CredentialScheme::InsecurePlaintext {
        warn!("Seeding plaintext passwords (VITRINE_INSECURE_DEMO_PASSWORDS is enabled)");
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgUserStore::new(pool);
    let created = db::seed_demo_users(&store, config.credential_scheme).await?;

    info!("Seeding complete!");
    info!("  Users created: {created}");
    info!("  Users skipped (already exist): {}", db::DEMO_USERS.len() - created);

    Ok(())
}
