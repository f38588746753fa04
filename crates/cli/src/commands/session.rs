//! Terminal session commands.
//!
//! The session snapshot is kept in a directory (default `.vitrine/`) so that
//! `login`, `show` and `logout` can run as separate processes. Without a
//! configured database, accounts are the in-memory demo users.

use std::path::Path;
use std::sync::Arc;

use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::db::{self, MemoryUserStore, PgUserStore, UserStore};
use vitrine_storefront::services::auth::{AuthService, LoginCredentials};
use vitrine_storefront::services::session::SessionState;
use vitrine_storefront::services::storage::FileStorage;

use super::{CliError, load_config};

async fn user_store(config: &StorefrontConfig) -> Result<Arc<dyn UserStore>, CliError> {
    match &config.database_url {
        Some(url) => Ok(Arc::new(PgUserStore::new(db::create_pool(url).await?))),
        None => {
            let store = MemoryUserStore::new();
            db::seed_demo_users(&store, config.credential_scheme).await?;
            Ok(Arc::new(store))
        }
    }
}

async fn open(dir: &Path) -> Result<SessionState<FileStorage>, CliError> {
    let config = load_config()?;
    let auth = AuthService::new(user_store(&config).await?, config.credential_scheme);
    Ok(SessionState::restore(FileStorage::new(dir), auth).await)
}

/// Sign in and keep the session in `dir`.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` carrying the user-facing message when
/// the login is rejected.
pub async fn login(dir: &Path, email: String, password: String) -> Result<(), CliError> {
    let mut session = open(dir).await?;
    let outcome = session.login(&LoginCredentials { email, password }).await;

    if !outcome.success {
        return Err(CliError::InvalidArgument(
            outcome.message.unwrap_or_else(|| "Login failed".to_owned()),
        ));
    }

    if let Some(user) = session.user() {
        tracing::info!("Signed in as {} <{}>", user.username, user.email);
    }
    Ok(())
}

/// Show who is signed in.
///
/// # Errors
///
/// Returns `CliError` if the row-store cannot be reached.
pub async fn show(dir: &Path) -> Result<(), CliError> {
    let session = open(dir).await?;

    match session.user() {
        Some(user) => tracing::info!("Signed in as {} <{}> (id {})", user.username, user.email, user.id),
        None => tracing::info!("Not signed in"),
    }
    Ok(())
}

/// Sign out and remove the stored snapshot.
///
/// # Errors
///
/// Returns `CliError` if the row-store cannot be reached.
pub async fn logout(dir: &Path) -> Result<(), CliError> {
    let mut session = open(dir).await?;
    session.logout().await;
    tracing::info!("Signed out");
    Ok(())
}
