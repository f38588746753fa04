//! Row-store access for storefront accounts.
//!
//! The storefront talks to its row-store only through [`UserStore`]:
//!
//! - [`users::PgUserStore`] - `PostgreSQL` via sqlx (table `users`)
//! - [`memory::MemoryUserStore`] - in-process store used for the demo and tests
//!
//! [`seed::seed_demo_users`] fills either store with the demo accounts.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p vitrine-cli -- migrate
//! ```

pub mod memory;
pub mod seed;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use vitrine_core::Email;

use crate::models::{NewUser, User, UserRecord, UserUpdate};

pub use memory::MemoryUserStore;
pub use seed::{DEMO_PASSWORD, DEMO_USERS, seed_demo_users};
pub use users::PgUserStore;

/// Errors returned by row-store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the row-store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store could not be reached.
    #[error("row-store unavailable: {0}")]
    Unavailable(String),
}

/// The external row-store holding user records.
///
/// Implementations only persist and retrieve; credential checks and
/// validation belong to [`AuthService`](crate::services::auth::AuthService).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email. Returns `None` when no row matches.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError>;

    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Replace the mutable fields of an existing user.
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::Conflict` if the new email belongs to another user.
    async fn update(&self, update: UserUpdate) -> Result<User, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
