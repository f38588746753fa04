//! In-process user store.
//!
//! Used when no database is configured and by tests. An optional latency is
//! applied before every call to mimic a remote row-store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vitrine_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, User, UserRecord, UserUpdate};

/// Row-store kept in memory. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<RwLock<Vec<UserRecord>>>,
    latency: Duration,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store has no users.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError> {
        self.simulate_latency().await;
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.user.email == *email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.simulate_latency().await;
        let mut rows = self.rows.write().await;

        if rows.iter().any(|r| r.user.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created = User {
            id: UserId::new(Uuid::new_v4().to_string()),
            username: user.username,
            email: user.email,
            profile_pic: None,
            created_at: Utc::now(),
        };
        rows.push(UserRecord {
            user: created.clone(),
            password: user.password,
        });

        Ok(created)
    }

    async fn update(&self, update: UserUpdate) -> Result<User, RepositoryError> {
        self.simulate_latency().await;
        let mut rows = self.rows.write().await;

        if rows
            .iter()
            .any(|r| r.user.email == update.email && r.user.id != update.id)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let row = rows
            .iter_mut()
            .find(|r| r.user.id == update.id)
            .ok_or(RepositoryError::NotFound)?;

        row.user.username = update.username;
        row.user.email = update.email;
        row.user.profile_pic = update.profile_pic;
        if let Some(password) = update.password {
            row.password = password;
        }

        Ok(row.user.clone())
    }
}
