//! `PostgreSQL` user store.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vitrine_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, User, UserRecord, UserUpdate};

/// Row shape of the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    password: String,
    profile_pic: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> Result<UserRecord, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(UserRecord {
            user: User {
                id: self.id,
                username: self.username,
                email,
                profile_pic: self.profile_pic,
                created_at: self.created_at,
            },
            password: self.password,
        })
    }
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Row-store backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password, profile_pic, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_record).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (id, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password, profile_pic, created_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into_record()?.user)
    }

    async fn update(&self, update: UserUpdate) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET username = $2,
                email = $3,
                profile_pic = $4,
                password = COALESCE($5, password)
            WHERE id = $1
            RETURNING id, username, email, password, profile_pic, created_at
            ",
        )
        .bind(&update.id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(update.profile_pic.as_deref())
        .bind(update.password.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into_record()?.user)
    }
}
