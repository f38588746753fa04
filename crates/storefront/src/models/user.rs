//! User domain types.
//!
//! [`User`] is what the session knows about an account. [`UserRecord`] adds
//! the stored credential and only ever lives between the row-store and the
//! auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Email, UserId};

/// A storefront account (domain type).
///
/// This is the value mirrored into session storage, so it never carries the
/// password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID assigned by the row-store.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Login email address.
    pub email: Email,
    /// Profile picture as a URL or `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A user together with its stored credential, as returned by the row-store.
#[derive(Clone)]
pub struct UserRecord {
    /// The account.
    pub user: User,
    /// Encoded credential (an Argon2 PHC string, or plaintext in insecure demo mode).
    pub password: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Data for inserting a new account.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    /// Already-encoded credential.
    pub password: String,
}

/// A full replacement of the mutable fields of an account.
#[derive(Clone)]
pub struct UserUpdate {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub profile_pic: Option<String>,
    /// New encoded credential, or `None` to keep the current one.
    pub password: Option<String>,
}
