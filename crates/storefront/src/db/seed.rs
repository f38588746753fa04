//! Demo accounts.

use vitrine_core::Email;

use super::{RepositoryError, UserStore};
use crate::models::NewUser;
use crate::services::auth::{AuthError, CredentialScheme};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password";

/// Demo accounts as `(username, email)`.
pub const DEMO_USERS: [(&str, &str); 2] = [
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
];

/// Insert the demo accounts, skipping any whose email is already taken.
///
/// Returns the number of accounts created.
///
/// # Errors
///
/// Returns `AuthError` if encoding a password or writing a row fails.
pub async fn seed_demo_users(
    store: &dyn UserStore,
    scheme: CredentialScheme,
) -> Result<usize, AuthError> {
    let mut created = 0;

    for (username, email) in DEMO_USERS {
        let user = NewUser {
            username: username.to_owned(),
            email: Email::parse(email)?,
            password: scheme.encode(DEMO_PASSWORD)?,
        };

        match store.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email, "demo user created");
                created += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::debug!(email, "demo user already exists");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(created)
}
