//! Authentication service.
//!
//! Checks credentials, creates accounts and applies account updates against
//! the row-store. Session bookkeeping lives in
//! [`SessionState`](crate::services::session::SessionState).

mod error;
mod password;

pub use error::{AuthError, ErrorKind};
pub use password::CredentialScheme;

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use vitrine_core::Email;

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};
use crate::services::account::ValidatedSettings;
use crate::services::validation::{FieldRules, ValidationError, validate_form};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Login form data.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "confirm_password")]
    pub confirm_password: String,
}

/// Authentication service.
///
/// Cheap to clone; clones share the row-store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    scheme: CredentialScheme,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, scheme: CredentialScheme) -> Self {
        Self { users, scheme }
    }

    /// The credential scheme in use.
    #[must_use]
    pub const fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserNotFound` if no account has this email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let email = Email::parse(credentials.email.trim())?;

        let record = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.scheme.verify(&credentials.password, &record.password)?;

        tracing::info!(user_id = %record.user.id, "login succeeded");
        Ok(record.user)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is missing, the passwords
    /// differ, or the password is too short.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<User, AuthError> {
        let required = FieldRules::required();
        validate_form(&[
            ("Username", &credentials.username, &required),
            ("Email", &credentials.email, &required),
            ("Password", &credentials.password, &required),
        ])?;

        let email = Email::parse(credentials.email.trim())?;
        validate_new_password(
            &credentials.password,
            &credentials.confirm_password,
            "Passwords do not match",
        )?;

        let password = self.scheme.encode(&credentials.password)?;

        let user = self
            .users
            .insert(NewUser {
                username: credentials.username.trim().to_owned(),
                email,
                password,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Apply validated account settings for `current`.
    ///
    /// A password change is only applied after the current password checks
    /// out against the row-store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CurrentPasswordIncorrect` if the current password is wrong.
    /// Returns `AuthError::UserAlreadyExists` if the new email belongs to another account.
    /// Returns `AuthError::AccountNotFound` if the account no longer exists.
    #[instrument(skip(self, current, settings), fields(user_id = %current.id))]
    pub async fn update_account(
        &self,
        current: &User,
        settings: ValidatedSettings,
    ) -> Result<User, AuthError> {
        let password = match &settings.password_change {
            Some(change) => {
                let record = self
                    .users
                    .find_by_email(&current.email)
                    .await?
                    .ok_or(AuthError::AccountNotFound)?;
                self.scheme
                    .verify(&change.current, &record.password)
                    .map_err(|e| match e {
                        AuthError::InvalidCredentials => AuthError::CurrentPasswordIncorrect,
                        other => other,
                    })?;
                Some(self.scheme.encode(&change.new)?)
            }
            None => None,
        };

        let update = settings.into_update(current, password);

        let user = self.users.update(update).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            RepositoryError::NotFound => AuthError::AccountNotFound,
            other => AuthError::Repository(other),
        })?;

        tracing::info!("account updated");
        Ok(user)
    }
}

/// Validate a new password against its confirmation.
///
/// # Errors
///
/// Returns `AuthError::Validation` if the passwords differ or the password is
/// shorter than [`MIN_PASSWORD_LENGTH`].
pub fn validate_new_password(
    password: &str,
    confirm: &str,
    mismatch_message: &str,
) -> Result<(), AuthError> {
    if password != confirm {
        return Err(ValidationError::single("Password", mismatch_message).into());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::single(
            "Password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        )
        .into());
    }

    Ok(())
}
