//! Authentication error types.

use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::storage::StorageError;
use crate::services::validation::ValidationError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vitrine_core::EmailError),

    /// Wrong password for an existing account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for the given email.
    #[error("user not found")]
    UserNotFound,

    /// The signed-in account is gone from the row-store.
    #[error("account no longer exists")]
    AccountNotFound,

    /// Wrong current password on a settings change.
    #[error("current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Form input failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// Repository/database error.
    #[error("row-store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Coarse classification of auth failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The email or user is absent.
    NotFound,
    /// The email is already in use.
    Conflict,
    /// Wrong password, bad input, or missing session.
    Invalid,
    /// The row-store or storage failed.
    CollaboratorFailure,
}

impl AuthError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound | Self::AccountNotFound => ErrorKind::NotFound,
            Self::UserAlreadyExists => ErrorKind::Conflict,
            Self::InvalidEmail(_)
            | Self::InvalidCredentials
            | Self::CurrentPasswordIncorrect
            | Self::Validation(_)
            | Self::NotAuthenticated => ErrorKind::Invalid,
            Self::Repository(_) | Self::Storage(_) | Self::PasswordHash => {
                ErrorKind::CollaboratorFailure
            }
        }
    }

    /// Message safe to show to the user.
    ///
    /// Unknown email and wrong password read the same so that login does not
    /// reveal which accounts exist.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials | Self::UserNotFound => "Invalid email or password".to_owned(),
            Self::AccountNotFound => {
                "Your account could not be found. Please sign in again.".to_owned()
            }
            Self::CurrentPasswordIncorrect => "Current password is incorrect".to_owned(),
            Self::UserAlreadyExists => "Email already exists".to_owned(),
            Self::InvalidEmail(_) => "Please enter a valid email address".to_owned(),
            Self::Validation(err) => err
                .first_message()
                .unwrap_or("Please check the form and try again")
                .to_owned(),
            Self::NotAuthenticated => "Please sign in to continue".to_owned(),
            Self::Repository(_) | Self::Storage(_) | Self::PasswordHash => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}
