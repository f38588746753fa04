//! Credential encoding and verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;

/// How passwords are stored in the row-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialScheme {
    /// Argon2id PHC strings.
    #[default]
    Argon2,
    /// INSECURE DEMO MODE: passwords stored and compared as plaintext.
    ///
    /// Only for reproducing the original demo data set. Never enable against
    /// real accounts.
    InsecurePlaintext,
}

impl CredentialScheme {
    /// Encode a password for storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn encode(self, password: &str) -> Result<String, AuthError> {
        match self {
            Self::Argon2 => hash_password(password),
            Self::InsecurePlaintext => Ok(password.to_owned()),
        }
    }

    /// Check a submitted password against its stored form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch.
    pub fn verify(self, password: &str, stored: &str) -> Result<(), AuthError> {
        match self {
            Self::Argon2 => verify_password(password, stored),
            Self::InsecurePlaintext if password == stored => Ok(()),
            Self::InsecurePlaintext => Err(AuthError::InvalidCredentials),
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
