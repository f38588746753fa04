//! Session state machine.
//!
//! A session is `Anonymous`, `Authenticating` while a login or signup is in
//! flight, or `Authenticated` with a user. The authenticated user is mirrored
//! into [`SessionStorage`] under [`keys::USER`] so that it survives restarts;
//! every transition into or out of `Authenticated` writes or removes that
//! entry before the state changes.

use serde::Serialize;
use tracing::instrument;

use crate::models::{SessionView, User, session_keys as keys};
use crate::services::account::AccountSettingsForm;
use crate::services::auth::{
    AuthError, AuthService, ErrorKind, LoginCredentials, SignupCredentials,
};
use crate::services::storage::{SessionStorage, StorageError};

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticating,
    Authenticated(User),
}

/// Result of a session operation, suitable for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl AuthOutcome {
    fn ok(message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(str::to_owned),
            kind: None,
        }
    }

    fn failed(err: &AuthError) -> Self {
        Self {
            success: false,
            message: Some(err.user_message()),
            kind: Some(err.kind()),
        }
    }
}

/// One client's session.
pub struct SessionState<S> {
    storage: S,
    auth: AuthService,
    status: SessionStatus,
}

impl<S: SessionStorage> SessionState<S> {
    /// Restore a session from storage.
    ///
    /// A snapshot that cannot be parsed is removed and the session starts
    /// anonymous. Storage read failures also start anonymous.
    #[instrument(skip_all)]
    pub async fn restore(storage: S, auth: AuthService) -> Self {
        let status = match storage.get(keys::USER).await {
            Ok(Some(snapshot)) => match serde_json::from_str::<User>(&snapshot) {
                Ok(user) => SessionStatus::Authenticated(user),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable user snapshot");
                    if let Err(e) = storage.remove(keys::USER).await {
                        tracing::warn!(error = %e, "failed to remove user snapshot");
                    }
                    SessionStatus::Anonymous
                }
            },
            Ok(None) => SessionStatus::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session storage");
                SessionStatus::Anonymous
            }
        };

        Self {
            storage,
            auth,
            status,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match &self.status {
            SessionStatus::Authenticated(user) => Some(user),
            SessionStatus::Anonymous | SessionStatus::Authenticating => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated(_))
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticating)
    }

    /// Snapshot of the session for display.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user().cloned(),
            is_authenticated: self.is_authenticated(),
            is_loading: self.is_loading(),
        }
    }

    /// Sign in with email and password.
    ///
    /// On failure nothing is written to storage and the session returns to
    /// the state it was in before the attempt.
    #[instrument(skip_all)]
    pub async fn login(&mut self, credentials: &LoginCredentials) -> AuthOutcome {
        let previous = std::mem::replace(&mut self.status, SessionStatus::Authenticating);
        let auth = self.auth.clone();

        match auth.login(credentials).await {
            Ok(user) => self.enter(user, previous).await,
            Err(e) => self.abandon(previous, &e),
        }
    }

    /// Create an account and sign in with it.
    #[instrument(skip_all)]
    pub async fn signup(&mut self, credentials: &SignupCredentials) -> AuthOutcome {
        let previous = std::mem::replace(&mut self.status, SessionStatus::Authenticating);
        let auth = self.auth.clone();

        match auth.signup(credentials).await {
            Ok(user) => self.enter(user, previous).await,
            Err(e) => self.abandon(previous, &e),
        }
    }

    /// Sign out. The stored snapshot is removed; a removal failure is logged
    /// and the session still becomes anonymous.
    #[instrument(skip_all)]
    pub async fn logout(&mut self) {
        if let Err(e) = self.storage.remove(keys::USER).await {
            tracing::warn!(error = %e, "failed to remove user snapshot on logout");
        }
        self.status = SessionStatus::Anonymous;
    }

    /// Replace the signed-in user and rewrite the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in, or
    /// `AuthError::Storage` if the snapshot cannot be written (the session
    /// keeps the previous user).
    pub async fn update_user(&mut self, user: User) -> Result<(), AuthError> {
        if !self.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }

        self.persist(&user).await?;
        self.status = SessionStatus::Authenticated(user);
        Ok(())
    }

    /// Validate and apply account settings for the signed-in user.
    #[instrument(skip_all)]
    pub async fn update_account(&mut self, form: AccountSettingsForm) -> AuthOutcome {
        let Some(current) = self.user().cloned() else {
            return AuthOutcome::failed(&AuthError::NotAuthenticated);
        };

        match self.apply_settings(&current, form).await {
            Ok(()) => AuthOutcome::ok(Some("Settings updated successfully!")),
            Err(e) if e.kind() == ErrorKind::CollaboratorFailure => {
                tracing::error!(error = %e, "account update failed");
                AuthOutcome {
                    success: false,
                    message: Some("Failed to update settings. Please try again.".to_owned()),
                    kind: Some(ErrorKind::CollaboratorFailure),
                }
            }
            Err(e) => AuthOutcome::failed(&e),
        }
    }

    async fn apply_settings(
        &mut self,
        current: &User,
        form: AccountSettingsForm,
    ) -> Result<(), AuthError> {
        let settings = form.validate()?;
        let user = self.auth.update_account(current, settings).await?;
        self.update_user(user).await
    }

    async fn enter(&mut self, user: User, previous: SessionStatus) -> AuthOutcome {
        match self.persist(&user).await {
            Ok(()) => {
                self.status = SessionStatus::Authenticated(user);
                AuthOutcome::ok(None)
            }
            Err(e) => self.abandon(previous, &e),
        }
    }

    fn abandon(&mut self, previous: SessionStatus, err: &AuthError) -> AuthOutcome {
        if err.kind() == ErrorKind::CollaboratorFailure {
            tracing::error!(error = %err, "session operation failed");
        } else {
            tracing::debug!(error = %err, "session operation rejected");
        }
        self.status = previous;
        AuthOutcome::failed(err)
    }

    async fn persist(&self, user: &User) -> Result<(), AuthError> {
        let snapshot = serde_json::to_string(user).map_err(StorageError::from)?;
        self.storage.set(keys::USER, snapshot).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::db::MemoryUserStore;
    use crate::services::auth::CredentialScheme;
    use crate::services::auth::tests::{login, seeded_service, signup};
    use crate::services::storage::MemoryStorage;

    /// Storage that can read but refuses every write.
    #[derive(Clone, Default)]
    struct ReadOnlyStorage(MemoryStorage);

    #[async_trait]
    impl SessionStorage for ReadOnlyStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_owned()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_owned()))
        }
    }

    async fn anonymous() -> (SessionState<MemoryStorage>, MemoryStorage, MemoryUserStore) {
        let (auth, users) = seeded_service().await;
        let storage = MemoryStorage::new();
        let session = SessionState::restore(storage.clone(), auth).await;
        (session, storage, users)
    }

    #[tokio::test]
    async fn test_restore_empty_storage_is_anonymous() {
        let (session, _, _) = anonymous().await;
        assert_eq!(session.status(), &SessionStatus::Anonymous);
        assert!(!session.view().is_loading);
    }

    #[tokio::test]
    async fn test_login_writes_snapshot_and_round_trips() {
        let (mut session, storage, _) = anonymous().await;

        let outcome = session.login(&login("jane@example.com", "password")).await;
        assert!(outcome.success);
        assert!(outcome.message.is_none());
        assert!(session.is_authenticated());

        let user = session.user().cloned().unwrap();
        let snapshot = storage.get(keys::USER).await.unwrap().unwrap();
        assert!(!snapshot.contains("password"));

        let (auth, _) = seeded_service().await;
        let restored = SessionState::restore(storage, auth).await;
        assert_eq!(restored.user(), Some(&user));
    }

    #[tokio::test]
    async fn test_wrong_password_writes_nothing() {
        let (mut session, storage, _) = anonymous().await;

        let outcome = session.login(&login("jane@example.com", "wrong-password")).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Invalid email or password"));
        assert_eq!(outcome.kind, Some(ErrorKind::Invalid));
        assert_eq!(session.status(), &SessionStatus::Anonymous);
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let (mut session, _, _) = anonymous().await;
        let outcome = session.login(&login("ghost@example.com", "password")).await;
        assert_eq!(outcome.kind, Some(ErrorKind::NotFound));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_duplicate_signup_adds_no_record() {
        let (mut session, storage, users) = anonymous().await;

        let outcome = session
            .signup(&signup("Jane Again", "jane@example.com", "secret1"))
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Email already exists"));
        assert_eq!(outcome.kind, Some(ErrorKind::Conflict));
        assert_eq!(users.len().await, 1);
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_signup_signs_in() {
        let (mut session, storage, users) = anonymous().await;

        let outcome = session
            .signup(&signup("John Doe", "john@example.com", "secret1"))
            .await;
        assert!(outcome.success);
        assert_eq!(session.user().unwrap().username, "John Doe");
        assert_eq!(users.len().await, 2);
        assert!(storage.get(keys::USER).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_removes_snapshot() {
        let (mut session, storage, _) = anonymous().await;
        session.login(&login("jane@example.com", "password")).await;

        session.logout().await;
        assert_eq!(session.status(), &SessionStatus::Anonymous);
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_discarded() {
        let (auth, _) = seeded_service().await;
        let storage = MemoryStorage::new();
        storage.set(keys::USER, "{not json".to_owned()).await.unwrap();

        let session = SessionState::restore(storage.clone(), auth).await;
        assert_eq!(session.status(), &SessionStatus::Anonymous);
        assert_eq!(storage.get(keys::USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_storage_write_failure_fails_login() {
        let (auth, _) = seeded_service().await;
        let mut session = SessionState::restore(ReadOnlyStorage::default(), auth).await;

        let outcome = session.login(&login("jane@example.com", "password")).await;
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(ErrorKind::CollaboratorFailure));
        assert_eq!(session.status(), &SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_update_user_requires_sign_in() {
        let (mut session, _, _) = anonymous().await;
        let other = {
            let (auth, _) = seeded_service().await;
            auth.login(&login("jane@example.com", "password"))
                .await
                .unwrap()
        };
        assert!(matches!(
            session.update_user(other).await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_update_account_rewrites_snapshot() {
        let (mut session, storage, _) = anonymous().await;
        session.login(&login("jane@example.com", "password")).await;

        let form = AccountSettingsForm {
            username: "Jane S.".to_owned(),
            email: "jane.s@example.com".to_owned(),
            current_password: "password".to_owned(),
            new_password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
            profile_picture: None,
        };
        let outcome = session.update_account(form).await;
        assert!(outcome.success, "{outcome:?}");
        assert_eq!(
            outcome.message.as_deref(),
            Some("Settings updated successfully!")
        );

        let snapshot = storage.get(keys::USER).await.unwrap().unwrap();
        let stored: User = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(stored.username, "Jane S.");
        assert_eq!(stored.email.as_str(), "jane.s@example.com");

        session.logout().await;
        assert!(session.login(&login("jane.s@example.com", "secret1")).await.success);
    }

    #[tokio::test]
    async fn test_update_account_wrong_current_password() {
        let (mut session, _, _) = anonymous().await;
        session.login(&login("jane@example.com", "password")).await;

        let form = AccountSettingsForm {
            username: "Jane".to_owned(),
            email: "jane@example.com".to_owned(),
            current_password: "nope".to_owned(),
            new_password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
            profile_picture: None,
        };
        let outcome = session.update_account(form).await;
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(ErrorKind::Invalid));
        assert_eq!(
            outcome.message.as_deref(),
            Some("Current password is incorrect")
        );
        assert_eq!(session.user().unwrap().username, "Jane Smith");
    }

    #[tokio::test]
    async fn test_update_account_when_anonymous() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(Arc::new(store), CredentialScheme::Argon2);
        let mut session = SessionState::restore(MemoryStorage::new(), auth).await;

        let outcome = session.update_account(AccountSettingsForm::default()).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Please sign in to continue"));
    }
}
