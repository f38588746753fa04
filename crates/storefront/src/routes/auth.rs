//! Session and authentication route handlers.
//!
//! Login, signup and account updates answer with an [`AuthOutcome`] plus the
//! resulting session view. Login failures never reveal whether the email
//! exists.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentSession;
use crate::models::SessionView;
use crate::services::auth::{ErrorKind, LoginCredentials, SignupCredentials};
use crate::services::session::{AuthOutcome, SessionState};

/// Body of every auth response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub outcome: AuthOutcome,
    pub session: SessionView,
}

/// Turn an outcome into a response.
///
/// `rejected` is the status used for failures caused by the submitted data.
pub(crate) fn outcome_response(
    outcome: AuthOutcome,
    session: &SessionState<Session>,
    rejected: StatusCode,
) -> Response {
    let status = match (outcome.success, outcome.kind) {
        (true, _) => StatusCode::OK,
        (false, Some(ErrorKind::CollaboratorFailure)) => StatusCode::INTERNAL_SERVER_ERROR,
        (false, Some(ErrorKind::Conflict)) => StatusCode::CONFLICT,
        (false, _) => rejected,
    };

    let body = AuthResponse {
        outcome,
        session: session.view(),
    };
    (status, Json(body)).into_response()
}

/// Current session view.
#[instrument(skip_all)]
pub async fn session(CurrentSession(session): CurrentSession) -> Json<SessionView> {
    Json(session.view())
}

/// Login with email and password.
#[instrument(skip_all, fields(email = %credentials.email))]
pub async fn login(
    CurrentSession(mut session): CurrentSession,
    Json(credentials): Json<LoginCredentials>,
) -> Response {
    let outcome = session.login(&credentials).await;

    if let Some(user) = session.user() {
        set_sentry_user(&user.id, Some(user.email.as_str()));
    }

    outcome_response(outcome, &session, StatusCode::UNAUTHORIZED)
}

/// Create an account and sign in.
#[instrument(skip_all, fields(email = %credentials.email))]
pub async fn signup(
    CurrentSession(mut session): CurrentSession,
    Json(credentials): Json<SignupCredentials>,
) -> Response {
    let outcome = session.signup(&credentials).await;

    if let Some(user) = session.user() {
        set_sentry_user(&user.id, Some(user.email.as_str()));
    }

    outcome_response(outcome, &session, StatusCode::UNPROCESSABLE_ENTITY)
}

/// Sign out. Always succeeds; the cart is kept.
#[instrument(skip_all)]
pub async fn logout(CurrentSession(mut session): CurrentSession) -> Json<SessionView> {
    session.logout().await;
    clear_sentry_user();
    Json(session.view())
}
