//! Session extractors.
//!
//! Both extractors restore the [`SessionState`] of the requesting client from
//! its tower-sessions session.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::services::session::SessionState;
use crate::state::AppState;

/// The requesting client's session, signed in or not.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentSession(session): CurrentSession) -> Json<SessionView> {
///     Json(session.view())
/// }
/// ```
pub struct CurrentSession(pub SessionState<Session>);

/// The requesting client's session, which must be signed in.
///
/// Requests without a signed-in user are rejected with `401`.
pub struct RequireAuth(pub SessionState<Session>);

/// Error returned when a session cannot be provided.
#[derive(Debug)]
pub enum AuthRejection {
    /// The session layer is not installed.
    MissingSessionLayer,
    /// No user is signed in.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSessionLayer => {
                tracing::error!("session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Please sign in to continue" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSessionLayer)?;

        Ok(Self(
            SessionState::restore(session, state.auth().clone()).await,
        ))
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        if session.is_authenticated() {
            Ok(Self(session))
        } else {
            Err(AuthRejection::Unauthorized)
        }
    }
}
