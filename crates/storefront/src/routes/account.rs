//! Account route handlers (require auth).

use axum::{Json, http::StatusCode, response::Response};
use tracing::instrument;

use crate::middleware::RequireAuth;
use crate::routes::auth::outcome_response;
use crate::services::account::{AccountSettingsForm, MAX_PROFILE_PICTURE_BYTES};

/// Body limit for settings updates: a base64 picture at the size cap plus
/// room for the text fields.
pub const MAX_BODY_BYTES: usize = MAX_PROFILE_PICTURE_BYTES.div_ceil(3) * 4 + 64 * 1024;

/// Update account settings for the signed-in user.
#[instrument(skip_all)]
pub async fn update(
    RequireAuth(mut session): RequireAuth,
    Json(form): Json<AccountSettingsForm>,
) -> Response {
    let outcome = session.update_account(form).await;
    outcome_response(outcome, &session, StatusCode::UNPROCESSABLE_ENTITY)
}
