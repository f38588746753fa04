//! Account settings form.
//!
//! The form is checked in a fixed order and the first failure wins, so the
//! user always sees one message at a time.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::Deserialize;

use vitrine_core::Email;

use crate::models::{User, UserUpdate};
use crate::services::auth::MIN_PASSWORD_LENGTH;
use crate::services::validation::{FieldRules, ValidationError, validate_field};

/// Largest accepted profile picture, in bytes.
pub const MAX_PROFILE_PICTURE_BYTES: usize = 5 * 1024 * 1024;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// An uploaded profile picture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    /// MIME type reported by the client.
    #[serde(alias = "content_type")]
    pub content_type: String,
    /// File contents, base64 encoded.
    pub data: String,
}

impl ProfilePicture {
    /// Check size and type, returning the picture as a `data:` URL.
    fn into_data_url(self) -> Result<String, ValidationError> {
        let invalid = || ValidationError::single("Profile picture", "Please select a valid image file");

        let bytes = STANDARD.decode(self.data.trim()).map_err(|_| invalid())?;

        if bytes.len() > MAX_PROFILE_PICTURE_BYTES {
            return Err(ValidationError::single(
                "Profile picture",
                "Profile picture must be less than 5MB",
            ));
        }

        if !self.content_type.starts_with("image/") {
            return Err(invalid());
        }

        Ok(format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(bytes)
        ))
    }
}

/// Account settings as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSettingsForm {
    pub username: String,
    pub email: String,
    #[serde(alias = "current_password")]
    pub current_password: String,
    #[serde(alias = "new_password")]
    pub new_password: String,
    #[serde(alias = "confirm_password")]
    pub confirm_password: String,
    #[serde(alias = "profile_picture")]
    pub profile_picture: Option<ProfilePicture>,
}

/// A requested password change. Both values are plaintext.
#[derive(Clone)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange([REDACTED])")
    }
}

/// Settings that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub username: String,
    pub email: Email,
    /// New picture as a `data:` URL, or `None` to keep the current one.
    pub profile_pic: Option<String>,
    pub password_change: Option<PasswordChange>,
}

impl ValidatedSettings {
    /// Merge these settings into `current`, producing a row-store update.
    ///
    /// `password` is the already-encoded new credential, if any.
    #[must_use]
    pub fn into_update(self, current: &User, password: Option<String>) -> UserUpdate {
        UserUpdate {
            id: current.id.clone(),
            username: self.username,
            email: self.email,
            profile_pic: self.profile_pic.or_else(|| current.profile_pic.clone()),
            password,
        }
    }
}

impl AccountSettingsForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` carrying the first failing check.
    pub fn validate(self) -> Result<ValidatedSettings, ValidationError> {
        let required = FieldRules::required();

        if let Some(message) = validate_field(&self.username, &required, "Username") {
            return Err(ValidationError::single("Username", message));
        }

        if let Some(message) = validate_field(&self.email, &required, "Email") {
            return Err(ValidationError::single("Email", message));
        }

        let email = self.email.trim();
        let email = EMAIL_RE
            .is_match(email)
            .then(|| Email::parse(email).ok())
            .flatten()
            .ok_or_else(|| {
                ValidationError::single("Email", "Please enter a valid email address")
            })?;

        let password_change = if self.new_password.is_empty() {
            None
        } else {
            if self.current_password.is_empty() {
                return Err(ValidationError::single(
                    "Current password",
                    "Current password is required to change password",
                ));
            }
            if self.new_password != self.confirm_password {
                return Err(ValidationError::single(
                    "New password",
                    "New passwords do not match",
                ));
            }
            if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(ValidationError::single(
                    "New password",
                    format!("New password must be at least {MIN_PASSWORD_LENGTH} characters"),
                ));
            }
            Some(PasswordChange {
                current: self.current_password,
                new: self.new_password,
            })
        };

        let profile_pic = self
            .profile_picture
            .map(ProfilePicture::into_data_url)
            .transpose()?;

        Ok(ValidatedSettings {
            username: self.username.trim().to_owned(),
            email,
            profile_pic,
            password_change,
        })
    }
}
