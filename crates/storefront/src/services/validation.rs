//! Field validation rules for storefront forms.
//!
//! Rules are checked in a fixed order (required, minimum length, maximum
//! length, pattern) and the first failure produces the message. Empty
//! optional fields skip every other rule.

use regex::Regex;
use thiserror::Error;

/// Rules for a single form field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl FieldRules {
    /// A field that must be present.
    #[must_use]
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    #[must_use]
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// A failed form: `(field label, message)` pairs in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", first_or_default(.fields))]
pub struct ValidationError {
    pub fields: Vec<(String, String)>,
}

impl ValidationError {
    /// A single-field failure with a custom message.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.to_owned(), message.into())],
        }
    }

    /// The message of the first failing field in form order.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.fields.first().map(|(_, message)| message.as_str())
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }
}

fn first_or_default(fields: &[(String, String)]) -> &str {
    fields
        .first()
        .map_or("invalid form", |(_, message)| message.as_str())
}

/// Check one value, returning the failure message if any.
///
/// Lengths are counted in characters.
#[must_use]
pub fn validate_field(value: &str, rules: &FieldRules, field: &str) -> Option<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return rules.required.then(|| format!("{field} is required"));
    }

    let len = value.chars().count();

    if let Some(min) = rules.min_length
        && len < min
    {
        return Some(format!("{field} must be at least {min} characters"));
    }

    if let Some(max) = rules.max_length
        && len > max
    {
        return Some(format!("{field} must be less than {max} characters"));
    }

    if let Some(pattern) = &rules.pattern
        && !pattern.is_match(value)
    {
        return Some(format!("{field} format is invalid"));
    }

    None
}

/// Check several fields, collecting every failure.
///
/// # Errors
///
/// Returns `ValidationError` listing each failing field.
pub fn validate_form(fields: &[(&str, &str, &FieldRules)]) -> Result<(), ValidationError> {
    let failures: Vec<(String, String)> = fields
        .iter()
        .filter_map(|(field, value, rules)| {
            validate_field(value, rules, field).map(|message| ((*field).to_owned(), message))
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields: failures })
    }
}
