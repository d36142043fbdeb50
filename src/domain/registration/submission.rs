//! Registration form submission and its validation rules

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::model::normalize_email;
use crate::shared::errors::FieldErrors;
use crate::shared::validations::{validate_display_name, validate_org_email};

const SELECT_EVENT: &str = "Please select an event";

/// Raw registration form as submitted by a participant.
///
/// Deserialization accepts any shape for each field so that a wrong type or
/// a missing field is reported by [`validate_submission`] next to the
/// other field errors, rather than failing the whole body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    /// Event to register for; must be a positive integer
    #[serde(default)]
    #[schema(value_type = i64, example = 3)]
    pub event_id: Option<Value>,

    /// Participant name (2–100 characters after trimming)
    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,

    /// Work address on the organizational domain
    #[serde(default, deserialize_with = "string_or_empty")]
    #[validate(
        email(message = "Please enter a valid email address"),
        custom(function = "validate_org_email")
    )]
    pub email: String,
}

/// `null` and non-string values read as an empty string.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// A JSON integer in `1..=i32::MAX`.
fn parse_event_id(value: Option<&Value>) -> Option<i32> {
    value
        .and_then(Value::as_i64)
        .filter(|id| *id >= 1)
        .and_then(|id| i32::try_from(id).ok())
}

/// A submission that passed every rule, in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub event_id: i32,
    /// Trimmed
    pub name: String,
    /// Lowercased
    pub email: String,
}

/// Check a submission against every rule, reporting all violated fields.
pub fn validate_submission(
    submission: &RegistrationSubmission,
) -> Result<ValidSubmission, FieldErrors> {
    let mut errors = submission
        .validate()
        .err()
        .map(FieldErrors::from)
        .unwrap_or_default();

    let event_id = parse_event_id(submission.event_id.as_ref());
    if event_id.is_none() {
        errors.add("event_id", SELECT_EVENT);
    }

    match event_id {
        Some(event_id) if errors.is_empty() => Ok(ValidSubmission {
            event_id,
            name: submission.name.trim().to_string(),
            email: normalize_email(&submission.email),
        }),
        _ => Err(errors),
    }
}
