//! Response envelope and error mapping shared by every route

pub mod json_body;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, FieldErrors};

pub use json_body::{JsonBody, JsonBodyRejection};

/// Standard API response wrapper.
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "data": null, "error": "...", "kind": "..."}`,
/// plus per-field `errors` where a form field is at fault.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Human-readable error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error code, e.g. `event_full`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Messages per offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Underlying failure, only reported in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
            errors: None,
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            kind: None,
            errors: None,
            detail: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub type ErrorResponse = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ErrorResponse>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::EventNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::DuplicateRegistration { .. } | DomainError::EventFull { .. } => {
            StatusCode::CONFLICT
        }
        DomainError::StorageUnavailable(_) | DomainError::ImportFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Map a domain error onto a status and envelope.
///
/// Storage failures get a generic message; the underlying cause is attached
/// only when `expose_details` is set. Import failures always name the
/// problem with the events file.
pub fn domain_error_response(err: DomainError, expose_details: bool) -> ErrorResponse {
    let status = status_for(&err);
    let kind = err.kind();

    let body = match err {
        DomainError::Validation(errors) => ApiResponse::error("Invalid input data").with_errors(errors),
        DomainError::EventNotFound(_) => {
            let mut errors = FieldErrors::new();
            errors.add("event_id", "Selected event does not exist");
            ApiResponse::error("Event not found").with_errors(errors)
        }
        DomainError::DuplicateRegistration { .. } => {
            let mut errors = FieldErrors::new();
            errors.add("email", "You are already registered for this event");
            ApiResponse::error("Already registered").with_errors(errors)
        }
        DomainError::EventFull { capacity, .. } => {
            let mut errors = FieldErrors::new();
            errors.add(
                "event_id",
                format!(
                    "This event has reached maximum capacity ({} registrations)",
                    capacity
                ),
            );
            ApiResponse::error("Event is full").with_errors(errors)
        }
        DomainError::StorageUnavailable(cause) => {
            let body = ApiResponse::error("Storage is temporarily unavailable");
            if expose_details {
                body.with_detail(cause)
            } else {
                body
            }
        }
        DomainError::ImportFailed(cause) => {
            ApiResponse::error("Failed to seed events").with_detail(cause)
        }
    };

    (status, Json(body.with_kind(kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_client_statuses() {
        assert_eq!(
            status_for(&DomainError::Validation(FieldErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&DomainError::EventNotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&DomainError::EventFull { event_id: 1, capacity: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::DuplicateRegistration {
                event_id: 1,
                email: "a@schools.nyc.gov".into()
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn storage_detail_only_when_exposed() {
        let err = DomainError::StorageUnavailable("disk I/O error".into());

        let (status, Json(body)) = domain_error_response(err.clone(), false);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.kind.as_deref(), Some("storage_unavailable"));
        assert!(body.detail.is_none());

        let (_, Json(body)) = domain_error_response(err, true);
        assert_eq!(body.detail.as_deref(), Some("disk I/O error"));
    }

    #[test]
    fn import_failure_reports_its_cause() {
        let err = DomainError::ImportFailed("missing \"events\" array".into());

        let (status, Json(body)) = domain_error_response(err, false);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Failed to seed events"));
        assert_eq!(body.kind.as_deref(), Some("import_failed"));
        assert_eq!(body.detail.as_deref(), Some("missing \"events\" array"));
    }

    #[test]
    fn full_event_names_the_capacity() {
        let (_, Json(body)) =
            domain_error_response(DomainError::EventFull { event_id: 4, capacity: 2 }, false);
        let errors = body.errors.unwrap();
        assert_eq!(
            errors.get("event_id").unwrap(),
            ["This event has reached maximum capacity (2 registrations)".to_string()]
        );
    }
}
