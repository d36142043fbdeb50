//! JSON body extractor with enveloped rejections
//!
//! `JsonBody<T>` works like `axum::Json<T>`, but a body that is not valid
//! JSON for `T` is rejected with a 400 in the standard [`ApiResponse`]
//! envelope (kind `validation_error`) instead of axum's plain-text reply.
//! Business validation stays with the service layer.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiResponse;
use crate::domain::FieldErrors;

/// An extractor that deserializes JSON into `T`.
///
/// ```ignore
/// async fn handler(JsonBody(body): JsonBody<RegistrationSubmission>) {
///     // `body` is well-formed but not yet validated
/// }
/// ```
pub struct JsonBody<T>(pub T);

/// Rejection for [`JsonBody`].
pub struct JsonBodyRejection(JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let mut errors = FieldErrors::new();
        errors.add("body", self.0.body_text());
        let body = ApiResponse::<()>::error("Invalid input data")
            .with_kind("validation_error")
            .with_errors(errors);
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;
        Ok(JsonBody(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
