//! Registration handlers

use std::sync::Arc;

use axum::extract::State;

use super::dto::{RegisterResponse, RegistrationsReportDto};
use crate::application::{RegistrationService, ReportingService};
use crate::domain::RegistrationSubmission;
use crate::interfaces::http::common::{domain_error_response, ok, ApiResponse, ApiResult, JsonBody};

#[derive(Clone)]
pub struct RegistrationsState {
    pub registrations: Arc<RegistrationService>,
    pub reporting: Arc<ReportingService>,
    pub expose_error_details: bool,
}

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Registrations",
    request_body = RegistrationSubmission,
    responses(
        (status = 200, description = "Registration admitted", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid input data, see per-field errors", body = ApiResponse<String>),
        (status = 404, description = "Event not found", body = ApiResponse<String>),
        (status = 409, description = "Already registered, or the event is full", body = ApiResponse<String>),
        (status = 500, description = "Storage unavailable", body = ApiResponse<String>)
    )
)]
pub async fn register(
    State(state): State<RegistrationsState>,
    JsonBody(submission): JsonBody<RegistrationSubmission>,
) -> ApiResult<RegisterResponse> {
    let registration = state
        .registrations
        .register(&submission)
        .await
        .map_err(|e| domain_error_response(e, state.expose_error_details))?;

    ok(RegisterResponse {
        message: "Registration successful".to_string(),
        registration: registration.into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "Registrations",
    responses(
        (status = 200, description = "Registrations newest first, with statistics", body = ApiResponse<RegistrationsReportDto>),
        (status = 500, description = "Storage unavailable", body = ApiResponse<String>)
    )
)]
pub async fn list_registrations(
    State(state): State<RegistrationsState>,
) -> ApiResult<RegistrationsReportDto> {
    let report = state
        .reporting
        .registrations_report()
        .await
        .map_err(|e| domain_error_response(e, state.expose_error_details))?;

    ok(report.into())
}
