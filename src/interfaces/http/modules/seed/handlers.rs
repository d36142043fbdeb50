//! Seed handlers

use std::sync::Arc;

use axum::extract::State;

use super::dto::{SampleSeedResponse, SeedImportResponse};
use crate::application::EventImportService;
use crate::interfaces::http::common::{domain_error_response, ok, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct SeedState {
    pub importer: Arc<EventImportService>,
    pub expose_error_details: bool,
}

#[utoipa::path(
    post,
    path = "/api/seed",
    tag = "Seed",
    responses(
        (status = 200, description = "Events replaced from the configured events file", body = ApiResponse<SeedImportResponse>),
        (status = 500, description = "Events file unreadable or storage unavailable", body = ApiResponse<String>)
    )
)]
pub async fn import_events(State(state): State<SeedState>) -> ApiResult<SeedImportResponse> {
    let report = state
        .importer
        .import_from_file()
        .await
        .map_err(|e| domain_error_response(e, state.expose_error_details))?;

    ok(report.into())
}

#[utoipa::path(
    get,
    path = "/api/seed",
    tag = "Seed",
    responses(
        (status = 200, description = "Sample events written, or store already populated", body = ApiResponse<SampleSeedResponse>),
        (status = 500, description = "Storage unavailable", body = ApiResponse<String>)
    )
)]
pub async fn seed_sample(State(state): State<SeedState>) -> ApiResult<SampleSeedResponse> {
    let outcome = state
        .importer
        .seed_sample_if_empty()
        .await
        .map_err(|e| domain_error_response(e, state.expose_error_details))?;

    ok(outcome.into())
}
