//! Event listing handler

use std::sync::Arc;

use axum::extract::State;

use super::dto::EventDto;
use crate::application::ReportingService;
use crate::interfaces::http::common::{domain_error_response, ok, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct EventsState {
    pub reporting: Arc<ReportingService>,
    pub expose_error_details: bool,
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "All events ordered by id, with registration counts", body = ApiResponse<Vec<EventDto>>),
        (status = 500, description = "Storage unavailable", body = ApiResponse<String>)
    )
)]
pub async fn list_events(State(state): State<EventsState>) -> ApiResult<Vec<EventDto>> {
    let events = state
        .reporting
        .list_events_with_counts()
        .await
        .map_err(|e| domain_error_response(e, state.expose_error_details))?;

    ok(events.into_iter().map(EventDto::from).collect())
}
