//! Prometheus scrape endpoint
//!
//! Besides the counters recorded while serving requests, each scrape
//! refreshes two gauges from storage: `events_stored` and
//! `registrations_stored`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

use crate::domain::RepositoryProvider;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// `GET /metrics` in Prometheus text format
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    let counts = tokio::try_join!(
        state.repos.events().count(),
        state.repos.registrations().count(),
    );
    match counts {
        Ok((events, registrations)) => {
            metrics::gauge!("events_stored").set(events as f64);
            metrics::gauge!("registrations_stored").set(registrations as f64);
        }
        // keep the last values; the scrape itself still succeeds
        Err(e) => warn!("Could not refresh storage gauges: {}", e),
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
