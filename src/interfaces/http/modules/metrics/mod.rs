//! Metrics: request counters and latency recorded by middleware, storage
//! gauges refreshed on scrape

pub mod handlers;
pub mod middleware;

pub use handlers::{prometheus_metrics, MetricsState};
pub use middleware::http_metrics_middleware;
