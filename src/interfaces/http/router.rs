//! API Router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{EventImportService, RegistrationService, ReportingService};
use crate::domain::{CapacityPolicy, FieldErrors, RegistrationSubmission, RepositoryProvider};

use super::common::ApiResponse;
use super::modules::{
    events, health,
    metrics::{self as metrics_module, http_metrics_middleware},
    registrations,
    request_id::request_id_middleware,
    seed,
};

/// Everything the routes need, built once at startup.
///
/// Axum hands each handler its own narrower state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub registrations: Arc<RegistrationService>,
    pub reporting: Arc<ReportingService>,
    pub importer: Arc<EventImportService>,
    /// Attach storage failure causes to 500 responses
    pub expose_error_details: bool,
    pub started_at: Arc<Instant>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: CapacityPolicy,
        events_file: impl Into<PathBuf>,
        expose_error_details: bool,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            registrations: Arc::new(RegistrationService::new(repos.clone(), policy.clone())),
            reporting: Arc::new(ReportingService::new(repos.clone(), policy)),
            importer: Arc::new(EventImportService::new(repos.clone(), events_file)),
            repos,
            expose_error_details,
            started_at: Arc::new(Instant::now()),
            metrics,
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for events::EventsState {
    fn from_ref(s: &AppState) -> Self {
        events::EventsState {
            reporting: Arc::clone(&s.reporting),
            expose_error_details: s.expose_error_details,
        }
    }
}

impl FromRef<AppState> for registrations::RegistrationsState {
    fn from_ref(s: &AppState) -> Self {
        registrations::RegistrationsState {
            registrations: Arc::clone(&s.registrations),
            reporting: Arc::clone(&s.reporting),
            expose_error_details: s.expose_error_details,
        }
    }
}

impl FromRef<AppState> for seed::SeedState {
    fn from_ref(s: &AppState) -> Self {
        seed::SeedState {
            importer: Arc::clone(&s.importer),
            expose_error_details: s.expose_error_details,
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for metrics_module::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics_module::MetricsState {
            handle: s.metrics.clone(),
            repos: Arc::clone(&s.repos),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        events::list_events,
        registrations::register,
        registrations::list_registrations,
        seed::import_events,
        seed::seed_sample,
    ),
    components(
        schemas(
            ApiResponse<String>,
            FieldErrors,
            RegistrationSubmission,
            health::HealthResponse,
            health::ComponentHealth,
            events::EventDto,
            events::EventSummaryDto,
            registrations::RegistrationDto,
            registrations::RegisterResponse,
            registrations::RegistrationWithEventDto,
            registrations::StatisticsDto,
            registrations::EventRegistrationsDto,
            registrations::RegistrationsReportDto,
            seed::SeedImportResponse,
            seed::ImportDetailsDto,
            seed::SampleSeedResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Events", description = "Graduation ceremonies open for registration"),
        (name = "Registrations", description = "Registering participants and the admin listing"),
        (name = "Seed", description = "Loading events into the store"),
    ),
    info(
        title = "Graduation Registration API",
        version = "1.0.0",
        description = "Registration for graduation ceremonies with per-event capacity limits",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/events", get(events::list_events))
        .route("/register", post(registrations::register))
        .route("/registrations", get(registrations::list_registrations))
        .route("/seed", get(seed::seed_sample).post(seed::import_events));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_module::prometheus_metrics))
        .nest("/api", api_routes)
        .with_state(state)
        // Middleware (outermost last)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::Service;

    use crate::domain::event::sample_event;
    use crate::domain::{DomainResult, Event, EventRepository, ImportReport, RegistrationRepository};
    use crate::infrastructure::InMemoryRepositoryProvider;

    async fn app() -> Router {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos
            .events()
            .insert_many(vec![sample_event(1), sample_event(2), sample_event(14)])
            .await
            .unwrap();
        app_with(repos, false)
    }

    fn app_with(repos: Arc<dyn RepositoryProvider>, expose: bool) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let events_file = std::env::temp_dir().join(format!("none-{}.json", uuid::Uuid::new_v4()));
        create_api_router(AppState::new(
            repos,
            CapacityPolicy::default(),
            events_file,
            expose,
            handle,
        ))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let mut svc = app.clone().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn register_req(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/register")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form(event_id: i64, email: &str) -> Value {
        json!({ "eventId": event_id, "name": "Ann Lee", "email": email })
    }

    #[tokio::test]
    async fn register_then_duplicate_then_full() {
        let app = app().await;

        let (status, body) = send(&app, register_req(form(1, "a@schools.nyc.gov"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["registration"]["eventId"], 1);
        assert_eq!(body["data"]["registration"]["email"], "a@schools.nyc.gov");

        let (status, body) = send(&app, register_req(form(1, "A@SCHOOLS.NYC.GOV"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "duplicate_registration");
        assert!(body["errors"]["email"].is_array());

        let (status, _) = send(&app, register_req(form(1, "b@schools.nyc.gov"))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, register_req(form(1, "c@schools.nyc.gov"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "event_full");
    }

    #[tokio::test]
    async fn invalid_submission_is_400_with_field_errors() {
        let app = app().await;
        let (status, body) = send(
            &app,
            register_req(json!({ "eventId": 0, "name": "A", "email": "ann@gmail.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "validation_error");
        assert_eq!(
            body["errors"]["email"],
            json!(["Email must be from @schools.nyc.gov domain"])
        );
        assert!(body["errors"]["name"].is_array());
        assert!(body["errors"]["event_id"].is_array());
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/register")
            .header("content-type", "application/json")
            .body(Body::from("{\"eventId\": 1,"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert!(body["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn missing_or_mistyped_event_id_keeps_other_field_errors() {
        let app = app().await;
        for payload in [
            json!({ "name": "A", "email": "ann@gmail.com" }),
            json!({ "eventId": "3", "name": "A", "email": "ann@gmail.com" }),
        ] {
            let (status, body) = send(&app, register_req(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["kind"], "validation_error");
            assert_eq!(body["errors"]["event_id"], json!(["Please select an event"]));
            assert_eq!(
                body["errors"]["email"],
                json!(["Email must be from @schools.nyc.gov domain"])
            );
            assert!(body["errors"]["name"].is_array());
            assert!(body["errors"]["body"].is_null());
        }
    }

    #[tokio::test]
    async fn unknown_event_is_404() {
        let app = app().await;
        let (status, body) = send(&app, register_req(form(77, "a@schools.nyc.gov"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "event_not_found");
    }

    #[tokio::test]
    async fn events_report_counts_and_booking() {
        let app = app().await;
        send(&app, register_req(form(1, "a@schools.nyc.gov"))).await;
        send(&app, register_req(form(1, "b@schools.nyc.gov"))).await;

        let (status, body) = send(&app, get_req("/api/events")).await;
        assert_eq!(status, StatusCode::OK);

        let events = body["data"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["id"], 1);
        assert_eq!(events[0]["registrationCount"], 2);
        assert_eq!(events[0]["isFullyBooked"], true);
        assert_eq!(
            events[0]["locationSingleLine"],
            "Lehman HS-3000 Tremont Ave., Bronx, NY  10465"
        );
        assert_eq!(events[1]["isFullyBooked"], false);
        assert_eq!(events[2]["capacity"], "unlimited");
    }

    #[tokio::test]
    async fn registrations_listing_has_statistics() {
        let app = app().await;
        send(&app, register_req(form(1, "a@schools.nyc.gov"))).await;
        send(&app, register_req(form(1, "b@schools.nyc.gov"))).await;

        let (status, body) = send(&app, get_req("/api/registrations")).await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["registrations"].as_array().unwrap().len(), 2);
        assert_eq!(data["registrations"][0]["event"]["id"], 1);
        assert_eq!(data["statistics"]["totalRegistrations"], 2);
        assert_eq!(data["statistics"]["totalEvents"], 3);
        assert_eq!(data["statistics"]["eventsWithRegistrations"], 1);
        assert_eq!(data["statistics"]["eventsWithoutRegistrations"], 2);
        assert_eq!(data["statistics"]["averageRegistrationsPerEvent"], "0.67");
        assert_eq!(data["registrationsByEvent"][0]["eventId"], 1);
        assert_eq!(data["registrationsByEvent"][0]["count"], 2);
    }

    #[tokio::test]
    async fn sample_seed_only_into_empty_store() {
        let app = app_with(Arc::new(InMemoryRepositoryProvider::new()), false);

        let (status, body) = send(&app, get_req("/api/seed")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["seeded"], true);
        assert_eq!(body["data"]["count"], 3);

        let (_, body) = send(&app, get_req("/api/seed")).await;
        assert_eq!(body["data"]["seeded"], false);
    }

    #[tokio::test]
    async fn import_without_file_is_500() {
        let app = app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/seed")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "import_failed");
        assert_eq!(body["error"], "Failed to seed events");
        assert!(body["detail"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let app = app().await;
        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"]["backend"], "memory");
    }

    #[tokio::test]
    async fn metrics_scrape_is_plain_text() {
        let app = app().await;
        let mut svc = app.into_service();
        let resp = svc.call(get_req("/metrics")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app().await;
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().into_service().call(req).await.unwrap();
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
    }

    // ── Failing store ──────────────────────────────────────────

    struct DownEvents;

    #[async_trait::async_trait]
    impl EventRepository for DownEvents {
        async fn find_by_id(&self, _id: i32) -> DomainResult<Option<Event>> {
            Err(down())
        }
        async fn find_all(&self) -> DomainResult<Vec<Event>> {
            Err(down())
        }
        async fn count(&self) -> DomainResult<u64> {
            Err(down())
        }
        async fn insert_many(&self, _events: Vec<Event>) -> DomainResult<u64> {
            Err(down())
        }
        async fn replace_all(&self, _events: Vec<Event>) -> DomainResult<ImportReport> {
            Err(down())
        }
    }

    fn down() -> crate::domain::DomainError {
        crate::domain::DomainError::StorageUnavailable("database is locked".to_string())
    }

    struct DownStore {
        events: DownEvents,
        registrations: InMemoryRepositoryProvider,
    }

    impl RepositoryProvider for DownStore {
        fn events(&self) -> &dyn EventRepository {
            &self.events
        }
        fn registrations(&self) -> &dyn RegistrationRepository {
            self.registrations.registrations()
        }
        fn backend(&self) -> &'static str {
            "down"
        }
    }

    fn down_app(expose: bool) -> Router {
        app_with(
            Arc::new(DownStore {
                events: DownEvents,
                registrations: InMemoryRepositoryProvider::new(),
            }),
            expose,
        )
    }

    #[tokio::test]
    async fn storage_failure_is_500_with_detail_only_in_development() {
        let (status, body) = send(&down_app(false), get_req("/api/events")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "storage_unavailable");
        assert!(body.get("detail").is_none());

        let (status, body) = send(&down_app(true), register_req(form(1, "a@schools.nyc.gov"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "database is locked");
    }

    #[tokio::test]
    async fn health_degrades_when_store_is_down() {
        let (status, body) = send(&down_app(false), get_req("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }
}
