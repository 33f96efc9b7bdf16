//! Route definitions and server setup

use axum::http::{HeaderValue, StatusCode};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use scanyard_core::config::ServerConfig;

use crate::presentation::{
    controllers::{
        AppState,
        health::{healthz, not_found, root, version},
        scans::{create_scan, get_scan_report, get_scan_status},
    },
    middleware::logging_middleware,
    models::*,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::scans::create_scan,
        crate::presentation::controllers::scans::get_scan_status,
        crate::presentation::controllers::scans::get_scan_report,
        crate::presentation::controllers::health::healthz,
        crate::presentation::controllers::health::version
    ),
    components(
        schemas(
            CreateScanRequest,
            ScanAcceptedResponse,
            ScanStatusResponse,
            ErrorResponse,
            crate::domain::ScanStatus,
            crate::domain::ScanReport
        )
    ),
    tags(
        (name = "scans", description = "Asynchronous container image scans"),
        (name = "health", description = "Liveness and version information")
    ),
    info(
        title = "Scanyard API",
        description = "Queue container image scans and poll for vulnerability and configuration audit reports.",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .max_age(Duration::from_secs(3600));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| {
                    tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

/// Create the application router with its middleware stack
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let scan_routes = Router::new()
        .route("/scans", post(create_scan))
        .route("/scans/{scan_id}", get(get_scan_report))
        .route("/scans/{scan_id}/status", get(get_scan_status));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/version", get(version));

    let mut router = Router::new().merge(scan_routes).merge(health_routes);

    // Conditionally expose Swagger UI based on configuration
    if config.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        // HTTP tracing
        .layer(TraceLayer::new_for_http())
        // CORS handling
        .layer(cors_layer(&config.allowed_origins))
        // Request timeout, also bounds how long a submit may wait on a full queue
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds),
        ))
        // Custom logging middleware
        .layer(middleware::from_fn(logging_middleware));

    router
        .fallback(not_found)
        .layer(service_builder)
        .with_state(state)
}
