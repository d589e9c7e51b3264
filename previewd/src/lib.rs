//! # previewd: preview upload service
//!
//! `previewd` accepts a video preview image together with its title, theme and
//! style, stores the image in an S3-compatible bucket, and replies with the
//! public CDN address of the stored object plus a block of style suggestions.
//!
//! ## Request Flow
//!
//! Every upload runs through the same linear pipeline (see [`previews`]):
//!
//! 1. The body is validated and the image decoded from base64 or a data URI
//! 2. An object key is derived from the upload second and a hash of the first
//!    1000 bytes of the image
//! 3. The bytes are written once to the bucket as `image/jpeg`
//! 4. The CDN link and the suggestions are assembled into the reply
//!
//! No state is shared between requests apart from the configuration, the
//! storage client and the enrichment backend held in [`AppState`].
//!
//! CORS is permissive: every response carries `Access-Control-Allow-Origin: *`
//! and `OPTIONS` on any path is answered as a preflight without reaching a handler.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use previewd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = previewd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     previewd::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
pub mod api;
pub mod config;
pub mod errors;
mod metrics;
mod openapi;
pub mod previews;
pub mod storage;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    api::handlers,
    openapi::ApiDoc,
    previews::{Enricher, MockEnricher},
    storage::{ObjectStore, S3ObjectStore},
};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .store(Arc::new(store))
///     .enricher(Arc::new(MockEnricher))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ObjectStore>,
    pub enricher: Arc<dyn Enricher>,
}

/// Permissive CORS: any origin, POST and OPTIONS, `Content-Type` header.
///
/// `CorsLayer` treats every OPTIONS request as a preflight and answers it with
/// 200 and an empty body, so preflight never reaches the handlers.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router.
///
/// - `POST /generate-preview` plus a JSON 405 for every other method on that path
/// - `GET /healthz`
/// - OpenAPI JSON and the Scalar UI
/// - Prometheus metrics at `/internal/metrics` when `enable_metrics` is set
/// - Body size limit, CORS and tracing layers
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let max_body_bytes = state.config.limits.max_body_bytes;
    let enable_metrics = state.config.enable_metrics;

    let mut router = Router::new()
        .route(
            "/generate-preview",
            post(handlers::previews::create_preview).fallback(handlers::previews::method_not_allowed),
        )
        .route("/healthz", get(handlers::health::healthz))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    if enable_metrics {
        // Installs the global recorder, so the upload counters are exported too
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(create_cors_layer()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router and its configuration.
///
/// 1. **Create**: [`Application::new`] builds the S3 client and the router
/// 2. **Serve**: [`Application::serve`] binds to the configured address
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish and telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application backed by S3 storage and the mock enricher
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting previewd with configuration: {:#?}", config);

        let store = S3ObjectStore::from_config(&config.storage).await?;
        Self::with_components(config, Arc::new(store), Arc::new(MockEnricher))
    }

    /// Create an application with explicit storage and enrichment backends
    pub fn with_components(config: Config, store: Arc<dyn ObjectStore>, enricher: Arc<dyn Enricher>) -> anyhow::Result<Self> {
        let state = AppState::builder().config(config.clone()).store(store).enricher(enricher).build();
        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("previewd listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::metrics::{UPLOAD_BYTES_TOTAL, UPLOADS_TOTAL};
    use crate::previews::MockEnricher;
    use crate::storage::InMemoryObjectStore;
    use crate::test_utils::{create_test_app, create_test_app_with, create_test_config, sample_image_base64};
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[test_log::test(tokio::test)]
    async fn test_healthz() {
        let (app, _store) = create_test_app();

        let response = app.get("/healthz").await;

        response.assert_status_ok();
        response.assert_text("OK");
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[test_log::test(tokio::test)]
    async fn test_openapi_json_endpoint() {
        let (app, _store) = create_test_app();

        let response = app.get("/api-docs/openapi.json").await;

        response.assert_status_ok();
        let doc: Value = response.json();
        assert!(doc["paths"]["/generate-preview"]["post"].is_object());
    }

    #[test_log::test(tokio::test)]
    async fn test_preflight_on_any_path() {
        let (app, _store) = create_test_app();

        let response = app.method(Method::OPTIONS, "/healthz").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_route_is_not_found() {
        let (app, _store) = create_test_app();

        let response = app.post("/somewhere-else").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_route_absent_when_disabled() {
        let config = create_test_config();
        assert!(!config.enable_metrics);
        let (app, _store) = create_test_app();

        let response = app.get("/internal/metrics").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    // The prometheus recorder is process global, so this is the only test that enables metrics
    #[test_log::test(tokio::test)]
    async fn test_metrics_route_exports_upload_counters() {
        let mut config = create_test_config();
        config.enable_metrics = true;
        let app = create_test_app_with(config, Arc::new(InMemoryObjectStore::new()), Arc::new(MockEnricher));

        app.post("/generate-preview")
            .json(&json!({ "image": sample_image_base64(), "title": "My Video" }))
            .await
            .assert_status_ok();

        let response = app.get("/internal/metrics").await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains(UPLOADS_TOTAL));
        assert!(text.contains(r#"outcome="stored""#));
        assert!(text.contains(UPLOAD_BYTES_TOTAL));
    }
}
