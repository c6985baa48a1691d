//! Constellation API Gateway
//!
//! HTTP surface of the service:
//! - `/api/search/{topic}`, `/api/page/{page_id}`, `/api/constellation/{topic}`
//! - `/health` and `/metrics`
//!
//! The router is built here so that integration tests can drive it without a
//! socket; `main.rs` only wires configuration, logging and the listener.

pub mod error;
pub mod handlers;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use constellation_common::{
    config::AppConfig,
    errors::AppError,
    wiki::WikiClient,
    ConstellationService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: ConstellationService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        client: Arc<dyn WikiClient>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let service = ConstellationService::new(client, &config);
        Self {
            config: Arc::new(config),
            service,
            metrics,
        }
    }

    /// Wrap `err` for the response of an endpoint described by `summary`
    pub fn fail(&self, summary: &'static str, err: AppError) -> ApiError {
        ApiError::new(summary, err, self.config.is_development())
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        .route("/search/{topic}", get(handlers::search::search))
        .route("/page/{page_id}", get(handlers::page::page_details))
        .route("/constellation/{topic}", get(handlers::constellation::constellation));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// CORS for the configured frontend origin. An unparsable origin allows none.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(config.cors.allow_credentials);

    match HeaderValue::from_str(&config.cors.allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                origin = %config.cors.allowed_origin,
                error = %e,
                "Invalid CORS origin, cross-origin requests disabled"
            );
            layer
        }
    }
}
