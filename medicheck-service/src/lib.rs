//! MediCheck Service Library
//!
//! HTTP handlers, router and shared state for the hospital search service.
//! This library is used by both the medicheck-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use medicheck::{Config, HospitalFinder};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers.
pub struct AppState {
    /// Geocoder + places pipeline.
    pub finder: HospitalFinder,
    /// Startup configuration (defaults, CORS allow-list).
    pub config: Config,
}

impl AppState {
    /// Build the state and its upstream clients from `config`.
    pub fn new(config: Config) -> medicheck::Result<Self> {
        let finder = HospitalFinder::new(&config)?;
        Ok(Self { finder, config })
    }
}

/// Build the API router with CORS and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allow_origins);

    Router::new()
        .route("/api/nearby", get(handlers::get_nearby))
        .route("/api/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS layer for the configured origins, with credentials allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| {
            // A wildcard cannot be combined with credentials.
            if origin.as_str() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
            }
            origin.as_str() != "*"
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, HealthResponse, HospitalResponse, NearbyQuery, NearbyResponse, OriginResponse,
};
