//! MediCheck Service - HTTP relay for nearby hospital search.
//!
//! Geocodes a city or ZIP and returns the closest hospitals from the Google
//! Places API, sorted by distance.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GOOGLE_PLACES_API_KEY` | API key for Geocoding and Places | falls back to `GOOGLE_MAPS_API_KEY` |
//! | `CORS_ALLOW_ORIGINS` | Comma-separated allowed origins | localhost:5500, localhost:5173 |
//! | `PLACES_RADIUS_METERS` | Default search radius | 30000 |
//! | `PLACES_MAX_RESULTS` | Default result count | 25 |
//! | `MEDICHECK_GEOCODE_URL` | Geocoding endpoint override | Google |
//! | `MEDICHECK_PLACES_URL` | Places endpoint override | Google |
//! | `MEDICHECK_PORT` | HTTP server port | 8000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /api/nearby?q=Boston&limit=25&radius_meters=30000` - Nearby hospitals
//! - `GET /api/health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use medicheck::ConfigBuilder;
use medicheck_service::{app, handlers, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the MediCheck service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MediCheck Hospital Search",
        version = "0.2.0",
        description = "Nearest hospitals to a city or ZIP code, ranked by distance.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(handlers::get_nearby, handlers::health_check),
    components(schemas(
        handlers::NearbyResponse,
        handlers::OriginResponse,
        handlers::HospitalResponse,
        handlers::ErrorResponse,
        handlers::HealthResponse,
    )),
    tags(
        (name = "hospitals", description = "Nearby hospital search"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medicheck_service=info,medicheck=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("MEDICHECK_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);

    let config = ConfigBuilder::from_env().build()?;

    if config.api_key.is_none() {
        // Not fatal: every search will answer 500 until a key is configured.
        tracing::warn!("GOOGLE_PLACES_API_KEY/GOOGLE_MAPS_API_KEY not set");
    }

    tracing::info!(
        cors_allow_origins = ?config.cors_allow_origins,
        default_radius_meters = config.default_radius_meters,
        max_results = config.max_results,
        api_key_configured = config.api_key.is_some(),
        port = port,
        "Starting MediCheck service"
    );

    let state = Arc::new(AppState::new(config)?);

    // Build router
    let app = app(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
