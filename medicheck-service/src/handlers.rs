//! HTTP request handlers for the hospital search service.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medicheck::config::{LIMIT_RANGE, RADIUS_RANGE};
use medicheck::{Config, Hospital, MedicheckError, NearbyResults, Origin};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for the nearby endpoint.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// City or ZIP code to search around.
    pub q: String,
    /// Maximum number of hospitals to return (1 to 100).
    /// Defaults to `PLACES_MAX_RESULTS` (25).
    pub limit: Option<usize>,
    /// Search radius in meters (1000 to 80000).
    /// Defaults to `PLACES_RADIUS_METERS` (30000).
    pub radius_meters: Option<u32>,
}

/// A nearby query with defaults applied and ranges checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyParams {
    pub q: String,
    pub limit: usize,
    pub radius_meters: u32,
}

impl NearbyQuery {
    /// Apply configured defaults and check the accepted ranges.
    pub fn validate(self, config: &Config) -> Result<NearbyParams, String> {
        if self.q.trim().is_empty() {
            return Err("q must not be empty".to_string());
        }

        let limit = self.limit.unwrap_or(config.max_results);
        if !LIMIT_RANGE.contains(&limit) {
            return Err(format!(
                "limit must be between {} and {}",
                LIMIT_RANGE.start(),
                LIMIT_RANGE.end()
            ));
        }

        let radius_meters = self.radius_meters.unwrap_or(config.default_radius_meters);
        if !RADIUS_RANGE.contains(&radius_meters) {
            return Err(format!(
                "radius_meters must be between {} and {}",
                RADIUS_RANGE.start(),
                RADIUS_RANGE.end()
            ));
        }

        Ok(NearbyParams {
            q: self.q,
            limit,
            radius_meters,
        })
    }
}

/// The geocoded search origin.
#[derive(Debug, Serialize, ToSchema)]
pub struct OriginResponse {
    /// Latitude of the origin.
    pub lat: f64,
    /// Longitude of the origin.
    pub lng: f64,
    /// Formatted address of the geocoding match.
    pub formatted: Option<String>,
}

/// A hospital in the result list.
#[derive(Debug, Serialize, ToSchema)]
pub struct HospitalResponse {
    /// Hospital name ("Unknown" when upstream has none).
    pub name: String,
    /// Street address.
    pub formatted: Option<String>,
    /// Latitude of the hospital.
    pub lat: f64,
    /// Longitude of the hospital.
    pub lng: f64,
    /// Distance from the origin in miles.
    pub distance: f64,
}

/// Successful nearby search response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyResponse {
    /// Where the search was centered.
    pub origin: OriginResponse,
    /// Number of entries in `results`.
    pub count: usize,
    /// Hospitals sorted by ascending distance.
    pub results: Vec<HospitalResponse>,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always true while the process is serving.
    pub ok: bool,
}

impl From<Origin> for OriginResponse {
    fn from(origin: Origin) -> Self {
        Self {
            lat: origin.latitude,
            lng: origin.longitude,
            formatted: origin.formatted_address,
        }
    }
}

impl From<Hospital> for HospitalResponse {
    fn from(hospital: Hospital) -> Self {
        Self {
            name: hospital.name,
            formatted: hospital.formatted_address,
            lat: hospital.latitude,
            lng: hospital.longitude,
            distance: hospital.distance_miles,
        }
    }
}

impl From<NearbyResults> for NearbyResponse {
    fn from(results: NearbyResults) -> Self {
        let hospitals: Vec<HospitalResponse> = results
            .hospitals
            .into_iter()
            .map(HospitalResponse::from)
            .collect();
        Self {
            origin: results.origin.into(),
            count: hospitals.len(),
            results: hospitals,
        }
    }
}

/// Find hospitals near a city or ZIP code.
///
/// # Query Parameters
///
/// - `q`: City or ZIP code (required)
/// - `limit`: Maximum results, 1 to 100 (default: 25)
/// - `radius_meters`: Search radius, 1000 to 80000 (default: 30000)
///
/// # Returns
///
/// - `200 OK` with hospitals sorted by distance
/// - `400 Bad Request` if parameters are missing or out of range
/// - `404 Not Found` if the location cannot be geocoded
/// - `500 Internal Server Error` if no API key is configured
/// - `502 Bad Gateway` if an upstream service fails
#[utoipa::path(
    get,
    path = "/api/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Hospitals sorted by distance", body = NearbyResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 500, description = "Server misconfigured", body = ErrorResponse),
        (status = 502, description = "Upstream service error", body = ErrorResponse)
    ),
    tag = "hospitals"
)]
#[axum::debug_handler]
pub async fn get_nearby(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(query)) => match query.validate(&state.config) {
            Ok(params) => params,
            Err(message) => return bad_request(message),
        },
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    tracing::debug!(
        q = %params.q,
        limit = params.limit,
        radius_meters = params.radius_meters,
        "Nearby query"
    );

    match state
        .finder
        .find_nearby(&params.q, params.limit, params.radius_meters)
        .await
    {
        Ok(results) => (StatusCode::OK, Json(NearbyResponse::from(results))).into_response(),
        Err(e) => error_response(&params.q, e),
    }
}

fn bad_request(message: String) -> Response {
    tracing::debug!(error = %message, "Rejected nearby query");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}

/// HTTP status for a search failure.
pub fn status_for(e: &MedicheckError) -> StatusCode {
    match e {
        MedicheckError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
        MedicheckError::MissingApiKey | MedicheckError::InvalidConfig { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        MedicheckError::Places { .. }
        | MedicheckError::UpstreamStatus { .. }
        | MedicheckError::Http(_)
        | MedicheckError::Json(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Create an error response for a failed search.
fn error_response(q: &str, e: MedicheckError) -> Response {
    let status = status_for(&e);

    if status.is_server_error() {
        tracing::warn!(q = q, status = status.as_u16(), error = %e, "Nearby search failed");
    } else {
        tracing::info!(q = q, error = %e, "Nearby search found nothing");
    }

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

/// Health check endpoint.
///
/// Liveness only; does not touch upstream services.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
