//! Geocoder client.
//!
//! Resolves a free-text query (city, ZIP, address) to the top-ranked match
//! from the Google Geocoding API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::distance::Coordinate;
use crate::error::{MedicheckError, Result};

/// The geocoded starting point of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Latitude in decimal degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Human-readable address of the match.
    #[serde(rename = "formatted")]
    pub formatted_address: Option<String>,
}

impl Origin {
    /// The origin as a bare coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Client for the geocoding service.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    url: reqwest::Url,
    api_key: Option<String>,
}

impl GeocodeClient {
    /// Create a client from the shared configuration.
    ///
    /// The configured geocoding timeout applies to every call.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.geocode_timeout).build()?;
        Ok(Self {
            http,
            url: config.geocode_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Resolve `query` to its best match.
    ///
    /// Returns `Ok(None)` when the service answers successfully with no
    /// matches.
    ///
    /// # Errors
    ///
    /// - [`MedicheckError::MissingApiKey`] before any request if no key is set
    /// - [`MedicheckError::UpstreamStatus`] on an HTTP error status or a
    ///   failure status such as `REQUEST_DENIED`
    /// - [`MedicheckError::Http`] on transport failure or timeout
    pub async fn geocode(&self, query: &str) -> Result<Option<Origin>> {
        let api_key = self.api_key.as_deref().ok_or(MedicheckError::MissingApiKey)?;

        tracing::debug!(query = query, "Geocoding query");

        let response = self
            .http
            .get(self.url.clone())
            .query(&[("address", query), ("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Geocoding request failed");
            return Err(MedicheckError::UpstreamStatus {
                service: "geocoding",
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_geocode_response(&body)
    }
}

/// Extract the top match from a geocoding response body.
fn parse_geocode_response(body: &str) -> Result<Option<Origin>> {
    let data: GeocodeResponse = serde_json::from_str(body)?;

    match data.status.as_deref() {
        None | Some("OK") | Some("ZERO_RESULTS") => {}
        Some(other) => {
            tracing::warn!(status = other, "Geocoding service reported failure");
            return Err(MedicheckError::UpstreamStatus {
                service: "geocoding",
                status: other.to_string(),
                message: data.error_message.unwrap_or_default(),
            });
        }
    }

    Ok(data.results.into_iter().next().map(|top| Origin {
        latitude: top.geometry.location.lat,
        longitude: top.geometry.location.lng,
        formatted_address: top.formatted_address,
    }))
}
