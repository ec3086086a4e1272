//! Nearby search client for the Google Places API (New).
//!
//! One `POST places:searchNearby` per call, restricted to hospitals inside a
//! circle. Only the first page is fetched.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::distance::Coordinate;
use crate::error::{MedicheckError, Result};

/// Maximum `maxResultCount` the places service accepts per call.
pub const PLACES_PAGE_CAP: u32 = 20;

/// Place category searched for.
pub const HOSPITAL_TYPE: &str = "hospital";

/// Fields requested from upstream.
pub const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location";

/// A raw place as returned by the places service.
///
/// Every field is optional on the wire; incomplete records are filtered
/// during ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<PlaceLocation>,
}

impl PlaceRecord {
    /// Display name text, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .and_then(|n| n.text.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Coordinate of the place, if both latitude and longitude are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let location = self.location.as_ref()?;
        Some(Coordinate::new(location.latitude?, location.longitude?))
    }
}

/// Localized display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Location of a place. Either half may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchNearbyResponse {
    #[serde(default)]
    places: Option<Vec<PlaceRecord>>,
}

/// Client for the places nearby search.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: Client,
    url: reqwest::Url,
    api_key: Option<String>,
}

impl PlacesClient {
    /// Create a client from the shared configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.places_timeout).build()?;
        Ok(Self {
            http,
            url: config.places_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Search for hospitals within `radius_meters` of `center`.
    ///
    /// `max_results` is clamped to [`PLACES_PAGE_CAP`].
    ///
    /// # Errors
    ///
    /// - [`MedicheckError::MissingApiKey`] before any request if no key is set
    /// - [`MedicheckError::Places`] with the upstream payload on status >= 400
    /// - [`MedicheckError::Http`] on transport failure or timeout
    pub async fn search_nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        max_results: u32,
    ) -> Result<Vec<PlaceRecord>> {
        let api_key = self.api_key.as_deref().ok_or(MedicheckError::MissingApiKey)?;

        let payload = search_payload(center, radius_meters, max_results);

        tracing::debug!(
            lat = center.latitude,
            lng = center.longitude,
            radius_meters = radius_meters,
            max_results = max_results,
            "Places nearby search"
        );

        let response = self
            .http
            .post(self.url.clone())
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_client_error() || status.is_server_error() {
            let detail = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => value.to_string(),
                Err(_) => body,
            };
            tracing::warn!(status = status.as_u16(), detail = %detail, "Places search failed");
            return Err(MedicheckError::Places {
                status: status.as_u16(),
                detail,
            });
        }

        parse_search_response(&body)
    }
}

/// Request body for a nearby hospital search.
fn search_payload(center: Coordinate, radius_meters: u32, max_results: u32) -> serde_json::Value {
    json!({
        "includedTypes": [HOSPITAL_TYPE],
        "maxResultCount": max_results.min(PLACES_PAGE_CAP),
        "locationRestriction": {
            "circle": {
                "center": {
                    "latitude": center.latitude,
                    "longitude": center.longitude,
                },
                "radius": radius_meters,
            }
        }
    })
}

fn parse_search_response(body: &str) -> Result<Vec<PlaceRecord>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let data: SearchNearbyResponse = serde_json::from_str(body)?;
    Ok(data.places.unwrap_or_default())
}
