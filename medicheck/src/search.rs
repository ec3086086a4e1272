//! Nearby hospital search.
//!
//! [`HospitalFinder`] runs the two-step pipeline: geocode the query, then
//! search for hospitals around the resulting origin. The ranking step is the
//! pure function [`rank_places`].
//!
//! ```ignore
//! use medicheck::{ConfigBuilder, HospitalFinder};
//!
//! let config = ConfigBuilder::from_env().build()?;
//! let finder = HospitalFinder::new(&config)?;
//!
//! let results = finder.find_nearby("Boston, MA", 5, 30_000).await?;
//! for hospital in &results.hospitals {
//!     println!("{:.1} mi  {}", hospital.distance_miles, hospital.name);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::distance::haversine_miles;
use crate::error::{MedicheckError, Result};
use crate::geocode::{GeocodeClient, Origin};
use crate::places::{PlaceRecord, PlacesClient, PLACES_PAGE_CAP};

/// Label used for places that come back without a display name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A ranked hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    /// Display name, or [`UNKNOWN_NAME`].
    pub name: String,
    /// Street address, if upstream supplied one.
    #[serde(rename = "formatted")]
    pub formatted_address: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Great-circle distance from the origin in miles.
    #[serde(rename = "distance")]
    pub distance_miles: f64,
}

/// Outcome of a nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyResults {
    /// The geocoded origin.
    pub origin: Origin,
    /// Hospitals sorted by ascending distance.
    pub hospitals: Vec<Hospital>,
}

/// Turn raw places into hospitals ranked by distance from `origin`.
///
/// Places without a coordinate are dropped and do not count against
/// `limit`. Nameless places are kept under [`UNKNOWN_NAME`]. The sort is
/// stable, so equal distances keep upstream order.
pub fn rank_places(origin: &Origin, places: Vec<PlaceRecord>, limit: usize) -> Vec<Hospital> {
    let from = origin.coordinate();

    let mut hospitals: Vec<Hospital> = places
        .into_iter()
        .filter_map(|place| {
            let Some(at) = place.coordinate() else {
                tracing::debug!(id = ?place.id, "Dropping place without coordinates");
                return None;
            };
            Some(Hospital {
                name: place.name().unwrap_or(UNKNOWN_NAME).to_string(),
                formatted_address: place.formatted_address,
                latitude: at.latitude,
                longitude: at.longitude,
                distance_miles: haversine_miles(from, at),
            })
        })
        .collect();

    hospitals.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    hospitals.truncate(limit);
    hospitals
}

/// Geocodes a query and ranks the hospitals around it.
#[derive(Debug, Clone)]
pub struct HospitalFinder {
    geocoder: GeocodeClient,
    places: PlacesClient,
}

impl HospitalFinder {
    /// Create a finder whose clients share `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            geocoder: GeocodeClient::new(config)?,
            places: PlacesClient::new(config)?,
        })
    }

    /// Build a finder from existing clients.
    pub fn from_clients(geocoder: GeocodeClient, places: PlacesClient) -> Self {
        Self { geocoder, places }
    }

    /// Find up to `limit` hospitals within `radius_meters` of `query`.
    ///
    /// At most [`PLACES_PAGE_CAP`] places are requested upstream regardless
    /// of `limit`.
    ///
    /// # Errors
    ///
    /// - [`MedicheckError::LocationNotFound`] if the query has no geocoding
    ///   match; the places service is not called
    /// - any error from [`GeocodeClient::geocode`] or
    ///   [`PlacesClient::search_nearby`]
    pub async fn find_nearby(
        &self,
        query: &str,
        limit: usize,
        radius_meters: u32,
    ) -> Result<NearbyResults> {
        let origin = self.resolve_origin(query).await?;

        let page_size = u32::try_from(limit)
            .unwrap_or(u32::MAX)
            .min(PLACES_PAGE_CAP);
        let places = self
            .places
            .search_nearby(origin.coordinate(), radius_meters, page_size)
            .await?;
        let fetched = places.len();

        let hospitals = rank_places(&origin, places, limit);

        tracing::info!(
            query = query,
            fetched = fetched,
            returned = hospitals.len(),
            "Nearby search complete"
        );

        Ok(NearbyResults { origin, hospitals })
    }

    async fn resolve_origin(&self, query: &str) -> Result<Origin> {
        match self.geocoder.geocode(query).await? {
            Some(origin) => {
                tracing::debug!(
                    query = query,
                    lat = origin.latitude,
                    lng = origin.longitude,
                    formatted = ?origin.formatted_address,
                    "Resolved origin"
                );
                Ok(origin)
            }
            None => Err(MedicheckError::LocationNotFound {
                query: query.to_string(),
            }),
        }
    }
}
