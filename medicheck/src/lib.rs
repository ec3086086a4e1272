//! # MediCheck - Nearby Hospital Search
//!
//! Turns a free-text location (city or ZIP) into a list of nearby hospitals
//! ranked by great-circle distance.
//!
//! ## Pipeline
//!
//! 1. **Geocode**: the query is resolved to a single origin coordinate via
//!    the Google Geocoding API ([`GeocodeClient`]).
//! 2. **Search**: one page (at most 20) of hospitals around the origin is
//!    fetched from the Google Places API ([`PlacesClient`]).
//! 3. **Rank**: places without coordinates are dropped, the rest are sorted
//!    by haversine distance and truncated ([`rank_places`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use medicheck::{ConfigBuilder, HospitalFinder};
//!
//! let config = ConfigBuilder::new().api_key("my-key").build()?;
//! let finder = HospitalFinder::new(&config)?;
//!
//! let results = finder.find_nearby("Boston, MA", 5, 30_000).await?;
//! println!("{} hospitals near {:?}", results.hospitals.len(), results.origin.formatted_address);
//! ```
//!
//! There is no caching, retrying or pagination; every call goes upstream.

pub mod config;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod places;
pub mod search;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use distance::{haversine_miles, Coordinate};
pub use error::{MedicheckError, Result};
pub use geocode::{GeocodeClient, Origin};
pub use places::{PlaceRecord, PlacesClient};
pub use search::{rank_places, Hospital, HospitalFinder, NearbyResults};
