//! Process-wide configuration.
//!
//! [`Config`] is built once at startup and handed to the clients that need
//! it. Nothing in the library reads the environment after that point, so
//! tests can point the clients at fake endpoints with fake credentials.
//!
//! ```ignore
//! use medicheck::ConfigBuilder;
//!
//! // Reads GOOGLE_PLACES_API_KEY, CORS_ALLOW_ORIGINS, PLACES_RADIUS_METERS, ...
//! let config = ConfigBuilder::from_env().build()?;
//!
//! // Or assemble explicitly
//! let config = ConfigBuilder::new()
//!     .api_key("test-key")
//!     .geocode_url("http://127.0.0.1:9000/geocode/json")
//!     .build()?;
//! ```

use std::time::Duration;

use reqwest::Url;

use crate::error::{MedicheckError, Result};

/// Google Geocoding API endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Places API (New) nearby search endpoint.
pub const DEFAULT_PLACES_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";

/// Origins allowed to call the API when `CORS_ALLOW_ORIGINS` is unset.
pub const DEFAULT_CORS_ALLOW_ORIGINS: &str =
    "http://127.0.0.1:5500,http://localhost:5500,http://localhost:5173";

/// Default search radius (30 km, about 18.6 miles).
pub const DEFAULT_RADIUS_METERS: u32 = 30_000;

/// Default number of hospitals returned.
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// Accepted range for the search radius.
pub const RADIUS_RANGE: std::ops::RangeInclusive<u32> = 1_000..=80_000;

/// Accepted range for the result limit.
pub const LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=100;

const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_PLACES_TIMEOUT: Duration = Duration::from_secs(20);

/// Immutable configuration shared by the geocoder and places clients.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for both upstream services. `None` defers the failure to
    /// the first request that needs it.
    pub api_key: Option<String>,
    /// Origins allowed by the CORS layer.
    pub cors_allow_origins: Vec<String>,
    /// Radius used when a request does not specify one.
    pub default_radius_meters: u32,
    /// Result count used when a request does not specify one.
    pub max_results: usize,
    /// Geocoding endpoint.
    pub geocode_url: Url,
    /// Places nearby search endpoint.
    pub places_url: Url,
    /// Bound on a single geocoding call.
    pub geocode_timeout: Duration,
    /// Bound on a single places call.
    pub places_timeout: Duration,
}

impl Config {
    /// Start building a configuration with defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    cors_allow_origins: Vec<String>,
    default_radius_meters: u32,
    max_results: usize,
    geocode_url: String,
    places_url: String,
    geocode_timeout: Duration,
    places_timeout: Duration,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a builder with the built-in defaults and no credential.
    pub fn new() -> Self {
        Self {
            api_key: None,
            cors_allow_origins: parse_origins(DEFAULT_CORS_ALLOW_ORIGINS),
            default_radius_meters: DEFAULT_RADIUS_METERS,
            max_results: DEFAULT_MAX_RESULTS,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            geocode_timeout: DEFAULT_GEOCODE_TIMEOUT,
            places_timeout: DEFAULT_PLACES_TIMEOUT,
        }
    }

    /// Create a builder from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GOOGLE_PLACES_API_KEY` | Upstream credential | falls back to `GOOGLE_MAPS_API_KEY` |
    /// | `CORS_ALLOW_ORIGINS` | Comma-separated allowed origins | localhost dev servers |
    /// | `PLACES_RADIUS_METERS` | Default search radius | 30000 |
    /// | `PLACES_MAX_RESULTS` | Default result count | 25 |
    /// | `MEDICHECK_GEOCODE_URL` | Geocoding endpoint | Google Geocoding |
    /// | `MEDICHECK_PLACES_URL` | Places endpoint | Google Places v1 |
    ///
    /// A missing credential is not an error here.
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        builder.api_key = non_empty_var("GOOGLE_PLACES_API_KEY")
            .or_else(|| non_empty_var("GOOGLE_MAPS_API_KEY"));

        if let Some(origins) = non_empty_var("CORS_ALLOW_ORIGINS") {
            builder.cors_allow_origins = parse_origins(&origins);
        }

        builder.default_radius_meters = std::env::var("PLACES_RADIUS_METERS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RADIUS_METERS);

        builder.max_results = std::env::var("PLACES_MAX_RESULTS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS);

        if let Some(url) = non_empty_var("MEDICHECK_GEOCODE_URL") {
            builder.geocode_url = url;
        }
        if let Some(url) = non_empty_var("MEDICHECK_PLACES_URL") {
            builder.places_url = url;
        }

        builder
    }

    /// Set the upstream credential. Empty strings count as unset.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    /// Clear the upstream credential.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    /// Set the CORS allow-list.
    pub fn cors_allow_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_allow_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default search radius in meters.
    pub fn default_radius_meters(mut self, radius: u32) -> Self {
        self.default_radius_meters = radius;
        self
    }

    /// Set the default result count.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Override the geocoding endpoint.
    pub fn geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    /// Override the places endpoint.
    pub fn places_url(mut self, url: impl Into<String>) -> Self {
        self.places_url = url.into();
        self
    }

    /// Override the geocoding timeout.
    pub fn geocode_timeout(mut self, timeout: Duration) -> Self {
        self.geocode_timeout = timeout;
        self
    }

    /// Override the places timeout.
    pub fn places_timeout(mut self, timeout: Duration) -> Self {
        self.places_timeout = timeout;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MedicheckError::InvalidConfig`] if an endpoint is not a valid
    /// URL or a default falls outside the range the API accepts.
    pub fn build(self) -> Result<Config> {
        let geocode_url = parse_url("geocode", &self.geocode_url)?;
        let places_url = parse_url("places", &self.places_url)?;

        if !RADIUS_RANGE.contains(&self.default_radius_meters) {
            return Err(MedicheckError::InvalidConfig {
                reason: format!(
                    "default radius {} outside {}..={} meters",
                    self.default_radius_meters,
                    RADIUS_RANGE.start(),
                    RADIUS_RANGE.end()
                ),
            });
        }
        if !LIMIT_RANGE.contains(&self.max_results) {
            return Err(MedicheckError::InvalidConfig {
                reason: format!(
                    "default result count {} outside {}..={}",
                    self.max_results,
                    LIMIT_RANGE.start(),
                    LIMIT_RANGE.end()
                ),
            });
        }

        Ok(Config {
            api_key: self.api_key,
            cors_allow_origins: self.cors_allow_origins,
            default_radius_meters: self.default_radius_meters,
            max_results: self.max_results,
            geocode_url,
            places_url,
            geocode_timeout: self.geocode_timeout,
            places_timeout: self.places_timeout,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| MedicheckError::InvalidConfig {
        reason: format!("invalid {} url {:?}: {}", name, value, e),
    })
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
