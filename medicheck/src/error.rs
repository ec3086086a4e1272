//! Error types for the MediCheck library.

use thiserror::Error;

/// Errors that can occur while resolving a location or searching for hospitals.
#[derive(Error, Debug)]
pub enum MedicheckError {
    /// No API credential was configured for the upstream services.
    #[error("Server missing GOOGLE_PLACES_API_KEY/GOOGLE_MAPS_API_KEY")]
    MissingApiKey,

    /// The geocoder returned no match for the query.
    #[error("Location not found")]
    LocationNotFound { query: String },

    /// The places service rejected the nearby search.
    #[error("Places error: {detail}")]
    Places { status: u16, detail: String },

    /// An upstream service answered with a failure status.
    #[error("{service} error ({status}): {message}")]
    UpstreamStatus {
        service: &'static str,
        status: String,
        message: String,
    },

    /// Transport failure or timeout talking to an upstream service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An upstream body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value could not be used.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type alias using [`MedicheckError`].
pub type Result<T> = std::result::Result<T, MedicheckError>;
