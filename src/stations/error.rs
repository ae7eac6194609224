use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoding request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Geocoding request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not resolve location '{0}'")]
    NotFound(String),

    #[error("Geocoder returned an invalid coordinate '{value}' for '{address}'")]
    InvalidCoordinate {
        address: String,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}
