use crate::analysis::error::AnalysisError;
use crate::snapshot::error::FetchError;
use crate::stations::error::GeocodingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Either an address or a location is required to find stations")]
    MissingLocation,

    #[error("'{input}' is not a valid station or sensor id")]
    InvalidId {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Background request was cancelled before it completed")]
    Cancelled,

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
