use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot analyze an empty measurement series")]
    EmptySeries,

    #[error("Measurement series of {0} rows has no non-null values")]
    NoValues(usize),

    #[error("No measurement series has been fetched yet")]
    NoSeries,

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
