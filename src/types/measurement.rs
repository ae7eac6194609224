//! A single point of a sensor's measurement series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `{date, value}` pair of the `data/getData/{sensorId}` payload.
///
/// Timestamps are not unique and values may be missing; both are kept as the
/// API reports them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Measurement {
    #[serde(with = "gios_datetime")]
    pub date: NaiveDateTime,
    pub value: Option<f64>,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} {}", self.date, value),
            None => write!(f, "{} -", self.date),
        }
    }
}

/// The whole `data/getData/{sensorId}` payload. Its `key` (the parameter code)
/// is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSeries {
    pub values: Vec<Measurement>,
}

/// (De)serializes the `"2023-05-17 12:00:00"` timestamps used by the API.
pub(crate) mod gios_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
