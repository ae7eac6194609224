use crate::snapshot::error::FetchError;
use crate::snapshot::snapshot_loader::{
    Payload, SnapshotLoader, MEASUREMENTS_SNAPSHOT, SENSORS_SNAPSHOT, STATIONS_SNAPSHOT,
};
use crate::types::freshness::Acquired;
use crate::types::measurement::{Measurement, RawSeries};
use crate::types::sensor::{RawSensor, Sensor};
use crate::types::station::{RawStation, Station};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Knows the three GIOŚ endpoints and turns their payloads into flat records.
#[derive(Debug, Clone)]
pub struct GiosFetcher {
    loader: SnapshotLoader,
    api_base_url: String,
}

impl GiosFetcher {
    pub fn new(loader: SnapshotLoader, api_base_url: &str) -> Self {
        Self {
            loader,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn stations_url(&self) -> String {
        format!("{}/station/findAll", self.api_base_url)
    }

    pub fn sensors_url(&self, station_id: u32) -> String {
        format!("{}/station/sensors/{}", self.api_base_url, station_id)
    }

    pub fn measurements_url(&self, sensor_id: u32) -> String {
        format!("{}/data/getData/{}", self.api_base_url, sensor_id)
    }

    pub async fn stations(&self) -> Result<Acquired<Station>, FetchError> {
        let payload = self
            .loader
            .fetch_or_fallback(&self.stations_url(), STATIONS_SNAPSHOT)
            .await?;
        let freshness = payload.freshness;
        let stations = parse_stations(payload.value)?;
        Ok(Acquired::new(stations, freshness))
    }

    pub async fn sensors(&self, station_id: u32) -> Result<Acquired<Sensor>, FetchError> {
        let Payload { value, freshness } = self
            .loader
            .fetch_or_fallback(&self.sensors_url(station_id), SENSORS_SNAPSHOT)
            .await?;
        Ok(Acquired::new(parse_sensors(value)?, freshness))
    }

    pub async fn measurements(&self, sensor_id: u32) -> Result<Acquired<Measurement>, FetchError> {
        let Payload { value, freshness } = self
            .loader
            .fetch_or_fallback(&self.measurements_url(sensor_id), MEASUREMENTS_SNAPSHOT)
            .await?;
        Ok(Acquired::new(parse_measurements(value)?, freshness))
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|source| FetchError::PayloadShape { what, source })
}

pub fn parse_stations(value: Value) -> Result<Vec<Station>, FetchError> {
    let raw: Vec<RawStation> = decode(value, "stations")?;
    Ok(raw.into_iter().map(Station::from).collect())
}

pub fn parse_sensors(value: Value) -> Result<Vec<Sensor>, FetchError> {
    let raw: Vec<RawSensor> = decode(value, "sensors")?;
    Ok(raw.into_iter().map(Sensor::from).collect())
}

/// Keeps the `values` array in payload order (the API sends newest first).
pub fn parse_measurements(value: Value) -> Result<Vec<Measurement>, FetchError> {
    let raw: RawSeries = decode(value, "measurements")?;
    Ok(raw.values)
}
