//! The main entry point: a client for the GIOŚ air-quality API that keeps the
//! result of the latest query of each kind and falls back to on-disk snapshots
//! when the network is unavailable.

use crate::acquisition::fetcher::GiosFetcher;
use crate::analysis::error::AnalysisError;
use crate::analysis::trend::{TrendAnalyzer, TrendReport};
use crate::background::BackgroundRequest;
use crate::error::AirQualityError;
use crate::snapshot::snapshot_loader::SnapshotLoader;
use crate::stations::geocoder::{Geocoder, DEFAULT_GEOCODER_URL};
use crate::stations::locate_station::StationLocator;
use crate::store::single_slot::{LocalStore, Slot};
use crate::types::freshness::Acquired;
use crate::types::measurement::Measurement;
use crate::types::sensor::Sensor;
use crate::types::station::Station;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.gios.gov.pl/pjp-api/rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
const DEFAULT_USER_AGENT: &str = concat!("gios-air/", env!("CARGO_PKG_VERSION"));

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use gios_air::LatLon;
///
/// let krakow = LatLon(50.0614, 19.9366);
/// assert_eq!(krakow.0, 50.0614); // Latitude
/// assert_eq!(krakow.1, 19.9366); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Client for the GIOŚ station directory, sensor lists and measurement series.
///
/// Each acquisition replaces the matching in-memory slot in full: fetching the
/// sensors of a second station forgets the first. Every result says whether
/// it is live or was read from the last snapshot (see [`crate::Freshness`]).
///
/// Cloning is cheap and clones share the same slots.
///
/// # Examples
///
/// ```rust,no_run
/// # use gios_air::{AirQuality, AirQualityError};
/// # async fn run() -> Result<(), AirQualityError> {
/// let client = AirQuality::new().await?;
/// let stations = client.stations().await?;
/// println!("{} stations ({})", stations.len(), stations.freshness);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AirQuality {
    fetcher: GiosFetcher,
    geocoder: Geocoder,
    store: Arc<LocalStore>,
}

#[bon]
impl AirQuality {
    /// Creates a client with explicit settings. Anything left unset uses the
    /// defaults of [`AirQuality::new`].
    ///
    /// # Arguments
    ///
    /// * `.cache_folder(PathBuf)`: where the snapshot files live. Created if missing.
    /// * `.api_base_url(&str)`: defaults to [`DEFAULT_API_BASE_URL`].
    /// * `.geocoder_url(&str)`: a Nominatim-compatible server, defaults to [`DEFAULT_GEOCODER_URL`].
    /// * `.user_agent(&str)`: sent with every request. Public Nominatim requires an identifying one.
    /// * `.timeout(Duration)`: per-request timeout, defaults to [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// [`AirQualityError::CacheDirResolution`] / [`AirQualityError::CacheDirCreation`]
    /// when the cache folder cannot be found or created, and
    /// [`AirQualityError::ClientBuild`] if the HTTP client cannot be set up.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use gios_air::{AirQuality, AirQualityError};
    /// # use std::time::Duration;
    /// # async fn run() -> Result<(), AirQualityError> {
    /// let client = AirQuality::configured()
    ///     .cache_folder("/tmp/gios".into())
    ///     .user_agent("my-app/1.0 (me@example.com)")
    ///     .timeout(Duration::from_secs(10))
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn configured(
        cache_folder: Option<PathBuf>,
        api_base_url: Option<&str>,
        geocoder_url: Option<&str>,
        user_agent: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, AirQualityError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(AirQualityError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| AirQualityError::CacheDirCreation(cache_folder.clone(), e))?;

        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(AirQualityError::ClientBuild)?;

        let loader = SnapshotLoader::new(&cache_folder, client.clone());
        Ok(Self {
            fetcher: GiosFetcher::new(loader, api_base_url.unwrap_or(DEFAULT_API_BASE_URL)),
            geocoder: Geocoder::new(client, geocoder_url.unwrap_or(DEFAULT_GEOCODER_URL)),
            store: Arc::new(LocalStore::default()),
        })
    }

    /// Creates a client that keeps its snapshots in `cache_folder`.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, AirQualityError> {
        Self::configured().cache_folder(cache_folder).call().await
    }

    /// Creates a client using the default cache directory
    /// (e.g. `~/.cache/gios_air_cache` on Linux) and the public endpoints.
    pub async fn new() -> Result<Self, AirQualityError> {
        Self::configured().call().await
    }

    /// Downloads the full station directory and makes it the current one.
    ///
    /// Falls back to the last snapshot if the download fails; the returned
    /// [`Acquired::freshness`] tells which happened.
    ///
    /// # Errors
    ///
    /// [`crate::FetchError::SnapshotMissing`] when the download fails and no
    /// snapshot was ever stored, or any error decoding the payload.
    pub async fn stations(&self) -> Result<Acquired<Station>, AirQualityError> {
        let acquired = self.fetcher.stations().await?;
        info!(
            "Station directory: {} stations ({})",
            acquired.len(),
            acquired.freshness
        );
        for station in &acquired.records {
            debug!("{}", station);
        }
        self.store.stations.replace((), acquired.clone()).await;
        Ok(acquired)
    }

    /// Downloads the sensors installed at `station_id`, replacing the sensors of
    /// any previously queried station.
    pub async fn sensors(&self, station_id: u32) -> Result<Acquired<Sensor>, AirQualityError> {
        let acquired = self.fetcher.sensors(station_id).await?;
        info!(
            "Station {}: {} sensors ({})",
            station_id,
            acquired.len(),
            acquired.freshness
        );
        for sensor in &acquired.records {
            debug!("{}", sensor);
        }
        self.store
            .sensors
            .replace(station_id, acquired.clone())
            .await;
        Ok(acquired)
    }

    /// Downloads the measurement series of `sensor_id`, in the order the API
    /// sends it, replacing any previously fetched series.
    pub async fn measurements(
        &self,
        sensor_id: u32,
    ) -> Result<Acquired<Measurement>, AirQualityError> {
        let acquired = self.fetcher.measurements(sensor_id).await?;
        info!(
            "Sensor {}: {} measurements ({})",
            sensor_id,
            acquired.len(),
            acquired.freshness
        );
        for measurement in &acquired.records {
            debug!("{}", measurement);
        }
        self.store
            .measurements
            .replace(sensor_id, acquired.clone())
            .await;
        Ok(acquired)
    }

    pub async fn current_stations(&self) -> Option<Acquired<Station>> {
        self.store.stations.current().await.map(|slot| slot.contents)
    }

    /// The sensor list of the last queried station, keyed by station id.
    pub async fn current_sensors(&self) -> Option<Slot<u32, Sensor>> {
        self.store.sensors.current().await
    }

    /// The last fetched series, keyed by sensor id.
    pub async fn current_measurements(&self) -> Option<Slot<u32, Measurement>> {
        self.store.measurements.current().await
    }

    /// Stations of the current directory whose city name is exactly `city`.
    /// Empty before the directory has been fetched.
    pub async fn stations_in_city(&self, city: &str) -> Vec<Station> {
        self.current_stations()
            .await
            .map(|acquired| {
                acquired
                    .records
                    .into_iter()
                    .filter(|station| station.city_name == city)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn station(&self, station_id: u32) -> Option<Station> {
        self.current_stations()
            .await?
            .records
            .into_iter()
            .find(|station| station.id == station_id)
    }

    /// Finds stations within a radius of an address or a coordinate, closest
    /// first, each paired with its great-circle distance in km.
    ///
    /// The station directory is fetched first if there is none yet. The
    /// directory itself is left untouched.
    ///
    /// # Arguments
    ///
    /// * `.address(&str)`: resolved through the geocoder.
    /// * `.location(LatLon)`: used as-is. Takes precedence over `.address`.
    /// * `.max_distance_km(f64)`: inclusive radius. Defaults to `50.0`. A
    ///   negative or NaN radius matches nothing.
    ///
    /// # Errors
    ///
    /// [`AirQualityError::MissingLocation`] if neither `.address` nor
    /// `.location` was given, [`AirQualityError::Geocoding`] if the address
    /// cannot be resolved, or any error fetching the directory.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use gios_air::{AirQuality, AirQualityError, LatLon};
    /// # async fn run() -> Result<(), AirQualityError> {
    /// let client = AirQuality::new().await?;
    /// let near_krakow = client
    ///     .find_stations()
    ///     .address("Kraków")
    ///     .max_distance_km(20.0)
    ///     .call()
    ///     .await?;
    ///
    /// let near_point = client
    ///     .find_stations()
    ///     .location(LatLon(52.23, 21.01))
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn find_stations(
        &self,
        address: Option<&str>,
        location: Option<LatLon>,
        max_distance_km: Option<f64>,
    ) -> Result<Vec<(Station, f64)>, AirQualityError> {
        let max_distance_km = max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
        let origin = match (location, address) {
            (Some(location), _) => location,
            (None, Some(address)) => self.geocoder.locate(address).await?,
            (None, None) => return Err(AirQualityError::MissingLocation),
        };

        let directory = match self.current_stations().await {
            Some(directory) => directory,
            None => {
                info!("No station directory yet, fetching it first");
                self.stations().await?
            }
        };

        let locator = StationLocator::new(&directory.records);
        let found = locator.within_radius(origin, max_distance_km);
        if found.is_empty() {
            warn!(
                "No stations within {} km of {:?} ({} indexed)",
                max_distance_km,
                origin,
                locator.len()
            );
        } else {
            info!(
                "{} stations within {} km of {:?}",
                found.len(),
                max_distance_km,
                origin
            );
        }
        Ok(found)
    }

    /// Analyzes the current measurement series without modifying it.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::NoSeries`] when no series has been fetched, plus the
    /// errors of [`TrendAnalyzer::analyze`].
    pub async fn analyze(&self) -> Result<TrendReport, AirQualityError> {
        let slot = self
            .current_measurements()
            .await
            .ok_or(AnalysisError::NoSeries)?;
        info!(
            "Analyzing {} measurements of sensor {}",
            slot.contents.len(),
            slot.key
        );
        Ok(TrendAnalyzer::analyze(&slot.contents.records)?)
    }

    /// [`AirQuality::stations`] on a background task.
    pub fn spawn_stations(&self) -> BackgroundRequest<Acquired<Station>> {
        let client = self.clone();
        BackgroundRequest::spawn("stations", async move { client.stations().await })
    }

    pub fn spawn_sensors(&self, station_id: u32) -> BackgroundRequest<Acquired<Sensor>> {
        let client = self.clone();
        BackgroundRequest::spawn("sensors", async move { client.sensors(station_id).await })
    }

    pub fn spawn_measurements(&self, sensor_id: u32) -> BackgroundRequest<Acquired<Measurement>> {
        let client = self.clone();
        BackgroundRequest::spawn("measurements", async move {
            client.measurements(sensor_id).await
        })
    }

    /// Address search on a background task, so geocoding and a possible
    /// directory download do not block the caller.
    pub fn spawn_find_stations(
        &self,
        address: String,
        max_distance_km: f64,
    ) -> BackgroundRequest<Vec<(Station, f64)>> {
        let client = self.clone();
        BackgroundRequest::spawn("find_stations", async move {
            client
                .find_stations()
                .address(&address)
                .max_distance_km(max_distance_km)
                .call()
                .await
        })
    }
}
