mod acquisition;
mod airquality;
mod analysis;
mod background;
mod error;
mod snapshot;
mod stations;
mod store;
mod types;
mod utils;

pub use airquality::*;
pub use background::BackgroundRequest;
pub use error::AirQualityError;
pub use utils::parse_id;

pub use acquisition::fetcher::{parse_measurements, parse_sensors, parse_stations, GiosFetcher};
pub use snapshot::snapshot_loader::{
    Payload, SnapshotLoader, MEASUREMENTS_SNAPSHOT, SENSORS_SNAPSHOT, STATIONS_SNAPSHOT,
};
pub use stations::geocoder::{Geocoder, DEFAULT_GEOCODER_URL};
pub use stations::locate_station::{great_circle_km, StationLocator};
pub use store::single_slot::{LocalStore, SingleSlot, Slot};

pub use analysis::trend::{window_size, TrendAnalyzer, TrendPoint, TrendReport};

pub use types::freshness::{Acquired, Freshness};
pub use types::measurement::Measurement;
pub use types::sensor::Sensor;
pub use types::station::Station;

pub use analysis::error::AnalysisError;
pub use snapshot::error::FetchError;
pub use stations::error::GeocodingError;
