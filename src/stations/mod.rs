pub mod error;
pub mod geocoder;
pub mod locate_station;
