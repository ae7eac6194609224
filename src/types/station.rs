//! Defines the data structures representing GIOŚ air-quality monitoring stations,
//! both in the nested shape the REST API returns and in the flat shape the rest
//! of the crate works with.

use crate::airquality::LatLon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseFloatError;

// --- Data Structures ---

/// Represents a single GIOŚ monitoring station with its address metadata.
///
/// This is the flattened form of the `station/findAll` payload: the nested
/// `city` and `city.commune` objects are pulled up into plain fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The unique GIOŚ station identifier (e.g. `114`).
    pub id: u32,
    /// The human readable station name (e.g. "Wrocław, ul. Bartnicza").
    pub name: String,
    /// Latitude in decimal degrees, exactly as the API reports it (a string).
    pub latitude: String,
    /// Longitude in decimal degrees, exactly as the API reports it (a string).
    pub longitude: String,
    /// Identifier of the city the station belongs to.
    pub city_id: u32,
    /// Name of the city the station belongs to.
    pub city_name: String,
    /// Name of the commune (gmina), if reported.
    pub commune_name: Option<String>,
    /// Name of the district (powiat), if reported.
    pub district_name: Option<String>,
    /// Name of the province (województwo), if reported.
    pub province_name: Option<String>,
    /// Street address, if reported.
    pub address_street: Option<String>,
}

impl Station {
    /// Parses the station's decimal-string coordinates into a [`LatLon`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFloatError`] if either coordinate is not a valid number.
    pub fn coordinates(&self) -> Result<LatLon, ParseFloatError> {
        let latitude = self.latitude.trim().parse::<f64>()?;
        let longitude = self.longitude.trim().parse::<f64>()?;
        Ok(LatLon(latitude, longitude))
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] ({}, {})",
            self.id, self.name, self.city_name, self.latitude, self.longitude
        )?;
        if let Some(street) = &self.address_street {
            write!(f, " {}", street)?;
        }
        Ok(())
    }
}

// --- Raw API shapes ---

/// A station as returned by `station/findAll`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStation {
    id: u32,
    station_name: String,
    gegr_lat: String,
    gegr_lon: String,
    city: RawCity,
    address_street: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    id: u32,
    name: String,
    commune: RawCommune,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommune {
    commune_name: Option<String>,
    district_name: Option<String>,
    province_name: Option<String>,
}

impl From<RawStation> for Station {
    fn from(raw: RawStation) -> Self {
        Station {
            id: raw.id,
            name: raw.station_name,
            latitude: raw.gegr_lat,
            longitude: raw.gegr_lon,
            city_id: raw.city.id,
            city_name: raw.city.name,
            commune_name: raw.city.commune.commune_name,
            district_name: raw.city.commune.district_name,
            province_name: raw.city.commune.province_name,
            address_street: raw.address_street,
        }
    }
}
