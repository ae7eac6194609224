//! Measurement positions ("stanowiska") attached to a station. Each sensor
//! measures exactly one parameter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single sensor of a monitoring station, flattened from `station/sensors/{id}`.
///
/// `station_id` is only a reference: the sensor list is never checked against
/// the station directory, so orphaned sensors are kept as-is.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sensor {
    pub id: u32,
    pub station_id: u32,
    /// Polish name of the measured parameter (e.g. "dwutlenek azotu").
    pub param_name: String,
    /// Chemical formula of the parameter (e.g. "NO2").
    pub param_formula: String,
    pub param_code: String,
    pub param_id: u32,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} station={} {} ({})",
            self.id, self.station_id, self.param_name, self.param_formula
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSensor {
    id: u32,
    station_id: u32,
    param: RawParam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParam {
    param_name: String,
    param_formula: String,
    param_code: String,
    id_param: u32,
}

impl From<RawSensor> for Sensor {
    fn from(raw: RawSensor) -> Self {
        Sensor {
            id: raw.id,
            station_id: raw.station_id,
            param_name: raw.param.param_name,
            param_formula: raw.param.param_formula,
            param_code: raw.param.param_code,
            param_id: raw.param.id_param,
        }
    }
}
