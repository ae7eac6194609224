//! Resolves free-text locations ("Kraków", "ul. Piłsudskiego 26, Dzierżoniów")
//! to coordinates through a Nominatim-compatible `search` endpoint.

use crate::airquality::LatLon;
use crate::stations::error::GeocodingError;
use log::info;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the coordinates of the first match for `address`.
    ///
    /// # Errors
    ///
    /// [`GeocodingError::NotFound`] when the provider has no match; network and
    /// status errors are passed through unchanged. There is no fallback.
    pub async fn locate(&self, address: &str) -> Result<LatLon, GeocodingError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodingError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    GeocodingError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    GeocodingError::NetworkRequest(url, e)
                });
            }
        };

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| GeocodingError::NetworkRequest(url.clone(), e))?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(address.to_string()))?;

        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|source| GeocodingError::InvalidCoordinate {
                    address: address.to_string(),
                    value: value.to_string(),
                    source,
                })
        };
        let location = LatLon(parse(&hit.lat)?, parse(&hit.lon)?);
        info!(
            "Resolved '{}' to {:?} ({})",
            address,
            location,
            hit.display_name.as_deref().unwrap_or("no display name")
        );
        Ok(location)
    }
}
