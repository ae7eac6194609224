use crate::airquality::LatLon;
use crate::types::station::Station;
use haversine::{distance, Location as HaversineLocation, Units};
use log::warn;
use ordered_float::OrderedFloat;
use rstar::{RTree, RTreeObject, AABB};

// Mean Earth radius used by the `haversine` crate for kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;
// Widen the search box a little so rounding never drops an edge station.
const ENVELOPE_MARGIN: f64 = 1.01;

/// A station placed in the R-tree at its parsed coordinates. `position` is the
/// station's index in the directory, used to keep ties in directory order.
#[derive(Debug, Clone)]
struct IndexedStation {
    position: usize,
    location: LatLon,
    station: Station,
}

impl RTreeObject for IndexedStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.0, self.location.1])
    }
}

/// Spatial index over one snapshot of the station directory.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<IndexedStation>,
}

impl StationLocator {
    /// Indexes every station whose coordinates parse. Stations with broken
    /// coordinates are skipped and logged.
    pub fn new(stations: &[Station]) -> Self {
        let indexed: Vec<IndexedStation> = stations
            .iter()
            .enumerate()
            .filter_map(|(position, station)| match station.coordinates() {
                Ok(location) => Some(IndexedStation {
                    position,
                    location,
                    station: station.clone(),
                }),
                Err(e) => {
                    warn!(
                        "Skipping station {} ({}): unparseable coordinates '{}', '{}': {}",
                        station.id, station.name, station.latitude, station.longitude, e
                    );
                    None
                }
            })
            .collect();

        StationLocator {
            rtree: RTree::bulk_load(indexed),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stations within `max_distance_km` (great-circle, inclusive) of
    /// `origin`, closest first, each paired with its distance in km.
    ///
    /// A negative or NaN radius matches nothing.
    pub fn within_radius(&self, origin: LatLon, max_distance_km: f64) -> Vec<(Station, f64)> {
        if max_distance_km.is_nan() || max_distance_km < 0.0 {
            return vec![];
        }

        let envelope = search_envelope(origin, max_distance_km);
        let mut candidates: Vec<(&IndexedStation, f64)> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|indexed| {
                let dist_km = great_circle_km(origin, indexed.location);
                if dist_km <= max_distance_km {
                    Some((indexed, dist_km))
                } else {
                    None
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            OrderedFloat(a.1)
                .cmp(&OrderedFloat(b.1))
                .then(a.0.position.cmp(&b.0.position))
        });

        candidates
            .into_iter()
            .map(|(indexed, dist_km)| (indexed.station.clone(), dist_km))
            .collect()
    }
}

pub fn great_circle_km(from: LatLon, to: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.0,
            longitude: from.1,
        },
        HaversineLocation {
            latitude: to.0,
            longitude: to.1,
        },
        Units::Kilometers,
    )
}

/// A lat/lon box that contains every point within `radius_km` of `origin`.
/// Falls back to the full longitude range near the poles and across the
/// antimeridian.
fn search_envelope(origin: LatLon, radius_km: f64) -> AABB<[f64; 2]> {
    let angular = radius_km / EARTH_RADIUS_KM * ENVELOPE_MARGIN;
    let delta_lat = angular.to_degrees();
    let lat_min = origin.0 - delta_lat;
    let lat_max = origin.0 + delta_lat;

    let full_longitude = |lat_min: f64, lat_max: f64| {
        AABB::from_corners([lat_min.max(-90.0), -180.0], [lat_max.min(90.0), 180.0])
    };

    if lat_min <= -90.0 || lat_max >= 90.0 {
        return full_longitude(lat_min, lat_max);
    }

    let ratio = angular.sin() / origin.0.to_radians().cos();
    if ratio.is_nan() || ratio >= 1.0 {
        return full_longitude(lat_min, lat_max);
    }
    let delta_lon = ratio.asin().to_degrees();
    let lon_min = origin.1 - delta_lon;
    let lon_max = origin.1 + delta_lon;
    if lon_min < -180.0 || lon_max > 180.0 {
        return full_longitude(lat_min, lat_max);
    }

    AABB::from_corners([lat_min, lon_min], [lat_max, lon_max])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: u32, lat: &str, lon: &str) -> Station {
        Station {
            id,
            name: format!("Station {}", id),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            city_id: id,
            city_name: format!("City {}", id),
            commune_name: None,
            district_name: None,
            province_name: None,
            address_street: None,
        }
    }

    fn directory() -> Vec<Station> {
        vec![
            station(1, "51.0", "19.0"),
            station(2, "50.0", "19.0"),
            station(3, "52.2297", "21.0122"),
            station(4, "54.352", "18.6466"),
            station(5, "50.0614", "19.9366"),
        ]
    }

    fn ids(results: &[(Station, f64)]) -> Vec<u32> {
        results.iter().map(|(s, _)| s.id).collect()
    }

    fn validate_results(results: &[(Station, f64)], max_distance_km: f64) {
        let mut last_dist = -1.0;
        for (station, dist) in results {
            assert!(
                *dist <= max_distance_km,
                "Station {} distance {} > max {}",
                station.id,
                dist,
                max_distance_km
            );
            assert!(*dist >= last_dist, "Results not sorted by distance");
            last_dist = *dist;
        }
    }

    #[test]
    fn test_radius_example() {
        let locator = StationLocator::new(&directory());
        let origin = LatLon(50.0, 19.0);

        let near = locator.within_radius(origin, 50.0);
        assert_eq!(ids(&near), vec![2]);
        assert_eq!(near[0].1, 0.0);

        let wider = locator.within_radius(origin, 150.0);
        assert_eq!(ids(&wider), vec![2, 5, 1]);
        assert!((wider[2].1 - 111.19).abs() < 0.5, "got {}", wider[2].1);
        validate_results(&wider, 150.0);
    }

    #[test]
    fn test_zero_radius_keeps_only_exact_matches() {
        let locator = StationLocator::new(&directory());
        let results = locator.within_radius(LatLon(50.0, 19.0), 0.0);
        assert_eq!(ids(&results), vec![2]);

        let none = locator.within_radius(LatLon(49.0, 22.0), 0.0);
        assert!(none.is_empty());
    }

    #[test]
    fn test_huge_radius_returns_whole_directory_sorted() {
        let locator = StationLocator::new(&directory());
        let results = locator.within_radius(LatLon(50.0, 19.0), 40_000.0);
        assert_eq!(results.len(), directory().len());
        validate_results(&results, 40_000.0);

        let infinite = locator.within_radius(LatLon(50.0, 19.0), f64::INFINITY);
        assert_eq!(ids(&infinite), ids(&results));
    }

    #[test]
    fn test_increasing_radius_never_drops_a_station() {
        let locator = StationLocator::new(&directory());
        let origin = LatLon(51.5, 19.5);
        let mut previous: Vec<u32> = vec![];
        for radius in [0.0, 10.0, 60.0, 100.0, 200.0, 350.0, 1000.0] {
            let current = ids(&locator.within_radius(origin, radius));
            for id in &previous {
                assert!(current.contains(id), "station {} lost at {} km", id, radius);
            }
            previous = current;
        }
        assert_eq!(previous.len(), 5);
    }

    #[test]
    fn test_ties_keep_directory_order() {
        let stations = vec![
            station(7, "50.0", "19.0"),
            station(3, "50.0", "19.0"),
            station(9, "50.0", "19.0"),
        ];
        let locator = StationLocator::new(&stations);
        let results = locator.within_radius(LatLon(50.0, 19.0), 1.0);
        assert_eq!(ids(&results), vec![7, 3, 9]);
    }

    #[test]
    fn test_unparseable_coordinates_are_skipped() {
        let mut stations = directory();
        stations.push(station(99, "", "19.0"));
        let locator = StationLocator::new(&stations);
        assert_eq!(locator.len(), 5);
        let results = locator.within_radius(LatLon(50.0, 19.0), 40_000.0);
        assert!(!ids(&results).contains(&99));
    }

    #[test]
    fn test_negative_or_nan_radius_is_empty() {
        let locator = StationLocator::new(&directory());
        assert!(locator.within_radius(LatLon(50.0, 19.0), -1.0).is_empty());
        assert!(locator.within_radius(LatLon(50.0, 19.0), f64::NAN).is_empty());
    }

    #[test]
    fn test_envelope_handles_antimeridian_and_poles() {
        let stations = vec![
            station(1, "-16.5", "179.9"),
            station(2, "-16.5", "-179.9"),
            station(3, "89.9", "0.0"),
        ];
        let locator = StationLocator::new(&stations);

        let across = locator.within_radius(LatLon(-16.5, 179.95), 50.0);
        assert_eq!(ids(&across), vec![1, 2]);

        let polar = locator.within_radius(LatLon(89.95, 120.0), 50.0);
        assert_eq!(ids(&polar), vec![3]);
    }
}
