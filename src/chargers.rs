//! Charger directory abstraction and candidate fetching.
//!
//! A [`ChargerDirectory`] returns raw POI records in the Open Charge Map
//! wire shape; [`fetch_candidates`] queries it for a batch of points,
//! normalizes the records into [`Charger`] values, and deduplicates by
//! charger id. Directory sources may return the same POI from multiple
//! nearby queries, so dedup is by id rather than by coordinate.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::geo::{Route, Waypoint};

/// A normalized charging station candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Charger {
    /// Directory identifier, unique within one fetch batch.
    pub id: i64,
    /// Display name, when the directory provides one.
    pub name: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Maximum power rating across all connections, in kW.
    pub max_power_kw: Option<f64>,
}

/// Raw POI record as returned by the charger directory.
///
/// Field names follow the Open Charge Map response so the online client can
/// deserialize responses directly; offline directories construct these by
/// hand.
#[derive(Debug, Clone, Deserialize)]
pub struct Poi {
    /// Directory identifier.
    #[serde(rename = "ID")]
    pub id: i64,
    /// Address block carrying title and coordinates.
    #[serde(rename = "AddressInfo")]
    pub address: Option<AddressInfo>,
    /// Physical connections with optional power ratings.
    #[serde(rename = "Connections", default)]
    pub connections: Vec<Connection>,
}

/// POI address block.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInfo {
    /// Display name of the site.
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Latitude in degrees.
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
}

/// One physical connection at a charging site.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    /// Rated power in kW, when known.
    #[serde(rename = "PowerKW")]
    pub power_kw: Option<f64>,
}

impl Poi {
    /// Normalizes a raw record into a [`Charger`].
    ///
    /// Records without coordinates are dropped (`None`). When several
    /// connections carry power ratings, the maximum is kept.
    pub fn normalize(&self) -> Option<Charger> {
        let address = self.address.as_ref()?;
        let latitude = address.latitude?;
        let longitude = address.longitude?;

        let mut max_power_kw: Option<f64> = None;
        for conn in &self.connections {
            if let Some(kw) = conn.power_kw {
                max_power_kw = Some(match max_power_kw {
                    Some(prev) => prev.max(kw),
                    None => kw,
                });
            }
        }

        Some(Charger {
            id: self.id,
            name: address.title.clone(),
            latitude,
            longitude,
            max_power_kw,
        })
    }
}

/// Error from a charger directory lookup.
#[derive(Debug)]
pub enum LookupError {
    /// The request to the directory failed (network, timeout).
    Request(String),
    /// The directory responded with something that did not parse.
    Malformed(String),
    /// Every per-point lookup in a batch failed.
    AllPointsFailed {
        /// Number of points queried.
        points: usize,
        /// Message of the last failure observed.
        last: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Request(msg) => write!(f, "charger lookup failed: {msg}"),
            LookupError::Malformed(msg) => {
                write!(f, "charger lookup returned malformed data: {msg}")
            }
            LookupError::AllPointsFailed { points, last } => {
                write!(f, "all {points} charger lookups failed, last error: {last}")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// External charger directory, injected into the fetcher and the simulator.
pub trait ChargerDirectory {
    /// Returns raw POI records within `radius_km` of the given point,
    /// at most `max_results` of them.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` when the lookup cannot be completed.
    fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        max_results: usize,
    ) -> Result<Vec<Poi>, LookupError>;
}

/// Queries the directory once per point and merges the results.
///
/// Returned chargers are deduplicated by id in first-seen order across the
/// points list; they are not re-sorted by distance. Individual point
/// failures are tolerated as long as at least one lookup succeeds.
///
/// # Errors
///
/// Returns `LookupError::AllPointsFailed` only when every per-point lookup
/// failed (callers typically treat this as "no candidates found").
pub fn fetch_candidates<D: ChargerDirectory + ?Sized>(
    directory: &D,
    points: &[Waypoint],
    max_results: usize,
    radius_km: f64,
) -> Result<Vec<Charger>, LookupError> {
    let mut chargers = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut failures = 0_usize;
    let mut last_error = String::new();

    for point in points {
        match directory.search(point.latitude, point.longitude, radius_km, max_results) {
            Ok(pois) => {
                for poi in &pois {
                    if let Some(charger) = poi.normalize()
                        && seen.insert(charger.id)
                    {
                        chargers.push(charger);
                    }
                }
            }
            Err(e) => {
                failures += 1;
                last_error = e.to_string();
            }
        }
    }

    if !points.is_empty() && failures == points.len() {
        return Err(LookupError::AllPointsFailed {
            points: failures,
            last: last_error,
        });
    }
    Ok(chargers)
}

/// Picks a small set of sample points spread along a route.
///
/// Always includes start and destination; for longer routes every Nth
/// interior waypoint is added so that one batched fetch covers the route
/// without querying the directory per waypoint.
pub fn sample_points(route: &Route, interior_samples: usize) -> Vec<Waypoint> {
    let waypoints = route.waypoints();
    let mut points = vec![route.start(), route.destination()];
    if waypoints.len() > 8 && interior_samples > 0 {
        let step = (waypoints.len() / interior_samples).max(1);
        for wp in waypoints[1..waypoints.len() - 1].iter().step_by(step) {
            points.push(*wp);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Waypoint;

    fn poi(id: i64, lat: f64, lon: f64, power: &[f64]) -> Poi {
        Poi {
            id,
            address: Some(AddressInfo {
                title: Some(format!("Charger {id}")),
                latitude: Some(lat),
                longitude: Some(lon),
            }),
            connections: power
                .iter()
                .map(|&kw| Connection { power_kw: Some(kw) })
                .collect(),
        }
    }

    /// Directory stub returning a fixed POI list per call.
    struct FixedDirectory {
        pois: Vec<Poi>,
    }

    impl ChargerDirectory for FixedDirectory {
        fn search(
            &self,
            _latitude: f64,
            _longitude: f64,
            _radius_km: f64,
            max_results: usize,
        ) -> Result<Vec<Poi>, LookupError> {
            Ok(self.pois.iter().take(max_results).cloned().collect())
        }
    }

    /// Directory stub that always fails.
    struct FailingDirectory;

    impl ChargerDirectory for FailingDirectory {
        fn search(&self, _: f64, _: f64, _: f64, _: usize) -> Result<Vec<Poi>, LookupError> {
            Err(LookupError::Request("connection refused".into()))
        }
    }

    #[test]
    fn normalize_takes_max_power_across_connections() {
        let p = poi(1, 52.0, -1.0, &[7.0, 50.0, 22.0]);
        let c = p.normalize().unwrap();
        assert_eq!(c.max_power_kw, Some(50.0));
    }

    #[test]
    fn normalize_without_power_ratings() {
        let p = Poi {
            id: 2,
            address: Some(AddressInfo {
                title: None,
                latitude: Some(52.0),
                longitude: Some(-1.0),
            }),
            connections: vec![Connection { power_kw: None }],
        };
        let c = p.normalize().unwrap();
        assert_eq!(c.max_power_kw, None);
        assert_eq!(c.name, None);
    }

    #[test]
    fn normalize_drops_records_without_coordinates() {
        let p = Poi {
            id: 3,
            address: Some(AddressInfo {
                title: Some("No coords".into()),
                latitude: None,
                longitude: Some(-1.0),
            }),
            connections: vec![],
        };
        assert!(p.normalize().is_none());

        let p = Poi {
            id: 4,
            address: None,
            connections: vec![],
        };
        assert!(p.normalize().is_none());
    }

    #[test]
    fn poi_deserializes_from_ocm_json() {
        let json = r#"{
            "ID": 12345,
            "AddressInfo": {
                "Title": "Services North",
                "Latitude": 52.43,
                "Longitude": -1.72
            },
            "Connections": [
                {"PowerKW": 50.0},
                {"PowerKW": null},
                {"PowerKW": 7.4}
            ]
        }"#;
        let p: Poi = serde_json::from_str(json).expect("OCM-shaped JSON should parse");
        let c = p.normalize().unwrap();
        assert_eq!(c.id, 12345);
        assert_eq!(c.max_power_kw, Some(50.0));
    }

    #[test]
    fn fetch_deduplicates_by_id_across_points() {
        // Same POI comes back from two nearby sample points.
        let dir = FixedDirectory {
            pois: vec![poi(7, 52.0, -1.0, &[22.0]), poi(8, 52.01, -1.0, &[7.0])],
        };
        let points = [Waypoint::new(52.0, -1.0), Waypoint::new(52.005, -1.0)];
        let chargers = fetch_candidates(&dir, &points, 5, 5.0).unwrap();
        assert_eq!(chargers.len(), 2);
        assert_eq!(chargers[0].id, 7);
        assert_eq!(chargers[1].id, 8);
    }

    #[test]
    fn fetch_preserves_first_seen_order() {
        let dir = FixedDirectory {
            pois: vec![
                poi(30, 52.0, -1.0, &[]),
                poi(10, 52.0, -1.0, &[]),
                poi(20, 52.0, -1.0, &[]),
            ],
        };
        let chargers = fetch_candidates(&dir, &[Waypoint::new(52.0, -1.0)], 5, 5.0).unwrap();
        let ids: Vec<i64> = chargers.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn fetch_respects_max_results_per_point() {
        let dir = FixedDirectory {
            pois: (0..10).map(|i| poi(i, 52.0, -1.0, &[])).collect(),
        };
        let chargers = fetch_candidates(&dir, &[Waypoint::new(52.0, -1.0)], 3, 5.0).unwrap();
        assert_eq!(chargers.len(), 3);
    }

    #[test]
    fn fetch_fails_only_when_all_points_fail() {
        let result = fetch_candidates(
            &FailingDirectory,
            &[Waypoint::new(52.0, -1.0), Waypoint::new(52.1, -1.0)],
            5,
            5.0,
        );
        assert!(matches!(
            result,
            Err(LookupError::AllPointsFailed { points: 2, .. })
        ));
    }

    #[test]
    fn sample_points_short_route_is_endpoints_only() {
        let route = Route::new(vec![
            Waypoint::new(52.0, -1.0),
            Waypoint::new(52.1, -1.0),
            Waypoint::new(52.2, -1.0),
        ])
        .unwrap();
        assert_eq!(sample_points(&route, 6).len(), 2);
    }

    #[test]
    fn sample_points_long_route_adds_interior_samples() {
        let waypoints: Vec<Waypoint> = (0..40)
            .map(|i| Waypoint::new(52.0 + 0.01 * i as f64, -1.0))
            .collect();
        let route = Route::new(waypoints).unwrap();
        let points = sample_points(&route, 6);
        assert!(points.len() > 2);
        assert!(points.len() <= 10);
        assert_eq!(points[0], Waypoint::new(52.0, -1.0));
    }
}
