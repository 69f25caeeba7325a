//! Shared test fixtures for integration tests.

use ev_trip_sim::chargers::{AddressInfo, ChargerDirectory, Connection, LookupError, Poi};
use ev_trip_sim::geo::{Route, Waypoint};
use ev_trip_sim::sim::types::SimParams;
use ev_trip_sim::vehicle::VehicleProfile;

/// Deterministic directory stub serving a fixed POI set to every query.
pub struct StubDirectory {
    pois: Vec<Poi>,
}

impl StubDirectory {
    /// Stub with `(id, latitude, longitude, power_kw)` entries.
    pub fn new(entries: &[(i64, f64, f64, Option<f64>)]) -> Self {
        let pois = entries
            .iter()
            .map(|&(id, lat, lon, kw)| Poi {
                id,
                address: Some(AddressInfo {
                    title: Some(format!("Stub {id}")),
                    latitude: Some(lat),
                    longitude: Some(lon),
                }),
                connections: match kw {
                    Some(kw) => vec![Connection { power_kw: Some(kw) }],
                    None => vec![],
                },
            })
            .collect();
        Self { pois }
    }
}

impl ChargerDirectory for StubDirectory {
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

/// Directory stub whose every lookup fails.
pub struct FailingDirectory;

impl ChargerDirectory for FailingDirectory {
    fn search(&self, _: f64, _: f64, _: f64, _: usize) -> Result<Vec<Poi>, LookupError> {
        Err(LookupError::Request("stub network failure".into()))
    }
}

/// Straight northbound route: `points` waypoints spaced `step_deg` of
/// latitude apart (0.1 deg is ~11.12 km).
pub fn straight_route(points: usize, step_deg: f64) -> Route {
    let waypoints: Vec<Waypoint> = (0..points)
        .map(|i| Waypoint::new(52.0 + step_deg * i as f64, -1.0))
        .collect();
    Route::new(waypoints).expect("fixture route has >= 2 waypoints")
}

/// Default test vehicle: 150 Wh/km, 40 kWh (~266.7 km full range).
pub fn default_profile() -> VehicleProfile {
    VehicleProfile::new(150.0, 40.0).expect("fixture profile is valid")
}

/// Tiny-battery vehicle: 150 Wh/km, 1 kWh (~6.7 km full range).
pub fn tiny_battery_profile() -> VehicleProfile {
    VehicleProfile::new(150.0, 1.0).expect("fixture profile is valid")
}

/// Default simulation parameters (20 km buffer, 5 km radius, 5 results,
/// 3 candidates per stop).
pub fn default_params() -> SimParams {
    SimParams::default()
}
