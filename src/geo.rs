//! Waypoints, routes, and great-circle distance.

use std::fmt;

use serde::Deserialize;

/// Mean Earth radius in kilometres, as used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A single route position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Waypoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Waypoint {
    /// Creates a waypoint from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two waypoints in kilometres.
///
/// Haversine formula over a spherical Earth of radius 6371.0 km. Inputs are
/// degrees. Symmetric in its arguments; NaN coordinates propagate as NaN
/// output rather than being guarded.
pub fn distance_km(a: Waypoint, b: Waypoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Error constructing a route from waypoints.
#[derive(Debug)]
pub enum RouteError {
    /// Fewer than two waypoints; no trip can be simulated.
    TooFewWaypoints(usize),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::TooFewWaypoints(n) => {
                write!(f, "route error: need at least 2 waypoints, got {n}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// An ordered sequence of waypoints from start to destination.
///
/// Construction validates the two-waypoint minimum, so a `Route` value always
/// satisfies the simulator's precondition. Adjacent waypoints are assumed
/// close enough that great-circle distance approximates road distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Creates a route from an ordered waypoint sequence.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::TooFewWaypoints` if fewer than two waypoints are
    /// supplied.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }
        Ok(Self { waypoints })
    }

    /// The ordered waypoints, start first.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The start waypoint.
    pub fn start(&self) -> Waypoint {
        self.waypoints[0]
    }

    /// The destination waypoint.
    pub fn destination(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Number of waypoints (always >= 2).
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; present for clippy's `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of consecutive great-circle segment lengths in kilometres.
    pub fn total_distance_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| distance_km(pair[0], pair[1]))
            .sum()
    }
}
