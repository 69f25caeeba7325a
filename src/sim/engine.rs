//! Trip simulator: walks a route, depletes range, and plans charging stops.

use crate::chargers::{ChargerDirectory, fetch_candidates};
use crate::geo::{Route, distance_km};
use crate::vehicle::VehicleProfile;

use super::range::RangeTracker;
use super::types::{ChargingStop, SimParams, TripPlan};

/// Trip simulator over an injected charger directory.
///
/// Generic over `D: ChargerDirectory` for static dispatch; the directory is
/// only consulted at decision points, never per waypoint. Each call to
/// [`simulate`](Self::simulate) owns a fresh trip state, so repeated calls
/// with identical inputs produce identical plans.
pub struct TripSimulator<'a, D: ChargerDirectory + ?Sized> {
    directory: &'a D,
    params: SimParams,
}

impl<'a, D: ChargerDirectory + ?Sized> TripSimulator<'a, D> {
    /// Creates a simulator with the given directory and parameters.
    pub fn new(directory: &'a D, params: SimParams) -> Self {
        Self { directory, params }
    }

    /// Simulates the trip and returns the planned stops and total distance.
    ///
    /// For each consecutive waypoint pair the segment length is accumulated
    /// and consumed from the range tracker; the buffer check runs strictly
    /// after consumption, so a stop's `at_km` lies at or after the point
    /// where range first dipped below the buffer. At a decision point only
    /// the current waypoint is queried for chargers; a failed lookup is
    /// absorbed into the stop record (empty candidates plus diagnostic) and
    /// the trip continues. Every stop simulates a recharge to full.
    pub fn simulate(
        &self,
        route: &Route,
        profile: &VehicleProfile,
        start_soc_percent: f64,
    ) -> TripPlan {
        let mut tracker = RangeTracker::new(profile, start_soc_percent);
        let mut total_distance_km = 0.0;
        let mut stops = Vec::new();

        let waypoints = route.waypoints();
        let mut previous = waypoints[0];

        for &current in &waypoints[1..] {
            let segment_km = distance_km(previous, current);
            total_distance_km += segment_km;
            tracker.consume(segment_km);

            if tracker.is_below_buffer(self.params.buffer_km) {
                let (mut candidates, lookup_error) = match fetch_candidates(
                    self.directory,
                    &[current],
                    self.params.search_max_results,
                    self.params.search_radius_km,
                ) {
                    Ok(chargers) => (chargers, None),
                    Err(e) => (Vec::new(), Some(e.to_string())),
                };
                candidates.truncate(self.params.candidates_per_stop);

                stops.push(ChargingStop {
                    at_km: total_distance_km,
                    location: current,
                    candidates,
                    lookup_error,
                });

                // Recharge even when no candidates were found, so the rest
                // of the trip can still be assessed.
                tracker.recharge_full();
            }

            previous = current;
        }

        TripPlan {
            stops,
            total_distance_km,
        }
    }

    /// The simulation parameters in use.
    pub fn params(&self) -> &SimParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chargers::{AddressInfo, Connection, LookupError, Poi};
    use crate::geo::Waypoint;

    /// Directory stub returning one fixed charger for every query.
    struct OneChargerDirectory;

    impl ChargerDirectory for OneChargerDirectory {
        fn search(
            &self,
            latitude: f64,
            longitude: f64,
            _radius_km: f64,
            _max_results: usize,
        ) -> Result<Vec<Poi>, LookupError> {
            Ok(vec![Poi {
                id: 42,
                address: Some(AddressInfo {
                    title: Some("Stub Charger".into()),
                    latitude: Some(latitude),
                    longitude: Some(longitude),
                }),
                connections: vec![Connection {
                    power_kw: Some(50.0),
                }],
            }])
        }
    }

    struct FailingDirectory;

    impl ChargerDirectory for FailingDirectory {
        fn search(&self, _: f64, _: f64, _: f64, _: usize) -> Result<Vec<Poi>, LookupError> {
            Err(LookupError::Request("timed out".into()))
        }
    }

    fn straight_route(points: usize, step_deg: f64) -> Route {
        let waypoints: Vec<Waypoint> = (0..points)
            .map(|i| Waypoint::new(52.0 + step_deg * i as f64, -1.0))
            .collect();
        Route::new(waypoints).expect("test route has >= 2 waypoints")
    }

    fn profile(wh_per_km: f64, battery_kwh: f64) -> VehicleProfile {
        VehicleProfile {
            consumption_wh_per_km: wh_per_km,
            battery_kwh,
        }
    }

    #[test]
    fn short_trip_needs_no_stops() {
        // 2 segments of ~11.1 km each against ~266.7 km range.
        let route = straight_route(3, 0.1);
        let sim = TripSimulator::new(&OneChargerDirectory, SimParams::default());
        let plan = sim.simulate(&route, &profile(150.0, 40.0), 100.0);
        assert!(plan.stops.is_empty());
        assert!((plan.total_distance_km - 22.2).abs() < 0.5);
    }

    #[test]
    fn tiny_battery_stops_at_every_transition() {
        // 1 kWh at 150 Wh/km is ~6.7 km of range, less than one ~11.1 km
        // segment: the first transition stops, and even a full recharge
        // cannot cover the next segment, so every transition stops.
        let route = straight_route(3, 0.1);
        let sim = TripSimulator::new(&OneChargerDirectory, SimParams::default());
        let plan = sim.simulate(&route, &profile(150.0, 1.0), 100.0);
        assert_eq!(plan.stops.len(), 2);
        let at_km = plan.stops[0].at_km;
        assert!((at_km - 11.1).abs() < 0.5, "got {at_km}");
        assert_eq!(plan.stops[0].location, Waypoint::new(52.1, -1.0));
        assert_eq!(plan.stops[1].location, Waypoint::new(52.2, -1.0));
    }

    #[test]
    fn stop_at_km_never_exceeds_total() {
        let route = straight_route(30, 0.1);
        let sim = TripSimulator::new(&OneChargerDirectory, SimParams::default());
        let plan = sim.simulate(&route, &profile(150.0, 10.0), 80.0);
        assert!(!plan.stops.is_empty());
        for stop in &plan.stops {
            assert!(stop.at_km <= plan.total_distance_km + 1e-9);
        }
        // at_km values are strictly increasing along the route
        for pair in plan.stops.windows(2) {
            assert!(pair[0].at_km < pair[1].at_km);
        }
    }

    #[test]
    fn failed_lookup_records_stop_and_continues() {
        let route = straight_route(30, 0.1);
        let sim = TripSimulator::new(&FailingDirectory, SimParams::default());
        let plan = sim.simulate(&route, &profile(150.0, 10.0), 80.0);
        assert!(!plan.stops.is_empty());
        for stop in &plan.stops {
            assert!(stop.has_no_candidates());
            assert!(stop.lookup_error.is_some());
        }
        // The trip still runs to completion.
        assert!((plan.total_distance_km - 29.0 * 11.12).abs() < 1.0);
    }

    #[test]
    fn candidates_capped_per_stop() {
        struct ManyChargers;
        impl ChargerDirectory for ManyChargers {
            fn search(
                &self,
                latitude: f64,
                longitude: f64,
                _radius_km: f64,
                max_results: usize,
            ) -> Result<Vec<Poi>, LookupError> {
                Ok((0..max_results as i64)
                    .map(|i| Poi {
                        id: i,
                        address: Some(AddressInfo {
                            title: None,
                            latitude: Some(latitude),
                            longitude: Some(longitude),
                        }),
                        connections: vec![],
                    })
                    .collect())
            }
        }

        let route = straight_route(3, 0.1);
        let sim = TripSimulator::new(&ManyChargers, SimParams::default());
        let plan = sim.simulate(&route, &profile(150.0, 1.0), 100.0);
        // The tiny battery stops at both transitions; each stop's 5 fetched
        // candidates are capped to 3 in fetch order.
        assert_eq!(plan.stops.len(), 2);
        for stop in &plan.stops {
            assert_eq!(stop.candidates.len(), 3);
            assert_eq!(stop.candidates[0].id, 0);
        }
    }

    #[test]
    fn zero_buffer_with_ample_range_never_stops() {
        // With a zero buffer a stop requires strictly negative remaining
        // range; ample range must never trigger one.
        let route = straight_route(3, 0.1);
        let params = SimParams {
            buffer_km: 0.0,
            ..SimParams::default()
        };
        let sim = TripSimulator::new(&OneChargerDirectory, params);
        let plan = sim.simulate(&route, &profile(150.0, 40.0), 100.0);
        assert!(plan.stops.is_empty());
    }

    #[test]
    fn simulate_is_idempotent() {
        let route = straight_route(30, 0.1);
        let sim = TripSimulator::new(&OneChargerDirectory, SimParams::default());
        let p = profile(150.0, 10.0);
        let plan1 = sim.simulate(&route, &p, 80.0);
        let plan2 = sim.simulate(&route, &p, 80.0);
        assert_eq!(plan1.total_distance_km, plan2.total_distance_km);
        assert_eq!(plan1.stops.len(), plan2.stops.len());
        for (s1, s2) in plan1.stops.iter().zip(plan2.stops.iter()) {
            assert_eq!(s1.at_km, s2.at_km);
            assert_eq!(s1.location, s2.location);
            assert_eq!(s1.candidates, s2.candidates);
        }
    }
}
