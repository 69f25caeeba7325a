//! Simulation parameters and trip plan types.

use std::fmt;

use crate::chargers::Charger;
use crate::geo::Waypoint;

/// Tunable parameters for one trip simulation.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Minimum remaining range, in km, preserved before a stop is mandated.
    pub buffer_km: f64,
    /// Charger search radius around a decision point, in km.
    pub search_radius_km: f64,
    /// Maximum results requested per directory lookup.
    pub search_max_results: usize,
    /// Maximum charger candidates attached to each stop.
    pub candidates_per_stop: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            buffer_km: 20.0,
            search_radius_km: 5.0,
            search_max_results: 5,
            candidates_per_stop: 3,
        }
    }
}

/// One mandated charging stop, created at a decision point and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ChargingStop {
    /// Distance along the route where the stop was triggered, in km.
    pub at_km: f64,
    /// Waypoint at which the stop was triggered.
    pub location: Waypoint,
    /// Up to `candidates_per_stop` chargers, in fetch order.
    pub candidates: Vec<Charger>,
    /// Diagnostic from a failed charger lookup at this stop, if any.
    pub lookup_error: Option<String>,
}

impl ChargingStop {
    /// `true` when no charger candidates are known for this stop.
    pub fn has_no_candidates(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// The simulator's output artifact: ordered stops plus total distance.
#[derive(Debug, Clone)]
pub struct TripPlan {
    /// Charging stops in route order.
    pub stops: Vec<ChargingStop>,
    /// Total route distance in km (sum of consecutive segment lengths).
    pub total_distance_km: f64,
}

impl TripPlan {
    /// Number of stops with an empty candidate list.
    pub fn stops_without_candidates(&self) -> usize {
        self.stops.iter().filter(|s| s.has_no_candidates()).count()
    }

    /// `true` when every stop carries at least one charger candidate.
    pub fn fully_covered(&self) -> bool {
        self.stops_without_candidates() == 0
    }
}

impl fmt::Display for TripPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total route distance: {:.1} km", self.total_distance_km)?;
        if self.stops.is_empty() {
            return write!(f, "No charging stops needed for this trip.");
        }
        writeln!(f, "Charging stops needed: {}", self.stops.len())?;
        for (idx, stop) in self.stops.iter().enumerate() {
            writeln!(
                f,
                "Stop {}: at {:.1} km ({:.4}, {:.4})",
                idx + 1,
                stop.at_km,
                stop.location.latitude,
                stop.location.longitude
            )?;
            if stop.candidates.is_empty() {
                writeln!(f, "  No chargers found nearby!")?;
            }
            for (cidx, charger) in stop.candidates.iter().enumerate() {
                let name = charger.name.as_deref().unwrap_or("Unknown");
                match charger.max_power_kw {
                    Some(kw) => writeln!(
                        f,
                        "  Option {}: {} ({:.4}, {:.4}) up to {:.0} kW",
                        cidx + 1,
                        name,
                        charger.latitude,
                        charger.longitude,
                        kw
                    )?,
                    None => writeln!(
                        f,
                        "  Option {}: {} ({:.4}, {:.4})",
                        cidx + 1,
                        name,
                        charger.latitude,
                        charger.longitude
                    )?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(at_km: f64, candidates: usize) -> ChargingStop {
        ChargingStop {
            at_km,
            location: Waypoint::new(52.0, -1.0),
            candidates: (0..candidates)
                .map(|i| Charger {
                    id: i as i64,
                    name: Some(format!("C{i}")),
                    latitude: 52.0,
                    longitude: -1.0,
                    max_power_kw: Some(50.0),
                })
                .collect(),
            lookup_error: None,
        }
    }

    #[test]
    fn default_params_match_documented_values() {
        let p = SimParams::default();
        assert_eq!(p.buffer_km, 20.0);
        assert_eq!(p.search_radius_km, 5.0);
        assert_eq!(p.search_max_results, 5);
        assert_eq!(p.candidates_per_stop, 3);
    }

    #[test]
    fn coverage_accounting() {
        let plan = TripPlan {
            stops: vec![stop(50.0, 2), stop(120.0, 0), stop(200.0, 1)],
            total_distance_km: 250.0,
        };
        assert_eq!(plan.stops_without_candidates(), 1);
        assert!(!plan.fully_covered());
    }

    #[test]
    fn empty_plan_is_fully_covered() {
        let plan = TripPlan {
            stops: vec![],
            total_distance_km: 30.0,
        };
        assert!(plan.fully_covered());
    }

    #[test]
    fn display_does_not_panic() {
        let plan = TripPlan {
            stops: vec![stop(50.0, 2), stop(120.0, 0)],
            total_distance_km: 250.0,
        };
        let s = format!("{plan}");
        assert!(s.contains("Charging stops needed: 2"));
        assert!(s.contains("No chargers found nearby!"));
    }
}
