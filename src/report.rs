//! Post-hoc trip summaries derived from a completed plan.

use std::fmt;

use crate::sim::types::TripPlan;
use crate::vehicle::VehicleProfile;

/// Range estimate for a vehicle at a given state of charge.
#[derive(Debug, Clone)]
pub struct RangeEstimate {
    /// Total battery capacity in kWh.
    pub battery_kwh: f64,
    /// Usable energy at the given SOC, in Wh.
    pub usable_wh: f64,
    /// Average consumption in Wh/km.
    pub consumption_wh_per_km: f64,
    /// Estimated range in km.
    pub est_range_km: f64,
}

impl RangeEstimate {
    /// Computes the estimate from a profile and a SOC percentage.
    pub fn new(profile: &VehicleProfile, soc_percent: f64) -> Self {
        let usable_wh = profile.battery_kwh * 1000.0 * (soc_percent / 100.0);
        Self {
            battery_kwh: profile.battery_kwh,
            usable_wh,
            consumption_wh_per_km: profile.consumption_wh_per_km,
            est_range_km: profile.range_at_soc_km(soc_percent),
        }
    }
}

impl fmt::Display for RangeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Battery: {:.1} kWh, Usable: {:.1} kWh",
            self.battery_kwh,
            self.usable_wh / 1000.0
        )?;
        writeln!(
            f,
            "Average consumption: {:.1} Wh/km",
            self.consumption_wh_per_km
        )?;
        write!(f, "Estimated range: {:.1} km", self.est_range_km)
    }
}

/// Aggregate summary of a planned trip.
///
/// Computed post-hoc from the plan so report figures always agree with the
/// stop records. Distinguishes a fully covered plan from one where some
/// stops have no known chargers, so residual risk is visible to the reader.
#[derive(Debug, Clone)]
pub struct TripReport {
    /// Total route distance in km.
    pub total_distance_km: f64,
    /// Number of charging stops planned.
    pub stop_count: usize,
    /// Stops with an empty candidate list.
    pub stops_without_candidates: usize,
    /// Stops whose charger lookup failed outright.
    pub lookup_failures: usize,
}

impl TripReport {
    /// Builds the report from a completed plan.
    pub fn from_plan(plan: &TripPlan) -> Self {
        Self {
            total_distance_km: plan.total_distance_km,
            stop_count: plan.stops.len(),
            stops_without_candidates: plan.stops_without_candidates(),
            lookup_failures: plan
                .stops
                .iter()
                .filter(|s| s.lookup_error.is_some())
                .count(),
        }
    }

    /// `true` when every planned stop has at least one charger candidate.
    pub fn fully_covered(&self) -> bool {
        self.stops_without_candidates == 0
    }
}

impl fmt::Display for TripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Trip Report ---")?;
        writeln!(f, "Total distance:    {:.1} km", self.total_distance_km)?;
        writeln!(f, "Charging stops:    {}", self.stop_count)?;
        if self.stop_count == 0 {
            return write!(f, "Destination is reachable without charging.");
        }
        if self.fully_covered() {
            write!(f, "All stops have charger candidates.")?;
        } else {
            write!(
                f,
                "{} of {} stops have no known chargers!",
                self.stops_without_candidates, self.stop_count
            )?;
        }
        if self.lookup_failures > 0 {
            write!(f, " ({} lookup failures)", self.lookup_failures)?;
        }
        Ok(())
    }
}
