//! Vehicle energy profile.

use std::fmt;

/// Error constructing a vehicle profile from non-positive parameters.
#[derive(Debug)]
pub enum ProfileError {
    /// Consumption rate must be strictly positive (Wh/km).
    NonPositiveConsumption(f64),
    /// Battery capacity must be strictly positive (kWh).
    NonPositiveCapacity(f64),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::NonPositiveConsumption(v) => {
                write!(f, "profile error: consumption_wh_per_km must be > 0, got {v}")
            }
            ProfileError::NonPositiveCapacity(v) => {
                write!(f, "profile error: battery_kwh must be > 0, got {v}")
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// Per-vehicle energy parameters, immutable for the duration of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Average energy consumption in watt-hours per kilometre.
    pub consumption_wh_per_km: f64,
    /// Total battery capacity in kilowatt-hours.
    pub battery_kwh: f64,
}

impl VehicleProfile {
    /// Creates a profile, rejecting non-positive consumption or capacity.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` naming the offending field. These are fatal
    /// at the caller: a simulation never starts with an invalid profile.
    pub fn new(consumption_wh_per_km: f64, battery_kwh: f64) -> Result<Self, ProfileError> {
        if consumption_wh_per_km <= 0.0 || consumption_wh_per_km.is_nan() {
            return Err(ProfileError::NonPositiveConsumption(consumption_wh_per_km));
        }
        if battery_kwh <= 0.0 || battery_kwh.is_nan() {
            return Err(ProfileError::NonPositiveCapacity(battery_kwh));
        }
        Ok(Self {
            consumption_wh_per_km,
            battery_kwh,
        })
    }

    /// Range in kilometres at 100% state of charge.
    pub fn full_range_km(&self) -> f64 {
        self.battery_kwh * 1000.0 / self.consumption_wh_per_km
    }

    /// Range in kilometres at the given state of charge in percent.
    ///
    /// The percentage is not clamped: callers supplying out-of-range values
    /// get a correspondingly out-of-range result, which surfaces the caller
    /// error instead of hiding it.
    pub fn range_at_soc_km(&self, soc_percent: f64) -> f64 {
        self.battery_kwh * 1000.0 * (soc_percent / 100.0) / self.consumption_wh_per_km
    }
}
