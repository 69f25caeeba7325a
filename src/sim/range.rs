//! Remaining-range accounting for one simulated trip.

use crate::vehicle::VehicleProfile;

/// Stateful remaining-range accumulator for one simulation run.
///
/// Range is derived from usable battery energy divided by the consumption
/// rate: `battery_kwh * 1000 * soc_fraction / consumption_wh_per_km`. The
/// tracker applies no floor — remaining range may go negative after a
/// segment, signalling the vehicle would have stranded before the decision
/// check fires.
#[derive(Debug, Clone)]
pub struct RangeTracker {
    consumption_wh_per_km: f64,
    battery_kwh: f64,
    remaining_range_km: f64,
}

impl RangeTracker {
    /// Creates a tracker initialized from the profile at the given state of
    /// charge in percent.
    ///
    /// The percentage is expected in [0, 100] but is not clamped; an
    /// out-of-range value yields a correspondingly out-of-range (possibly
    /// negative) initial range, surfacing the caller error.
    pub fn new(profile: &VehicleProfile, soc_percent: f64) -> Self {
        Self {
            consumption_wh_per_km: profile.consumption_wh_per_km,
            battery_kwh: profile.battery_kwh,
            remaining_range_km: profile.range_at_soc_km(soc_percent),
        }
    }

    /// Deducts a driven segment from the remaining range. No floor.
    pub fn consume(&mut self, segment_km: f64) {
        self.remaining_range_km -= segment_km;
    }

    /// `true` when remaining range has dropped strictly below the buffer.
    pub fn is_below_buffer(&self, buffer_km: f64) -> bool {
        self.remaining_range_km < buffer_km
    }

    /// Resets remaining range to a 100% state of charge.
    ///
    /// Charge duration, target SOC, and charger power are not modelled.
    pub fn recharge_full(&mut self) {
        self.remaining_range_km = self.battery_kwh * 1000.0 / self.consumption_wh_per_km;
    }

    /// Current remaining range in kilometres.
    pub fn remaining_range_km(&self) -> f64 {
        self.remaining_range_km
    }
}
