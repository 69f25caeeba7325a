//! TOML-based planner configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level planner configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`PlannerConfig::from_toml_file`] or use
/// [`PlannerConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Vehicle energy parameters.
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Trip parameters: starting charge and safety buffer.
    #[serde(default)]
    pub trip: TripConfig,
    /// Charger search parameters.
    #[serde(default)]
    pub search: SearchConfig,
    /// Consumption-sample filtering for the scaled-trip table.
    #[serde(default)]
    pub scaling: ScalingConfig,
    /// External provider endpoints and credentials.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Vehicle energy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleConfig {
    /// Model name, used to look up empirical consumption data.
    pub model: String,
    /// Average consumption (Wh/km), used when no empirical data matches.
    pub consumption_wh_per_km: f64,
    /// Battery capacity (kWh).
    pub battery_kwh: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            model: "JAC iEV7s".to_string(),
            consumption_wh_per_km: 160.0,
            battery_kwh: 42.8,
        }
    }
}

/// Trip parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TripConfig {
    /// Starting state of charge (percent, 0-100].
    pub start_soc_percent: f64,
    /// Minimum remaining range preserved before a stop is mandated (km).
    pub buffer_km: f64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            start_soc_percent: 80.0,
            buffer_km: 20.0,
        }
    }
}

/// Charger search parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Search radius around a decision point (km).
    pub radius_km: f64,
    /// Maximum results per directory lookup.
    pub max_results: usize,
    /// Maximum candidates attached to each stop.
    pub candidates_per_stop: usize,
    /// Interior sample count for route-overview lookups.
    pub route_sample_points: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: 5.0,
            max_results: 5,
            candidates_per_stop: 3,
            route_sample_points: 6,
        }
    }
}

/// Consumption-sample filtering for the scaled-trip table.
///
/// The per-model Wh/km samples in the scaled-trip CSV are filtered to
/// `(wh_per_km_min, wh_per_km_max)` and the mean is multiplied by
/// `scaling_factor`. Both bounds are configuration, not code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalingConfig {
    /// Lower bound (exclusive) on accepted Wh/km samples.
    pub wh_per_km_min: f64,
    /// Upper bound (exclusive) on accepted Wh/km samples.
    pub wh_per_km_max: f64,
    /// Multiplier applied to the filtered mean.
    pub scaling_factor: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            wh_per_km_min: 30.0,
            wh_per_km_max: 350.0,
            scaling_factor: 1.0,
        }
    }
}

/// External provider endpoints and credentials.
///
/// API keys live here, supplied at construction time, never embedded in the
/// planner itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    /// OpenRouteService API key.
    pub ors_api_key: String,
    /// OpenRouteService base URL.
    pub ors_base_url: String,
    /// Open Charge Map API key.
    pub ocm_api_key: String,
    /// Open Charge Map base URL.
    pub ocm_base_url: String,
    /// ISO country code bound on geocoding results.
    pub geocode_country: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            ors_api_key: String::new(),
            ors_base_url: "https://api.openrouteservice.org".to_string(),
            ocm_api_key: String::new(),
            ocm_base_url: "https://api.openchargemap.io".to_string(),
            geocode_country: "GB".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"vehicle.battery_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PlannerConfig {
    /// Returns the baseline scenario: the compact-SUV defaults above.
    pub fn baseline() -> Self {
        Self {
            vehicle: VehicleConfig::default(),
            trip: TripConfig::default(),
            search: SearchConfig::default(),
            scaling: ScalingConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }

    /// Returns the city-runabout preset: small battery, frugal consumption,
    /// tight urban charger search.
    pub fn city_runabout() -> Self {
        Self {
            vehicle: VehicleConfig {
                model: "City Runabout".to_string(),
                consumption_wh_per_km: 120.0,
                battery_kwh: 24.0,
            },
            trip: TripConfig {
                buffer_km: 10.0,
                ..TripConfig::default()
            },
            search: SearchConfig {
                radius_km: 2.0,
                ..SearchConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the motorway-saloon preset: big battery, thirstier at speed,
    /// wider charger search and a generous buffer.
    pub fn motorway_saloon() -> Self {
        Self {
            vehicle: VehicleConfig {
                model: "Motorway Saloon".to_string(),
                consumption_wh_per_km: 200.0,
                battery_kwh: 77.0,
            },
            trip: TripConfig {
                start_soc_percent: 100.0,
                buffer_km: 35.0,
            },
            search: SearchConfig {
                radius_km: 10.0,
                max_results: 8,
                ..SearchConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "city_runabout", "motorway_saloon"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "city_runabout" => Ok(Self::city_runabout()),
            "motorway_saloon" => Ok(Self::motorway_saloon()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let v = &self.vehicle;
        if v.consumption_wh_per_km <= 0.0 {
            errors.push(ConfigError {
                field: "vehicle.consumption_wh_per_km".into(),
                message: "must be > 0".into(),
            });
        }
        if v.battery_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "vehicle.battery_kwh".into(),
                message: "must be > 0".into(),
            });
        }

        let t = &self.trip;
        if !(t.start_soc_percent > 0.0 && t.start_soc_percent <= 100.0) {
            errors.push(ConfigError {
                field: "trip.start_soc_percent".into(),
                message: "must be in (0, 100]".into(),
            });
        }
        if t.buffer_km < 0.0 {
            errors.push(ConfigError {
                field: "trip.buffer_km".into(),
                message: "must be >= 0".into(),
            });
        }

        let s = &self.search;
        if s.radius_km <= 0.0 {
            errors.push(ConfigError {
                field: "search.radius_km".into(),
                message: "must be > 0".into(),
            });
        }
        if s.max_results == 0 {
            errors.push(ConfigError {
                field: "search.max_results".into(),
                message: "must be > 0".into(),
            });
        }
        if s.candidates_per_stop == 0 {
            errors.push(ConfigError {
                field: "search.candidates_per_stop".into(),
                message: "must be > 0".into(),
            });
        }

        let sc = &self.scaling;
        if sc.wh_per_km_min >= sc.wh_per_km_max {
            errors.push(ConfigError {
                field: "scaling.wh_per_km_min".into(),
                message: "must be < scaling.wh_per_km_max".into(),
            });
        }
        if sc.scaling_factor <= 0.0 {
            errors.push(ConfigError {
                field: "scaling.scaling_factor".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
