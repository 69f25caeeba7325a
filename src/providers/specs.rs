//! Vehicle specs from the upstream scaled-trip energy table.
//!
//! The out-of-scope scaling stage emits a CSV with one row per trip sample
//! (`Car Model`, `wh_per_km_raw` columns). The mean of a model's samples,
//! filtered to a configured plausibility range and multiplied by a configured
//! scaling factor, becomes that model's empirical consumption rate. When no
//! samples match, a configured fallback profile is used instead.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::config::ScalingConfig;
use crate::vehicle::VehicleProfile;

use super::{ProviderError, VehicleSpecSource};

/// Per-model raw consumption samples loaded from the scaled-trip CSV.
#[derive(Debug, Clone, Default)]
pub struct ScaledTripTable {
    /// Lower-cased model name to raw Wh/km samples.
    samples: HashMap<String, Vec<f64>>,
}

impl ScaledTripTable {
    /// Loads the table from a CSV file with `Car Model` and `wh_per_km_raw`
    /// columns. Rows with unparseable values are skipped, matching the
    /// upstream stage's tolerant reader.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Io` if the file cannot be opened or the CSV
    /// header is missing either column.
    pub fn from_csv_file(path: &Path) -> Result<Self, ProviderError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ProviderError::Io(format!("cannot open \"{}\": {e}", path.display())))?;
        Self::from_reader(file)
    }

    /// Loads the table from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Io` on CSV-level failures or missing columns.
    pub fn from_reader(reader: impl Read) -> Result<Self, ProviderError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| ProviderError::Io(format!("cannot read CSV header: {e}")))?
            .clone();

        let model_idx = headers
            .iter()
            .position(|h| h == "Car Model")
            .ok_or_else(|| ProviderError::Io("missing \"Car Model\" column".into()))?;
        let wh_idx = headers
            .iter()
            .position(|h| h == "wh_per_km_raw")
            .ok_or_else(|| ProviderError::Io("missing \"wh_per_km_raw\" column".into()))?;

        let mut samples: HashMap<String, Vec<f64>> = HashMap::new();
        for record in rdr.records() {
            let record =
                record.map_err(|e| ProviderError::Io(format!("bad CSV record: {e}")))?;
            let model = match record.get(model_idx) {
                Some(m) => m.trim().to_lowercase(),
                None => continue,
            };
            if let Some(Ok(wh)) = record.get(wh_idx).map(str::parse::<f64>) {
                samples.entry(model).or_default().push(wh);
            }
        }
        Ok(Self { samples })
    }

    /// Mean consumption for a model, filtered to the configured bounds and
    /// scaled. `None` when no sample survives the filter.
    ///
    /// Model matching is case-insensitive, as in the upstream stage.
    pub fn mean_wh_per_km(&self, model: &str, scaling: &ScalingConfig) -> Option<f64> {
        let samples = self.samples.get(&model.trim().to_lowercase())?;
        let kept: Vec<f64> = samples
            .iter()
            .copied()
            .filter(|&wh| wh > scaling.wh_per_km_min && wh < scaling.wh_per_km_max)
            .collect();
        if kept.is_empty() {
            return None;
        }
        let mean = kept.iter().sum::<f64>() / kept.len() as f64;
        Some(mean * scaling.scaling_factor)
    }

    /// Number of models with at least one sample.
    pub fn model_count(&self) -> usize {
        self.samples.len()
    }
}

/// Spec source backed by the scaled-trip table with a configured fallback.
///
/// The battery capacity always comes from the fallback profile — the trip
/// table only carries consumption samples.
#[derive(Debug, Clone)]
pub struct CsvSpecSource {
    table: ScaledTripTable,
    scaling: ScalingConfig,
    fallback: VehicleProfile,
}

impl CsvSpecSource {
    /// Creates a source over a loaded table.
    pub fn new(table: ScaledTripTable, scaling: ScalingConfig, fallback: VehicleProfile) -> Self {
        Self {
            table,
            scaling,
            fallback,
        }
    }
}

impl VehicleSpecSource for CsvSpecSource {
    fn get_specs(&self, model: &str) -> Result<VehicleProfile, ProviderError> {
        match self.table.mean_wh_per_km(model, &self.scaling) {
            Some(wh_per_km) => VehicleProfile::new(wh_per_km, self.fallback.battery_kwh)
                .map_err(|e| ProviderError::Malformed(e.to_string())),
            None => Ok(self.fallback),
        }
    }
}
