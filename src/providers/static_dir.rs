//! Offline charger directory backed by a local charger list.
//!
//! Serves [`ChargerDirectory`] lookups from an in-memory list with a manual
//! great-circle radius search, so trips can be planned without network
//! access. The list can be loaded from a CSV export
//! (`id,name,latitude,longitude,max_power_kw`).

use std::io::Read;
use std::path::Path;

use crate::chargers::{AddressInfo, Charger, ChargerDirectory, Connection, LookupError, Poi};
use crate::geo::{Waypoint, distance_km};

use super::ProviderError;

/// In-memory charger directory with haversine radius search.
#[derive(Debug, Clone, Default)]
pub struct StaticChargerDirectory {
    chargers: Vec<Charger>,
}

impl StaticChargerDirectory {
    /// Creates a directory over the given charger list.
    pub fn new(chargers: Vec<Charger>) -> Self {
        Self { chargers }
    }

    /// Loads a directory from a CSV file with columns
    /// `id,name,latitude,longitude,max_power_kw` (power may be empty).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Io` if the file cannot be opened or a row is
    /// malformed.
    pub fn from_csv_file(path: &Path) -> Result<Self, ProviderError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ProviderError::Io(format!("cannot open \"{}\": {e}", path.display())))?;
        Self::from_reader(file)
    }

    /// Loads a directory from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Io` on CSV-level failures.
    pub fn from_reader(reader: impl Read) -> Result<Self, ProviderError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let mut chargers = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| ProviderError::Io(format!("bad CSV record: {e}")))?;

            let id: i64 = record
                .get(0)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| ProviderError::Io("charger row missing id".into()))?;
            let name = record
                .get(1)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            let latitude: f64 = record
                .get(2)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| ProviderError::Io("charger row missing latitude".into()))?;
            let longitude: f64 = record
                .get(3)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| ProviderError::Io("charger row missing longitude".into()))?;
            let max_power_kw = record.get(4).and_then(|v| v.parse().ok());

            chargers.push(Charger {
                id,
                name,
                latitude,
                longitude,
                max_power_kw,
            });
        }
        Ok(Self { chargers })
    }

    /// Number of chargers in the directory.
    pub fn len(&self) -> usize {
        self.chargers.len()
    }

    /// `true` when the directory holds no chargers.
    pub fn is_empty(&self) -> bool {
        self.chargers.is_empty()
    }
}

impl ChargerDirectory for StaticChargerDirectory {
    /// Manual nearest-point search: filter by radius, sort by distance to
    /// the query point, truncate, and re-emit as raw POI records.
    fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        max_results: usize,
    ) -> Result<Vec<Poi>, LookupError> {
        let query = Waypoint::new(latitude, longitude);
        let mut within: Vec<(f64, &Charger)> = self
            .chargers
            .iter()
            .map(|c| (distance_km(query, Waypoint::new(c.latitude, c.longitude)), c))
            .filter(|(d, _)| *d <= radius_km)
            .collect();
        within.sort_by(|a, b| a.0.total_cmp(&b.0));
        within.truncate(max_results);

        Ok(within
            .into_iter()
            .map(|(_, c)| Poi {
                id: c.id,
                address: Some(AddressInfo {
                    title: c.name.clone(),
                    latitude: Some(c.latitude),
                    longitude: Some(c.longitude),
                }),
                connections: match c.max_power_kw {
                    Some(kw) => vec![Connection { power_kw: Some(kw) }],
                    None => vec![],
                },
            })
            .collect())
    }
}
