//! Route waypoint CSV loading.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::geo::{Route, RouteError, Waypoint};

/// Error loading a route from CSV.
#[derive(Debug)]
pub enum ImportError {
    /// The file could not be opened or read.
    Io(String),
    /// A row did not carry two parseable coordinates.
    BadRow(String),
    /// The parsed waypoints do not form a valid route.
    Route(RouteError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(msg) => write!(f, "route import failed: {msg}"),
            ImportError::BadRow(msg) => write!(f, "route import failed: {msg}"),
            ImportError::Route(e) => write!(f, "route import failed: {e}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Loads a route from a CSV file with `latitude,longitude` rows.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read, a row is malformed,
/// or fewer than two waypoints result.
pub fn load_route_csv(path: &Path) -> Result<Route, ImportError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ImportError::Io(format!("cannot open \"{}\": {e}", path.display())))?;
    read_route_csv(file)
}

/// Reads a route from any CSV reader with `latitude,longitude` rows.
///
/// # Errors
///
/// Same conditions as [`load_route_csv`].
pub fn read_route_csv(reader: impl Read) -> Result<Route, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let mut waypoints = Vec::new();
    for result in rdr.deserialize() {
        let waypoint: Waypoint = result.map_err(|e| ImportError::BadRow(e.to_string()))?;
        waypoints.push(waypoint);
    }
    Route::new(waypoints).map_err(ImportError::Route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_waypoint_rows() {
        let csv = "latitude,longitude\n52.0,-1.0\n52.1,-1.0\n52.2,-1.0\n";
        let route = read_route_csv(csv.as_bytes()).expect("fixture route parses");
        assert_eq!(route.len(), 3);
        assert_eq!(route.start(), Waypoint::new(52.0, -1.0));
    }

    #[test]
    fn rejects_single_waypoint() {
        let csv = "latitude,longitude\n52.0,-1.0\n";
        assert!(matches!(
            read_route_csv(csv.as_bytes()),
            Err(ImportError::Route(_))
        ));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let csv = "latitude,longitude\n52.0,-1.0\nnorth,-1.1\n";
        assert!(matches!(
            read_route_csv(csv.as_bytes()),
            Err(ImportError::BadRow(_))
        ));
    }
}
