//! External collaborator interfaces: routing, vehicle specs, directories.

use std::fmt;

use crate::geo::Route;
use crate::vehicle::VehicleProfile;

pub mod specs;
pub mod static_dir;

#[cfg(feature = "online")]
pub mod ocm;
#[cfg(feature = "online")]
pub mod ors;

/// Error from a route or vehicle-spec provider.
#[derive(Debug)]
pub enum ProviderError {
    /// Geocoding produced no result for the given query.
    Geocode(String),
    /// The routing service returned no route.
    NoRoute,
    /// An HTTP request failed.
    Http(String),
    /// A response did not have the expected shape.
    Malformed(String),
    /// No specs are known for the requested vehicle model.
    UnknownModel(String),
    /// Reading a local data file failed.
    Io(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Geocode(q) => write!(f, "no geocoding result for \"{q}\""),
            ProviderError::NoRoute => write!(f, "routing service returned no route"),
            ProviderError::Http(msg) => write!(f, "provider request failed: {msg}"),
            ProviderError::Malformed(msg) => write!(f, "malformed provider response: {msg}"),
            ProviderError::UnknownModel(m) => write!(f, "no specs known for model \"{m}\""),
            ProviderError::Io(msg) => write!(f, "provider data error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Produces an ordered route for a start/destination pair.
///
/// How geocoding and routing happen is the implementation's business; the
/// simulator only consumes the resulting waypoint sequence.
pub trait RouteProvider {
    /// Resolves start and destination (postcodes or free-form queries) into
    /// a route.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` if geocoding or routing fails.
    fn get_route(&self, start: &str, dest: &str) -> Result<Route, ProviderError>;
}

/// Supplies a vehicle energy profile for a model name.
pub trait VehicleSpecSource {
    /// Looks up (or derives) the profile for the given model.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` if no profile can be produced.
    fn get_specs(&self, model: &str) -> Result<VehicleProfile, ProviderError>;
}
