//! OpenRouteService geocoding and directions client (feature `online`).

use serde::Deserialize;

use crate::geo::{Route, Waypoint};

use super::{ProviderError, RouteProvider};

/// Blocking OpenRouteService client.
///
/// The API key is injected at construction; requests are performed inline
/// since route retrieval happens once per planned trip.
pub struct OrsRouteProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// `[longitude, latitude]`, GeoJSON order.
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
struct DirectionsFeature {
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    /// `[longitude, latitude]` pairs along the route.
    coordinates: Vec<[f64; 2]>,
}

impl OrsRouteProvider {
    /// Creates a client against the given base URL with a country-bounded
    /// geocoder.
    pub fn new(base_url: &str, api_key: &str, country: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            country: country.to_string(),
        }
    }

    /// Geocodes a postcode or free-form query to a waypoint.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Geocode` when no feature matches, or
    /// `ProviderError::Http` on request failure.
    pub fn geocode(&self, query: &str) -> Result<Waypoint, ProviderError> {
        let url = format!("{}/geocode/search", self.base_url);
        let response: GeocodeResponse = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("text", query),
                ("boundary.country", self.country.as_str()),
            ])
            .send()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .json()
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let feature = response
            .features
            .first()
            .ok_or_else(|| ProviderError::Geocode(query.to_string()))?;
        let [lon, lat] = feature.geometry.coordinates;
        Ok(Waypoint::new(lat, lon))
    }

    /// Requests a driving route between two waypoints.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NoRoute` when the service returns no
    /// geometry, or `ProviderError::Http`/`Malformed` on transport and
    /// decoding failures.
    pub fn directions(&self, start: Waypoint, dest: Waypoint) -> Result<Route, ProviderError> {
        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        let body = serde_json::json!({
            "coordinates": [
                [start.longitude, start.latitude],
                [dest.longitude, dest.latitude],
            ],
        });

        let response: DirectionsResponse = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.to_string()))?
            .json()
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let feature = response.features.first().ok_or(ProviderError::NoRoute)?;
        let waypoints: Vec<Waypoint> = feature
            .geometry
            .coordinates
            .iter()
            .map(|&[lon, lat]| Waypoint::new(lat, lon))
            .collect();
        Route::new(waypoints).map_err(|_| ProviderError::NoRoute)
    }
}

impl RouteProvider for OrsRouteProvider {
    fn get_route(&self, start: &str, dest: &str) -> Result<Route, ProviderError> {
        let start_coords = self.geocode(start)?;
        let dest_coords = self.geocode(dest)?;
        self.directions(start_coords, dest_coords)
    }
}
