//! Open Charge Map directory client (feature `online`).

use crate::chargers::{ChargerDirectory, LookupError, Poi};

/// Blocking Open Charge Map client.
///
/// Implements [`ChargerDirectory`] over the `/v3/poi/` endpoint. The API key
/// is injected at construction. Lookups are performed inline; timeouts and
/// transport failures surface as [`LookupError`] values that the simulator
/// absorbs per stop.
pub struct OcmDirectory {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OcmDirectory {
    /// Creates a client against the given base URL.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl ChargerDirectory for OcmDirectory {
    fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        max_results: usize,
    ) -> Result<Vec<Poi>, LookupError> {
        let url = format!("{}/v3/poi/", self.base_url);
        self.client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("latitude", &latitude.to_string()),
                ("longitude", &longitude.to_string()),
                ("distance", &radius_km.to_string()),
                ("distanceunit", "KM"),
                ("maxresults", &max_results.to_string()),
            ])
            .send()
            .map_err(|e| LookupError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| LookupError::Request(e.to_string()))?
            .json()
            .map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poi_list_parses_from_ocm_payload() {
        let json = r#"[
            {
                "ID": 1001,
                "AddressInfo": {"Title": "A", "Latitude": 52.0, "Longitude": -1.0},
                "Connections": [{"PowerKW": 7.0}]
            },
            {
                "ID": 1002,
                "AddressInfo": {"Title": "B", "Latitude": 52.1, "Longitude": -1.1},
                "Connections": []
            }
        ]"#;
        let pois: Vec<Poi> = serde_json::from_str(json).expect("OCM payload should parse");
        assert_eq!(pois.len(), 2);
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let dir = OcmDirectory::new("https://example.test/", "k");
        assert_eq!(dir.base_url, "https://example.test");
    }
}
