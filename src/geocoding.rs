//! Reverse geocoding and nearby places
//!
//! The response parsing is plain data handling and always compiled. The
//! Nominatim HTTP client lives behind the `api` feature. Failures never reach
//! callers: every lookup degrades to "all absent".

use serde::Serialize;
use serde_json::{Map, Value};

/// Address components promoted to landmarks, in order (`town` only without `city`)
const LANDMARK_KEYS: [&str; 2] = ["road", "suburb"];

/// Address component keys that name a point of interest
const PLACE_KEYS: [&str; 5] = ["amenity", "tourism", "shop", "leisure", "building"];

/// Bounding-box search results considered for nearby places
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Cap on distinct nearby place names
pub const MAX_NEARBY_PLACES: usize = 10;

/// Rough meters per degree used for the search viewbox
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Outcome of a reverse lookup. `Default` is the "nothing known" result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub address: Option<String>,
    pub landmarks: Vec<String>,
    pub postal_code: Option<String>,
    /// Provider address object, passed through untouched
    pub raw_components: Map<String, Value>,
}

impl GeocodeResult {
    /// Parse a Nominatim `/reverse?format=json` response body
    pub fn from_nominatim(body: &Value) -> Self {
        let address = body
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown location")
            .to_string();

        let raw_components = body
            .get("address")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let landmarks = landmarks_from_components(&raw_components);
        let postal_code = component(&raw_components, "postcode").map(str::to_string);

        Self {
            address: Some(address),
            landmarks,
            postal_code,
            raw_components,
        }
    }

    /// Selected components for location detail responses
    pub fn components(&self) -> AddressComponents {
        let get = |key: &str| component(&self.raw_components, key).map(str::to_string);
        AddressComponents {
            road: get("road"),
            suburb: get("suburb"),
            city: get("city").or_else(|| get("town")),
            state: get("state"),
            country: get("country"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressComponents {
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

fn component<'a>(components: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    components.get(key).and_then(Value::as_str)
}

/// Road, suburb, then city (or town when there is no city)
pub fn landmarks_from_components(components: &Map<String, Value>) -> Vec<String> {
    let mut landmarks: Vec<String> = LANDMARK_KEYS
        .iter()
        .filter_map(|key| component(components, key))
        .map(str::to_string)
        .collect();

    if let Some(place) = component(components, "city").or_else(|| component(components, "town")) {
        landmarks.push(place.to_string());
    }
    landmarks
}

/// Combine point-of-interest components with bounding-box search hits.
///
/// Search hits contribute the first comma-separated segment of their
/// `display_name`. Duplicates are dropped keeping first occurrence.
pub fn nearby_place_names(components: &Map<String, Value>, search_results: &[Value]) -> Vec<String> {
    let from_components = components
        .iter()
        .filter(|(key, _)| PLACE_KEYS.contains(&key.as_str()))
        .filter_map(|(_, value)| value.as_str());

    let from_search = search_results
        .iter()
        .take(MAX_SEARCH_RESULTS)
        .filter_map(|place| place.get("display_name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .filter_map(|name| name.split(',').next());

    let mut places: Vec<String> = Vec::new();
    for name in from_components.chain(from_search) {
        if !places.iter().any(|p| p == name) {
            places.push(name.to_string());
        }
    }
    places.truncate(MAX_NEARBY_PLACES);
    places
}

/// Nominatim viewbox `left,top,right,bottom` around a point
pub fn search_viewbox(lat: f64, lon: f64, radius_m: f64) -> String {
    let offset = radius_m / METERS_PER_DEGREE;
    format!("{},{},{},{}", lon - offset, lat + offset, lon + offset, lat - offset)
}

// ============================================================================
// Nominatim Client
// ============================================================================

#[cfg(feature = "api")]
use std::time::Duration;

#[cfg(feature = "api")]
const USER_AGENT: &str = "DigitalPlanterApp/1.0";

/// Reverse geocoding against a Nominatim endpoint.
///
/// Waits a fixed delay before every outbound request.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    delay: Duration,
}

#[cfg(feature = "api")]
impl NominatimClient {
    pub fn new(base_url: &str, delay: Duration, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay,
        })
    }

    pub fn from_config(config: &crate::config::Config) -> anyhow::Result<Self> {
        Self::new(
            &config.geocoder_url,
            Duration::from_millis(config.geocoder_delay_ms),
            Duration::from_millis(config.geocoder_timeout_ms),
        )
    }

    /// Address, landmarks and postal code for a point; all absent on failure
    pub async fn reverse(&self, lat: f64, lon: f64) -> GeocodeResult {
        let url = format!("{}/reverse?lat={}&lon={}&format=json", self.base_url, lat, lon);
        match self.get_json(&url).await {
            Ok(body) => GeocodeResult::from_nominatim(&body),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed for ({}, {}): {}", lat, lon, e);
                GeocodeResult::default()
            }
        }
    }

    /// Up to 10 distinct place names around a point; empty on failure
    pub async fn nearby_places(&self, lat: f64, lon: f64, radius_m: f64) -> Vec<String> {
        match self.try_nearby_places(lat, lon, radius_m).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("Nearby place lookup failed for ({}, {}): {}", lat, lon, e);
                Vec::new()
            }
        }
    }

    async fn try_nearby_places(&self, lat: f64, lon: f64, radius_m: f64) -> anyhow::Result<Vec<String>> {
        let reverse_url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&extratags=1",
            self.base_url, lat, lon
        );
        let body = self.get_json(&reverse_url).await?;
        let components = body
            .get("address")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let search_url = format!(
            "{}/search?format=json&limit=10&bounded=1&viewbox={}",
            self.base_url,
            search_viewbox(lat, lon, radius_m)
        );
        // A failed box search still leaves the component names
        let search_results = match self.get_json(&search_url).await {
            Ok(Value::Array(results)) => results,
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::debug!("Bounding box search failed: {}", e);
                Vec::new()
            }
        };

        Ok(nearby_place_names(&components, &search_results))
    }

    async fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!("GET {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_nominatim() {
        let body = json!({
            "display_name": "Lodhi Road, Lodhi Colony, New Delhi, 110003, India",
            "address": {
                "road": "Lodhi Road",
                "suburb": "Lodhi Colony",
                "city": "New Delhi",
                "town": "Ignored",
                "postcode": "110003",
                "country": "India"
            }
        });

        let result = GeocodeResult::from_nominatim(&body);
        assert_eq!(result.address.as_deref(), Some("Lodhi Road, Lodhi Colony, New Delhi, 110003, India"));
        assert_eq!(result.landmarks, vec!["Lodhi Road", "Lodhi Colony", "New Delhi"]);
        assert_eq!(result.postal_code.as_deref(), Some("110003"));
        assert_eq!(result.raw_components["country"], "India");

        let components = result.components();
        assert_eq!(components.city.as_deref(), Some("New Delhi"));
        assert_eq!(components.state, None);
    }

    #[test]
    fn test_town_used_without_city() {
        let body = json!({"address": {"town": "Ooty"}});
        let result = GeocodeResult::from_nominatim(&body);

        assert_eq!(result.address.as_deref(), Some("Unknown location"));
        assert_eq!(result.landmarks, vec!["Ooty"]);
        assert_eq!(result.components().city.as_deref(), Some("Ooty"));
    }

    #[test]
    fn test_default_is_all_absent() {
        let result = GeocodeResult::default();
        assert!(result.address.is_none());
        assert!(result.landmarks.is_empty());
        assert!(result.postal_code.is_none());
        assert!(result.raw_components.is_empty());
    }

    #[test]
    fn test_nearby_place_names() {
        let components = json!({
            "amenity": "Cafe Verde",
            "road": "Not a place",
            "leisure": "City Park"
        });
        let search: Vec<Value> = vec![
            json!({"display_name": "City Park, Downtown, Springfield"}),
            json!({"display_name": "Public Library, Main St"}),
            json!({"name": "no display name"}),
            json!({"display_name": ""}),
            json!({"display_name": "Museum, Elm St"}),
            json!({"display_name": "Beyond the first five, X"}),
        ];

        let places = nearby_place_names(components.as_object().unwrap(), &search);
        assert_eq!(places, vec!["Cafe Verde", "City Park", "Public Library", "Museum"]);
    }

    #[test]
    fn test_nearby_place_names_capped() {
        let mut components = Map::new();
        for key in PLACE_KEYS {
            components.insert(key.to_string(), Value::from(format!("{} place", key)));
        }
        let search: Vec<Value> = (0..5)
            .map(|i| json!({"display_name": format!("Spot {}, Town", i)}))
            .collect();

        let places = nearby_place_names(&components, &search);
        assert_eq!(places.len(), MAX_NEARBY_PLACES);
    }

    #[test]
    fn test_search_viewbox() {
        assert_eq!(search_viewbox(0.0, 0.0, 111_000.0), "-1,1,1,-1");
    }
}
