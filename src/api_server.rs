// Axum API Server Module
//
// Purpose: JSON endpoints over the plant registry, reverse geocoding and sharing helpers.
// Coordinates are validated here; the core assumes well-formed numbers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::RegistryError;
use crate::geocoding::NominatimClient;
use crate::plant::{Coordinates, NewPlant, PlantKind};
use crate::registry::PlantRegistry;
use crate::share::{format_coordinates, map_link, share_text, social_posts};
use crate::storage::JsonFileStore;

const DEFAULT_SEARCH_RADIUS_M: u32 = 500;
const DEFAULT_SHARE_LABEL: &str = "Shared Location";

// ============================================================================
// Application State
// ============================================================================

/// Shared handler state.
///
/// The registry sits behind one RwLock: mutations hold the write lock across
/// the in-memory change and the snapshot save.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<PlantRegistry>>,
    pub geocoder: Arc<NominatimClient>,
}

impl AppState {
    pub fn new(registry: PlantRegistry, geocoder: NominatimClient) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            geocoder: Arc::new(geocoder),
        }
    }

    /// Registry from the configured JSON file plus a Nominatim client
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        tracing::info!("Loading plant registry from {}...", config.plants_file.display());
        let registry = PlantRegistry::open(JsonFileStore::new(&config.plants_file));

        tracing::info!("Initializing geocoder ({})...", config.geocoder_url);
        let geocoder = NominatimClient::from_config(config)?;

        Ok(Self::new(registry, geocoder))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Registry queries
        .route("/get_plants", get(get_plants))
        .route("/get_user_plants", get(get_user_plants))
        .route("/get_plant_details/:id", get(get_plant_details))
        .route("/check_location", post(check_location))
        .route("/calculate_distances", post(calculate_distances))

        // Registry mutations
        .route("/plant_location", post(plant_location))
        .route("/delete_plant", post(delete_plant))

        // Sharing and location details
        .route("/generate_social_post", post(generate_social_post))
        .route("/my_location", post(my_location))
        .route("/nearby_places", post(nearby_places))
        .route("/share_location", post(share_location))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_plants(State(state): State<AppState>) -> Json<Value> {
    let registry = state.registry.read().await;
    let plants: Vec<Value> = registry
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "lat": p.latitude(),
                "lon": p.longitude(),
                "is_user_planted": p.is_user_planted,
            })
        })
        .collect();

    Json(json!({ "plants": plants }))
}

async fn get_user_plants(State(state): State<AppState>) -> Json<Value> {
    let registry = state.registry.read().await;
    let plants: Vec<Value> = registry
        .filter_user_planted()
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "lat": p.latitude(),
                "lon": p.longitude(),
                "photo_url": p.photo_url,
                "address": p.address,
                "landmarks": p.landmarks,
            })
        })
        .collect();

    Json(json!({ "plants": plants }))
}

async fn get_plant_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let registry = state.registry.read().await;
    let plant = registry
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound("Plant not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "plant": {
            "id": plant.id,
            "name": plant.name,
            "lat": plant.latitude(),
            "lon": plant.longitude(),
            "photo_url": plant.photo_url,
            "address": plant.address,
            "landmarks": plant.landmarks,
            "is_user_planted": plant.is_user_planted,
        }
    })))
}

async fn delete_plant(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("Invalid data".to_string()))?;

    // Blocking snapshot write under the lock
    let removed = state.registry.write().await.remove_by_id(id)?;
    if !removed {
        return Err(AppError::NotFound("Plant not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Plant deleted successfully"
    })))
}

async fn check_location(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let point = coordinates_from(&body, "Invalid data")?;

    let registry = state.registry.read().await;
    let response = match registry.first_near_match(point.latitude, point.longitude) {
        Some(message) => json!({ "message": message, "nearby": true }),
        None => json!({ "message": "No plants nearby.", "nearby": false }),
    };

    Ok(Json(response))
}

async fn plant_location(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let invalid = || AppError::BadRequest("Invalid data".to_string());

    if ["name", "lat", "lon", "type"].iter().any(|key| body.get(key).is_none()) {
        return Err(invalid());
    }

    let name = body["name"].as_str().ok_or_else(invalid)?.trim().to_string();
    let kind_value = body["type"].as_str().ok_or_else(invalid)?.trim();

    if name.is_empty() {
        return Err(AppError::BadRequest("Plant name cannot be empty".to_string()));
    }
    let kind = PlantKind::from_form(kind_value)
        .ok_or_else(|| AppError::BadRequest("Invalid plant type".to_string()))?;

    let point = coordinates_from(&body, "Invalid data")?;

    // Outbound lookup happens before taking the registry lock
    let geocode = state.geocoder.reverse(point.latitude, point.longitude).await;

    let new_plant = NewPlant {
        name: format!("{} {}", name, kind.marker()),
        latitude: point.latitude,
        longitude: point.longitude,
        owner_id: optional_string(&body, "owner_id"),
        photo_url: optional_string(&body, "photo_url"),
        address: geocode.address.clone(),
        landmarks: geocode.landmarks.clone(),
    };

    // Blocking snapshot write under the lock
    let plant_id = state.registry.write().await.plant(new_plant)?.id.clone();

    Ok(Json(json!({
        "message": format!("Successfully planted {} \"{}\" at this location!", kind.label(), name),
        "success": true,
        "plant_id": plant_id,
        "address": geocode.address,
        "landmarks": geocode.landmarks,
    })))
}

async fn calculate_distances(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let point = coordinates_from(&body, "Invalid data")?;

    let registry = state.registry.read().await;
    let distances: Vec<Value> = registry
        .rank_by_distance(point.latitude, point.longitude)
        .into_iter()
        .map(|ranked| {
            json!({
                "plant_id": ranked.plant.id,
                "plant_name": ranked.plant.name,
                "distance_km": round_to(ranked.distance_km, 2),
                "alert_message": ranked.alert.message,
                "alert_level": ranked.alert.tier,
            })
        })
        .collect();

    Ok(Json(json!({ "distances": distances })))
}

async fn generate_social_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let plant_id = body
        .get("plant_id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("Plant ID required".to_string()))?;

    let registry = state.registry.read().await;
    let plant = registry
        .find_by_id(plant_id)
        .ok_or_else(|| AppError::NotFound("Plant not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "posts": social_posts(plant),
        "plant_name": plant.name,
        "photo_url": plant.photo_url,
    })))
}

async fn my_location(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let point = coordinates_from(&body, "Location coordinates required")?;
    let accuracy = body.get("accuracy").cloned().unwrap_or(Value::Null);
    let (lat, lon) = (point.latitude, point.longitude);

    let geocode = state.geocoder.reverse(lat, lon).await;

    Ok(Json(json!({
        "success": true,
        "coordinates": {
            "latitude": lat,
            "longitude": lon,
            "accuracy_meters": accuracy,
        },
        "address": {
            "full_address": geocode.address,
            "pin_code": geocode.postal_code,
            "components": geocode.components(),
        },
        "landmarks": geocode.landmarks,
        "map_link": map_link(lat, lon),
        "formatted_display": format_coordinates(lat, lon, 6),
    })))
}

async fn nearby_places(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let point = coordinates_from(&body, "Location coordinates required")
        .map_err(|e| match e {
            AppError::BadRequest(msg) if msg == "Invalid coordinates" => {
                AppError::BadRequest("Invalid parameters".to_string())
            }
            other => other,
        })?;

    let radius = match body.get("radius") {
        None | Some(Value::Null) => DEFAULT_SEARCH_RADIUS_M,
        Some(value) => parse_number(value)
            .filter(|r| r.is_finite() && *r >= 0.0 && *r <= u32::MAX as f64)
            .map(|r| r.trunc() as u32)
            .ok_or_else(|| AppError::BadRequest("Invalid parameters".to_string()))?,
    };
    let (lat, lon) = (point.latitude, point.longitude);

    let places = state.geocoder.nearby_places(lat, lon, radius as f64).await;
    let geocode = state.geocoder.reverse(lat, lon).await;

    Ok(Json(json!({
        "success": true,
        "current_location": geocode.address,
        "total_found": places.len(),
        "nearby_places": places,
        "landmarks": geocode.landmarks,
        "search_radius_meters": radius,
    })))
}

async fn share_location(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = json_body(payload)?;
    let point = coordinates_from(&body, "Location coordinates required")?;
    let label = optional_string(&body, "label").unwrap_or_else(|| DEFAULT_SHARE_LABEL.to_string());
    let (lat, lon) = (point.latitude, point.longitude);

    let geocode = state.geocoder.reverse(lat, lon).await;

    Ok(Json(json!({
        "success": true,
        "share_link": map_link(lat, lon),
        "share_text": share_text(&label, geocode.address.as_deref(), lat, lon),
        "address": geocode.address,
        "coordinates": format_coordinates(lat, lon, 6),
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match payload {
        Ok(Json(body)) if body.is_object() => Ok(body),
        Ok(_) => Err(AppError::BadRequest("Invalid data".to_string())),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection);
            Err(AppError::BadRequest("Invalid data".to_string()))
        }
    }
}

/// JSON number or numeric string
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `lat`/`lon` from a request body.
///
/// Missing keys yield `missing_message`; unparsable, non-finite or
/// out-of-range values yield "Invalid coordinates".
fn coordinates_from(body: &Value, missing_message: &str) -> Result<Coordinates, AppError> {
    let (Some(lat), Some(lon)) = (body.get("lat"), body.get("lon")) else {
        return Err(AppError::BadRequest(missing_message.to_string()));
    };

    let invalid = || AppError::BadRequest("Invalid coordinates".to_string());
    let point = Coordinates::new(
        parse_number(lat).ok_or_else(invalid)?,
        parse_number(lon).ok_or_else(invalid)?,
    );

    if point.is_valid() {
        Ok(point)
    } else {
        Err(invalid())
    }
}

fn optional_string(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        tracing::error!("Registry mutation failed: {}", err);
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_numeric_strings() {
        assert_eq!(parse_number(&json!(12.5)), Some(12.5));
        assert_eq!(parse_number(&json!(" -3.25 ")), Some(-3.25));
        assert_eq!(parse_number(&json!("invalid")), None);
        assert_eq!(parse_number(&json!(null)), None);
    }

    #[test]
    fn test_coordinates_from() {
        assert!(coordinates_from(&json!({"lat": 1, "lon": "2"}), "missing").is_ok());

        match coordinates_from(&json!({"lat": 1}), "missing") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "missing"),
            other => panic!("unexpected: {:?}", other),
        }
        match coordinates_from(&json!({"lat": 91, "lon": 0}), "missing") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid coordinates"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(coordinates_from(&json!({"lat": "NaN", "lon": 0}), "missing").is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.586318, 2), 3.59);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
