//! Plant Entity
//!
//! A planted (or curated) geographic point. The registry owns every `Plant`
//! and only hands out shared references, so fields are never edited in place.

use serde::{Deserialize, Serialize};

use crate::distance::meters_between;
use crate::proximity::arrival_message;

/// Marker appended to tree names by the plant form
pub const TREE_MARKER: &str = "🌳";

/// Marker appended to flower names by the plant form
pub const FLOWER_MARKER: &str = "🌸";

/// A latitude/longitude pair in signed degrees.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180]; callers
/// validate before constructing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both values are finite and inside the valid degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Plant type as interpreted from the marker embedded in its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantKind {
    Tree,
    Flower,
    Plant,
}

impl PlantKind {
    /// Parse the form value used when planting ("tree" or "flower")
    pub fn from_form(value: &str) -> Option<Self> {
        match value {
            "tree" => Some(PlantKind::Tree),
            "flower" => Some(PlantKind::Flower),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlantKind::Tree => "tree",
            PlantKind::Flower => "flower",
            PlantKind::Plant => "plant",
        }
    }

    /// Name marker; untyped plants share the flower marker
    pub fn marker(&self) -> &'static str {
        match self {
            PlantKind::Tree => TREE_MARKER,
            PlantKind::Flower | PlantKind::Plant => FLOWER_MARKER,
        }
    }
}

/// A tracked plant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plant {
    pub id: String,
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinates,
    pub is_user_planted: bool,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub landmarks: Vec<String>,
}

impl Plant {
    /// Curated plant with no owner or enrichment
    pub fn curated(id: impl Into<String>, name: impl Into<String>, location: Coordinates) -> Self {
        Self {
            id: id.into(),
            owner_id: None,
            name: name.into(),
            location,
            is_user_planted: false,
            photo_url: None,
            address: None,
            landmarks: Vec::new(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude
    }

    /// Kind inferred from the name marker (tree wins over flower)
    pub fn kind(&self) -> PlantKind {
        if self.name.contains(TREE_MARKER) {
            PlantKind::Tree
        } else if self.name.contains(FLOWER_MARKER) {
            PlantKind::Flower
        } else {
            PlantKind::Plant
        }
    }

    /// Name with the type markers stripped
    pub fn clean_name(&self) -> String {
        self.name
            .replace(TREE_MARKER, "")
            .replace(FLOWER_MARKER, "")
            .trim()
            .to_string()
    }

    /// Arrival check: a welcome message when `(lat, lon)` is within 50 m
    pub fn is_near(&self, lat: f64, lon: f64) -> Option<String> {
        let distance = meters_between(self.location, Coordinates::new(lat, lon));
        arrival_message(&self.name, distance)
    }
}

/// Input to the registry's "plant" operation.
///
/// Carries everything except identity and the user-planted flag, which the
/// registry assigns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlant {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub landmarks: Vec<String>,
}

impl NewPlant {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            ..Default::default()
        }
    }

    pub(crate) fn into_plant(self, id: String) -> Plant {
        Plant {
            id,
            owner_id: self.owner_id,
            name: self.name,
            location: Coordinates::new(self.latitude, self.longitude),
            is_user_planted: true,
            photo_url: self.photo_url,
            address: self.address,
            landmarks: self.landmarks,
        }
    }
}

/// On-disk record shape.
///
/// `id` may be missing in hand-written files; the registry fills it in.
/// `user_id` is accepted as a legacy spelling of `owner_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "user_id")]
    pub owner_id: Option<String>,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub is_user_planted: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub landmarks: Vec<String>,
}

impl PlantRecord {
    /// Build a plant, calling `generate_id` only when the record has no id
    pub fn into_plant(self, generate_id: impl FnOnce() -> String) -> Plant {
        Plant {
            id: self.id.unwrap_or_else(generate_id),
            owner_id: self.owner_id,
            name: self.name,
            location: Coordinates::new(self.lat, self.lon),
            is_user_planted: self.is_user_planted,
            photo_url: self.photo_url,
            address: self.address,
            landmarks: self.landmarks,
        }
    }
}

impl From<&Plant> for PlantRecord {
    fn from(plant: &Plant) -> Self {
        Self {
            id: Some(plant.id.clone()),
            owner_id: plant.owner_id.clone(),
            name: plant.name.clone(),
            lat: plant.location.latitude,
            lon: plant.location.longitude,
            is_user_planted: plant.is_user_planted,
            photo_url: plant.photo_url.clone(),
            address: plant.address.clone(),
            landmarks: plant.landmarks.clone(),
        }
    }
}

// `landmarks: null` was written by older files
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
