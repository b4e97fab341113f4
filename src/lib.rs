//! Digital Planter
//!
//! Tracks curated and user-planted geographic points ("plants") and answers
//! proximity questions about them.
//!
//! Core modules (no I/O beyond the storage hook):
//! - `plant`: Plant entity, coordinates, storage record shape
//! - `distance`: Haversine great-circle distance (meters or kilometers)
//! - `proximity`: Arrival detection and tiered distance alerts
//! - `registry`: Ordered plant collection with load/save and queries
//!
//! Supporting modules:
//! - `storage`: JSON file / in-memory stores
//! - `seed`: Curated fallback plants
//! - `geocoding`, `share`: enrichment and sharing helpers
//! - `api_server` (feature `api`): Axum HTTP layer

pub mod config;
pub mod distance;
pub mod error;
pub mod geocoding;
pub mod plant;
pub mod proximity;
pub mod registry;
pub mod seed;
pub mod share;
pub mod storage;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use config::Config;
pub use distance::{great_circle_distance, kilometers_between, meters_between, DistanceUnit};
pub use error::{RegistryError, StorageError};
pub use plant::{Coordinates, NewPlant, Plant, PlantKind, PlantRecord};
pub use proximity::{arrival_message, distance_alert, AlertTier, DistanceAlert};
pub use registry::{IdGenerator, PlantRegistry, RankedPlant, SequentialIds, UuidIds};
pub use storage::{JsonFileStore, MemoryStore, PlantStore};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
