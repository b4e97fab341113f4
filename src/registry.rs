//! Plant Registry
//!
//! Owns the ordered plant collection. Queries are O(n) scans in insertion
//! order; every successful mutation rewrites the full snapshot to the store.
//!
//! The registry does no locking. Callers sharing it across requests must
//! serialize `add`/`plant`/`remove_by_id` so two snapshots never interleave.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use uuid::Uuid;

use crate::distance::kilometers_between;
use crate::error::{RegistryError, StorageError};
use crate::plant::{Coordinates, NewPlant, Plant, PlantRecord};
use crate::proximity::{distance_alert, DistanceAlert};
use crate::seed::seed_records;
use crate::storage::PlantStore;

// ============================================================================
// Identity Generation
// ============================================================================

/// Strategy for fresh plant ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs (default)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic `plant-N` ids; deterministic for tests and fixtures
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("plant-{}", n)
    }
}

// ============================================================================
// Query Results
// ============================================================================

/// One row of `rank_by_distance`
#[derive(Debug, Clone, Serialize)]
pub struct RankedPlant<'a> {
    pub plant: &'a Plant,
    pub distance_km: f64,
    pub alert: DistanceAlert,
}

// ============================================================================
// Registry
// ============================================================================

pub struct PlantRegistry {
    plants: Vec<Plant>,
    store: Box<dyn PlantStore>,
    ids: Box<dyn IdGenerator>,
}

impl PlantRegistry {
    /// Open a registry over `store` with UUID identities
    pub fn open(store: impl PlantStore + 'static) -> Self {
        Self::with_id_generator(store, UuidIds)
    }

    pub fn with_id_generator(
        store: impl PlantStore + 'static,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        let mut registry = Self {
            plants: Vec::new(),
            store: Box::new(store),
            ids: Box::new(ids),
        };
        registry.plants = registry.load_all();
        tracing::info!("Plant registry loaded with {} plants", registry.plants.len());
        registry
    }

    /// Registry over explicit plants; nothing is read from `store`
    pub fn from_plants(
        plants: Vec<Plant>,
        store: impl PlantStore + 'static,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            plants,
            store: Box::new(store),
            ids: Box::new(ids),
        }
    }

    /// Reconstruct plants from the store, falling back to the seed set.
    ///
    /// Never fails: missing or malformed storage is logged and absorbed.
    ///
    /// Records without an id get a fresh one that no stored record uses.
    /// A repeated stored id keeps its first holder; later holders are renamed.
    pub fn load_all(&self) -> Vec<Plant> {
        let records = match self.store.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Falling back to seed plants: {}", e);
                seed_records()
            }
        };

        let mut taken: HashSet<String> = records.iter().filter_map(|r| r.id.clone()).collect();
        let mut seen: HashSet<String> = HashSet::new();

        records
            .into_iter()
            .map(|mut record| {
                if let Some(id) = &record.id {
                    if !seen.insert(id.clone()) {
                        tracing::warn!("Duplicate stored plant id {} ({}); assigning a fresh id", id, record.name);
                        record.id = None;
                    }
                }
                record.into_plant(|| {
                    let id = self.unused_id(|candidate| taken.contains(candidate));
                    taken.insert(id.clone());
                    id
                })
            })
            .collect()
    }

    /// Replace in-memory state with a fresh `load_all`
    pub fn reload(&mut self) {
        self.plants = self.load_all();
    }

    /// Write the full collection as one snapshot
    pub fn save_all(&self) -> Result<(), StorageError> {
        let records: Vec<PlantRecord> = self.plants.iter().map(PlantRecord::from).collect();
        self.store.save(&records)
    }

    pub fn generate_id(&self) -> String {
        self.ids.next_id()
    }

    fn unused_id(&self, in_use: impl Fn(&str) -> bool) -> String {
        let mut id = self.generate_id();
        while in_use(&id) {
            id = self.generate_id();
        }
        id
    }

    /// Append `plant` and persist. Ids must stay unique.
    pub fn add(&mut self, plant: Plant) -> Result<(), RegistryError> {
        if self.find_by_id(&plant.id).is_some() {
            return Err(RegistryError::DuplicateId(plant.id));
        }
        tracing::info!("Adding plant {} ({})", plant.id, plant.name);
        self.plants.push(plant);
        self.save_all()?;
        Ok(())
    }

    /// The "plant" operation: fresh identity, user-planted, appended and saved
    pub fn plant(&mut self, new_plant: NewPlant) -> Result<&Plant, RegistryError> {
        let id = self.unused_id(|candidate| self.find_by_id(candidate).is_some());
        self.add(new_plant.into_plant(id))?;
        // add() just pushed, so the last element is the new plant
        Ok(&self.plants[self.plants.len() - 1])
    }

    /// Remove the first plant with `id`; saves only when something was removed
    pub fn remove_by_id(&mut self, id: &str) -> Result<bool, RegistryError> {
        let Some(index) = self.plants.iter().position(|p| p.id == id) else {
            tracing::debug!("No plant with id {} to remove", id);
            return Ok(false);
        };
        let removed = self.plants.remove(index);
        tracing::info!("Removed plant {} ({})", removed.id, removed.name);
        self.save_all()?;
        Ok(true)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// User contributions in registry order
    pub fn filter_user_planted(&self) -> Vec<&Plant> {
        self.plants.iter().filter(|p| p.is_user_planted).collect()
    }

    /// Arrival message of the first plant (in registry order) within 50 m.
    ///
    /// First match, not closest match.
    pub fn first_near_match(&self, lat: f64, lon: f64) -> Option<String> {
        self.plants.iter().find_map(|p| p.is_near(lat, lon))
    }

    /// User-planted plants by ascending kilometer distance from `(lat, lon)`.
    ///
    /// Stable: equal distances keep registry order.
    pub fn rank_by_distance(&self, lat: f64, lon: f64) -> Vec<RankedPlant<'_>> {
        let origin = Coordinates::new(lat, lon);
        let mut ranked: Vec<RankedPlant<'_>> = self
            .plants
            .iter()
            .filter(|p| p.is_user_planted)
            .map(|plant| {
                let distance_km = kilometers_between(origin, plant.location);
                RankedPlant {
                    plant,
                    distance_km,
                    alert: distance_alert(distance_km),
                }
            })
            .collect();

        ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        ranked
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plant> {
        self.plants.iter()
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

impl std::fmt::Debug for PlantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantRegistry")
            .field("plants", &self.plants)
            .finish_non_exhaustive()
    }
}
