// Registry Integration Tests
//
// Purpose: Exercise the registry against real JSON files on disk
// Run with: cargo test --test registry_integration_tests

use digital_planter::{
    AlertTier, Coordinates, JsonFileStore, MemoryStore, NewPlant, Plant, PlantRegistry, SequentialIds,
};
use std::fs;

fn open(path: &std::path::Path) -> PlantRegistry {
    PlantRegistry::with_id_generator(JsonFileStore::new(path), SequentialIds::new())
}

// =========================================================================
// Section 1: Loading
// =========================================================================

#[test]
fn test_missing_file_loads_seeds_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");

    let registry = open(&path);

    assert_eq!(registry.len(), 8);
    assert!(registry.iter().all(|p| !p.is_user_planted));
    assert!(!path.exists(), "loading alone must not create the file");
}

#[test]
fn test_corrupted_file_loads_seeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");
    fs::write(&path, "this is not json").unwrap();

    let registry = open(&path);
    let names: Vec<&str> = registry.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names.len(), 8);
    assert_eq!(names[5], "Sunflower - Hyde Park Corner, London");
    assert!(registry.filter_user_planted().is_empty());
}

#[test]
fn test_one_bad_record_rejects_whole_file() {
    let store = MemoryStore::with_blob(
        r#"[{"id": "ok", "name": "Fine", "lat": 1.0, "lon": 2.0},
            {"id": "bad", "name": "Broken", "lat": "north"}]"#,
    );
    let registry = PlantRegistry::with_id_generator(store, SequentialIds::new());

    assert_eq!(registry.len(), 8);
    assert!(registry.find_by_id("ok").is_none());
}

#[test]
fn test_empty_array_is_an_empty_registry() {
    let registry = PlantRegistry::with_id_generator(MemoryStore::with_blob("[]"), SequentialIds::new());
    assert!(registry.is_empty());
}

#[test]
fn test_legacy_file_without_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");
    fs::write(
        &path,
        r#"[{"name": "Tulsi 🌸", "lat": 19.07, "lon": 72.87, "is_user_planted": true, "user_id": "u-7"}]"#,
    )
    .unwrap();

    let registry = open(&path);
    let plant = &registry.plants()[0];

    assert_eq!(plant.id, "plant-1");
    assert_eq!(plant.owner_id.as_deref(), Some("u-7"));
    assert!(plant.is_user_planted);
    assert!(plant.landmarks.is_empty());
}

// =========================================================================
// Section 2: Mutations persist full snapshots
// =========================================================================

#[test]
fn test_plant_persists_and_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");

    let mut registry = open(&path);
    let new_plant = NewPlant {
        owner_id: Some("user-42".to_string()),
        address: Some("Lodhi Road, New Delhi".to_string()),
        landmarks: vec!["Lodhi Road".to_string(), "New Delhi".to_string()],
        photo_url: Some("/uploads/neem.jpg".to_string()),
        ..NewPlant::new("Neem 🌳", 28.5933, 77.2197)
    };
    let id = registry.plant(new_plant).unwrap().id.clone();

    let reloaded = open(&path);
    assert_eq!(reloaded.len(), 9);

    let plant = reloaded.find_by_id(&id).expect("planted plant persisted");
    assert!(plant.is_user_planted);
    assert_eq!(plant.owner_id.as_deref(), Some("user-42"));
    assert_eq!(plant.landmarks, vec!["Lodhi Road", "New Delhi"]);
    assert_eq!(plant.photo_url.as_deref(), Some("/uploads/neem.jpg"));

    // Seed ids are written out too, so they are stable from now on
    assert_eq!(reloaded.plants()[0].id, registry.plants()[0].id);
}

#[test]
fn test_remove_persists_only_when_removed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");

    let mut registry = open(&path);
    assert!(!registry.remove_by_id("nope").unwrap());
    assert!(!path.exists(), "a miss must not trigger a save");

    let first_id = registry.plants()[0].id.clone();
    assert!(registry.remove_by_id(&first_id).unwrap());
    assert_eq!(registry.len(), 7);

    let reloaded = open(&path);
    assert_eq!(reloaded.len(), 7);
    assert!(reloaded.find_by_id(&first_id).is_none());
}

#[test]
fn test_save_all_output_shape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plants.json");
    let registry = PlantRegistry::from_plants(
        vec![Plant::curated("c1", "Lavender", Coordinates::new(48.8634, 2.3275))],
        JsonFileStore::new(&path),
        SequentialIds::new(),
    );
    registry.save_all().unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let record = &json[0];

    assert_eq!(record["id"], "c1");
    assert_eq!(record["lat"], 48.8634);
    assert_eq!(record["lon"], 2.3275);
    assert_eq!(record["is_user_planted"], false);
    assert!(record["owner_id"].is_null());
    assert_eq!(record["landmarks"], serde_json::json!([]));
}

// =========================================================================
// Section 3: Proximity queries over the seed set
// =========================================================================

#[test]
fn test_first_near_match_on_seed_plant() {
    let registry = PlantRegistry::with_id_generator(MemoryStore::new(), SequentialIds::new());

    let message = registry.first_near_match(40.7829, -73.9654).unwrap();
    assert_eq!(
        message,
        "Welcome to Oak Tree - Central Park Lawn, NYC! You are within 0.00 meters."
    );
    assert!(registry.first_near_match(0.0, 0.0).is_none());
}

#[test]
fn test_rank_by_distance_only_user_plants() {
    let mut registry = PlantRegistry::with_id_generator(MemoryStore::new(), SequentialIds::new());
    registry.plant(NewPlant::new("Far 🌸", 51.5027, -0.1527)).unwrap();
    registry.plant(NewPlant::new("Near 🌳", 40.79, -73.96)).unwrap();
    registry.plant(NewPlant::new("Mid 🌳", 40.70, -73.90)).unwrap();

    let ranked = registry.rank_by_distance(40.7829, -73.9654);
    let names: Vec<&str> = ranked.iter().map(|r| r.plant.name.as_str()).collect();

    assert_eq!(names, vec!["Near 🌳", "Mid 🌳", "Far 🌸"]);
    assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    assert_eq!(ranked[0].alert.tier, AlertTier::VeryClose);
    assert_eq!(ranked[1].alert.tier, AlertTier::Closer);
    assert_eq!(ranked[2].alert.tier, AlertTier::Far);
    assert!(ranked[2].alert.message.starts_with("Your plant is 55"));
}
