//! Curated seed plants
//!
//! Open public spaces (parks, streets, gardens). Used whenever durable storage
//! is missing or unreadable. Ids are left empty so the registry assigns them.

use crate::plant::PlantRecord;

const SEED_PLANTS: [(&str, f64, f64); 8] = [
    ("Oak Tree - Central Park Lawn, NYC", 40.7829, -73.9654),
    ("Rose Bush - Embarcadero Waterfront, SF", 37.7955, -122.3937),
    ("Lavender - Tuileries Garden Path, Paris", 48.8634, 2.3275),
    ("Jasmine - Rajpath Road, New Delhi", 28.6143, 77.2088),
    ("Maple Tree - Bryant Park Lawn, NYC", 40.7536, -73.9832),
    ("Sunflower - Hyde Park Corner, London", 51.5027, -0.1527),
    ("Petunia - Marina Beach Road, Chennai", 13.0499, 80.2824),
    ("Bamboo - Lodhi Garden Path, Delhi", 28.5933, 77.2197),
];

/// The fixed curated set, in display order
pub fn seed_records() -> Vec<PlantRecord> {
    SEED_PLANTS
        .iter()
        .map(|&(name, lat, lon)| PlantRecord {
            id: None,
            owner_id: None,
            name: name.to_string(),
            lat,
            lon,
            is_user_planted: false,
            photo_url: None,
            address: None,
            landmarks: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_set_is_curated() {
        let seeds = seed_records();
        assert_eq!(seeds.len(), 8);
        assert!(seeds.iter().all(|r| !r.is_user_planted && r.id.is_none()));
        assert_eq!(seeds[0].name, "Oak Tree - Central Park Lawn, NYC");
    }
}
