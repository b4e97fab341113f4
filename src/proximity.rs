//! Proximity Classification
//!
//! Two independent policies:
//! - Arrival detection (meters, single plant): within 50 m or nothing
//! - Distance alert tiers (kilometers, used when ranking many plants)

use serde::Serialize;

// ============================================================================
// Arrival Detection
// ============================================================================

/// Inclusive arrival radius in meters
pub const ARRIVAL_RADIUS_METERS: f64 = 50.0;

/// Welcome message when `distance_m` is within the arrival radius.
///
/// Exactly 50.00 m still counts as arrived; NaN never does.
pub fn arrival_message(name: &str, distance_m: f64) -> Option<String> {
    if distance_m <= ARRIVAL_RADIUS_METERS {
        Some(format!("Welcome to {}! You are within {:.2} meters.", name, distance_m))
    } else {
        None
    }
}

// ============================================================================
// Distance Alert Tiers
// ============================================================================

/// Ordered alert tiers, nearest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTier {
    /// < 0.05 km
    Arrived,
    /// < 1 km
    VeryClose,
    /// < 5 km
    Nearby,
    /// < 10 km
    Approaching,
    /// < 15 km
    Closer,
    /// < 20 km
    SameRegion,
    /// everything else
    Far,
}

/// Exclusive upper bounds (km), checked in order
const TIER_BOUNDS: [(f64, AlertTier); 6] = [
    (0.05, AlertTier::Arrived),
    (1.0, AlertTier::VeryClose),
    (5.0, AlertTier::Nearby),
    (10.0, AlertTier::Approaching),
    (15.0, AlertTier::Closer),
    (20.0, AlertTier::SameRegion),
];

impl AlertTier {
    /// Classify a kilometer distance; first strictly-greater bound wins
    pub fn classify(distance_km: f64) -> Self {
        TIER_BOUNDS
            .iter()
            .find(|(upper, _)| distance_km < *upper)
            .map(|(_, tier)| *tier)
            .unwrap_or(AlertTier::Far)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AlertTier::Arrived => "arrived",
            AlertTier::VeryClose => "very_close",
            AlertTier::Nearby => "nearby",
            AlertTier::Approaching => "approaching",
            AlertTier::Closer => "closer",
            AlertTier::SameRegion => "same_region",
            AlertTier::Far => "far",
        }
    }

    /// Message for this tier; only `Far` embeds the distance
    pub fn message(&self, distance_km: f64) -> String {
        match self {
            AlertTier::Arrived => "You've arrived at your plant! 🎉".to_string(),
            AlertTier::VeryClose => "Your plant is very close! Less than 1 km away! 🌱".to_string(),
            AlertTier::Nearby => "Your plant is nearby - within 5 km! 🌿".to_string(),
            AlertTier::Approaching => "You're approaching your plant - within 10 km.".to_string(),
            AlertTier::Closer => "Getting closer to your plant - within 15 km.".to_string(),
            AlertTier::SameRegion => {
                "You're in the same region as your plant - within 20 km.".to_string()
            }
            AlertTier::Far => format!("Your plant is {:.1} km away.", distance_km),
        }
    }

    pub fn all() -> &'static [AlertTier] {
        &[
            AlertTier::Arrived,
            AlertTier::VeryClose,
            AlertTier::Nearby,
            AlertTier::Approaching,
            AlertTier::Closer,
            AlertTier::SameRegion,
            AlertTier::Far,
        ]
    }
}

/// Tier plus its human-facing message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceAlert {
    pub tier: AlertTier,
    pub message: String,
}

pub fn distance_alert(distance_km: f64) -> DistanceAlert {
    let tier = AlertTier::classify(distance_km);
    DistanceAlert {
        tier,
        message: tier.message(distance_km),
    }
}
