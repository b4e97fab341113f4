//! Great-circle distance (haversine)
//!
//! Two scales are in use: meters for arrival detection at a single plant and
//! kilometers for ranking/reporting many plants. The unit is always an explicit
//! argument.

use crate::plant::Coordinates;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Unit of the returned distance (selects the sphere radius)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
}

impl DistanceUnit {
    pub fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnit::Meters => EARTH_RADIUS_METERS,
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// Haversine distance between two points given in degrees.
///
/// Non-negative, zero for identical points and symmetric in its arguments.
/// NaN inputs propagate to the result.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, unit: DistanceUnit) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    unit.earth_radius() * c
}

pub fn meters_between(a: Coordinates, b: Coordinates) -> f64 {
    great_circle_distance(a.latitude, a.longitude, b.latitude, b.longitude, DistanceUnit::Meters)
}

pub fn kilometers_between(a: Coordinates, b: Coordinates) -> f64 {
    great_circle_distance(a.latitude, a.longitude, b.latitude, b.longitude, DistanceUnit::Kilometers)
}
