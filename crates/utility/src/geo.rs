use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal places kept when a coordinate is shown to the user.
const DISPLAY_PRECISION: i32 = 6;

/// Rounds to [`DISPLAY_PRECISION`] places and drops trailing zeros,
/// e.g. `48.0 -> "48"`, `9.1070856 -> "9.107086"`.
pub fn format_coordinate(value: f64) -> String {
    let factor = 10f64.powi(DISPLAY_PRECISION);
    // adding 0.0 turns a negative zero into a positive one
    let rounded = (value * factor).round() / factor + 0.0;
    format!("{}", rounded)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LatLng({}, {})",
            format_coordinate(self.lat),
            format_coordinate(self.lng)
        )
    }
}

/// An axis aligned rectangle in degrees, e.g. the visible part of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Builds the smallest box containing both corners, regardless of the
    /// order they are given in.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            north: a.lat.max(b.lat),
            west: a.lng.min(b.lng),
            east: a.lng.max(b.lng),
        }
    }
}
