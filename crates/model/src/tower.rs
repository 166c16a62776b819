use serde::{Deserialize, Serialize};
use utility::geo::LatLng;

/// A cell tower of one provider and the range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tower {
    pub lat: f64,
    pub lon: f64,
    pub range_km: f64,
}

impl Tower {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }

    /// Range in the map's length unit.
    pub fn radius_m(&self) -> f64 {
        self.range_km * 1000.0
    }
}
