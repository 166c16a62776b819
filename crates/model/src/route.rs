use std::fmt;

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use serde_with::SerializeDisplay;

/// One answer of the routing server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance: f64,
    pub travel_time: f64,
    /// `None` if the server found no path between the endpoints.
    pub geometry: Option<Geometry>,
}

/// Content of a scalar display field.
#[derive(Debug, Clone, Copy, PartialEq, Default, SerializeDisplay)]
pub enum DisplayValue {
    #[default]
    Empty,
    Known(f64),
    Unknown,
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Known(value) => write!(f, "{}", value),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// The distance and travel time fields. Shared by every route query, the last
/// completion to arrive wins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance: DisplayValue,
    pub travel_time: DisplayValue,
}

impl RouteSummary {
    pub fn record(&mut self, result: &RouteResult) {
        self.distance = DisplayValue::Known(result.distance);
        self.travel_time = DisplayValue::Known(result.travel_time);
    }

    pub fn mark_unknown(&mut self) {
        self.distance = DisplayValue::Unknown;
        self.travel_time = DisplayValue::Unknown;
    }
}
