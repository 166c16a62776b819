//! Parameters of the backend requests. Values are only ever produced from
//! closed enums and resolved labels; encoding is left to the http client.

use std::fmt;

use itertools::Itertools;
use utility::geo::{BoundingBox, LatLng};

use crate::{
    provider::Provider,
    selection::{Goal, Movement, Selection},
};

pub type QueryPairs = Vec<(&'static str, String)>;

fn fmt_pairs(pairs: &QueryPairs, f: &mut fmt::Formatter) -> fmt::Result {
    let joined = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join("&");
    f.write_str(&joined)
}

/// Lookup of the graph node next to a clicked position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeQuery {
    pub position: LatLng,
}

impl NodeQuery {
    pub fn query_pairs(&self) -> QueryPairs {
        vec![
            ("lat", self.position.lat.to_string()),
            ("long", self.position.lng.to_string()),
        ]
    }
}

impl fmt::Display for NodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_pairs(&self.query_pairs(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub start: String,
    pub end: String,
    pub goal: Goal,
    pub movement: Movement,
    /// `None` means no coverage constraint. The parameter is then left out
    /// of the request entirely.
    pub provider: Option<Provider>,
}

impl RouteQuery {
    pub fn new(
        start: &str,
        end: &str,
        selection: &Selection,
        provider: Option<Provider>,
    ) -> Self {
        Self {
            start: start.to_owned(),
            end: end.to_owned(),
            goal: selection.goal,
            movement: selection.movement,
            provider,
        }
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("s", self.start.clone()),
            ("t", self.end.clone()),
            ("goal", self.goal.as_str().to_owned()),
            ("move", self.movement.as_str().to_owned()),
        ];
        if let Some(provider) = self.provider {
            pairs.push(("provider", provider.as_str().to_owned()));
        }
        pairs
    }
}

impl fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_pairs(&self.query_pairs(), f)
    }
}

/// Towers or coverage gaps of one provider inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaQuery {
    pub bounds: BoundingBox,
    pub provider: Provider,
}

impl AreaQuery {
    pub fn query_pairs(&self) -> QueryPairs {
        vec![
            ("lat_min", self.bounds.south.to_string()),
            ("lat_max", self.bounds.north.to_string()),
            ("lon_min", self.bounds.west.to_string()),
            ("lon_max", self.bounds.east.to_string()),
            ("provider", self.provider.as_str().to_owned()),
        ]
    }
}

impl fmt::Display for AreaQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_pairs(&self.query_pairs(), f)
    }
}
