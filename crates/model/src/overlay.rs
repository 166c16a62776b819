use geojson::Geometry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use utility::{
    geo::LatLng,
    id::{HasId, Id, IdGenerator},
};

use crate::{endpoint::Role, provider::Provider};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: Option<f64>,
}

impl PathStyle {
    pub fn route(color: &'static str) -> Self {
        Self {
            color,
            weight: 5.0,
            opacity: 0.65,
            fill_opacity: None,
        }
    }

    /// Faint enough that routes stay visible underneath.
    pub fn tower(color: &'static str) -> Self {
        Self {
            color,
            weight: 1.0,
            opacity: 0.2,
            fill_opacity: Some(0.05),
        }
    }

    pub fn coverage_gap(color: &'static str) -> Self {
        Self {
            color,
            weight: 3.0,
            opacity: 0.8,
            fill_opacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLine {
    /// `None` for the route without coverage constraint.
    pub provider: Option<Provider>,
    pub geometry: Geometry,
    pub style: PathStyle,
}

impl HasId for RouteLine {
    type IdType = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerCircle {
    pub provider: Provider,
    pub center: LatLng,
    pub radius_m: f64,
    pub style: PathStyle,
}

impl HasId for TowerCircle {
    type IdType = u64;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGapLine {
    pub provider: Provider,
    pub geometry: Geometry,
    pub style: PathStyle,
}

impl HasId for CoverageGapLine {
    type IdType = u64;
}

/// Marker shown at the clicked position of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub role: Role,
    pub latlng: LatLng,
    pub content: String,
}

impl Popup {
    pub fn new(role: Role, latlng: LatLng) -> Self {
        Self {
            role,
            latlng,
            content: role.popup_content(latlng),
        }
    }
}

/// Overlays of one kind that are currently on the map, in the order they
/// were added. Ids are never reused, not even after [`LayerGroup::clear`].
#[derive(Debug, Clone)]
pub struct LayerGroup<L: HasId<IdType = u64>> {
    layers: IndexMap<Id<L>, L>,
    ids: IdGenerator<L>,
}

impl<L: HasId<IdType = u64>> LayerGroup<L> {
    pub fn new() -> Self {
        Self {
            layers: IndexMap::new(),
            ids: IdGenerator::new(),
        }
    }

    pub fn add(&mut self, layer: L) -> Id<L> {
        let id = self.ids.next_id();
        self.layers.insert(id, layer);
        id
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = &L> {
        self.layers.values()
    }
}

impl<L: HasId<IdType = u64>> Default for LayerGroup<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Serialize for LayerGroup<L>
where
    L: HasId<IdType = u64> + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.layers.values())
    }
}
