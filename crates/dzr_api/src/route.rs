use geojson::{Feature, Geometry};
use serde::Deserialize;

use model::{query::RouteQuery, route::RouteResult};

use crate::{client::DzrApiClient, ApiError};

#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub distance: f64,
    pub travel_time: f64,
    pub route: RouteShape,
}

/// The route is a GeoJSON feature, or an empty list if no path exists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RouteShape {
    Feature(Box<Feature>),
    Empty(Vec<serde_json::Value>),
}

impl RouteShape {
    pub fn into_geometry(self) -> Option<Geometry> {
        match self {
            Self::Feature(feature) => feature.geometry,
            Self::Empty(_) => None,
        }
    }
}

impl From<RouteResponse> for RouteResult {
    fn from(response: RouteResponse) -> Self {
        RouteResult {
            distance: response.distance,
            travel_time: response.travel_time,
            geometry: response.route.into_geometry(),
        }
    }
}

pub async fn get_route(client: &DzrApiClient, query: &RouteQuery) -> Result<RouteResult, ApiError> {
    let response: RouteResponse = client.get_json("route", &query.query_pairs()).await?;
    Ok(response.into())
}
