use async_trait::async_trait;
use geojson::Geometry;
use model::{
    query::{AreaQuery, NodeQuery, RouteQuery},
    route::RouteResult,
    tower::Tower,
    BoundingBox,
};

use crate::FetchResult;

/// The routing server as seen by the map. Requests are independent of each
/// other; the session may have many of them in flight at once.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Label of the graph node next to the queried position.
    async fn node_at(&self, query: NodeQuery) -> FetchResult<String>;

    async fn route(&self, query: RouteQuery) -> FetchResult<RouteResult>;

    async fn towers(&self, query: AreaQuery) -> FetchResult<Vec<Tower>>;

    /// Road segments with poor coverage for the queried provider.
    async fn coverage_gaps(&self, query: AreaQuery) -> FetchResult<Vec<Geometry>>;

    /// Extent of the routing graph.
    async fn map_bounds(&self) -> FetchResult<BoundingBox>;
}
