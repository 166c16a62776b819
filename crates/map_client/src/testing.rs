//! An in-memory [`Backend`] whose answers and timing are scripted by tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use geojson::{Geometry, Value};
use model::{
    provider::Provider,
    query::{AreaQuery, NodeQuery, RouteQuery},
    route::RouteResult,
    tower::Tower,
    BoundingBox, LatLng,
};
use tokio::sync::Notify;

use crate::{Backend, FetchError, FetchResult};

pub fn not_found(url: &str) -> FetchError {
    FetchError::Status {
        status: 404,
        url: url.to_owned(),
        body: None,
    }
}

pub fn line_route(distance: f64) -> RouteResult {
    RouteResult {
        distance,
        travel_time: distance / 10.0,
        geometry: Some(Geometry::new(Value::LineString(vec![
            vec![9.0, 48.0],
            vec![9.05, 48.05],
        ]))),
    }
}

pub fn route_key(provider: Option<Provider>) -> String {
    format!("route:{}", provider.map(|p| p.as_str()).unwrap_or("none"))
}

pub fn node_key(position: LatLng) -> String {
    format!("node:{}", position)
}

#[derive(Default)]
pub struct ScriptedBackend {
    labels: Mutex<Vec<(LatLng, FetchResult<String>)>>,
    routes: Mutex<HashMap<Option<Provider>, FetchResult<RouteResult>>>,
    towers: Mutex<HashMap<Provider, FetchResult<Vec<Tower>>>>,
    gaps: Mutex<HashMap<Provider, FetchResult<Vec<Geometry>>>>,
    bounds: Mutex<Option<FetchResult<BoundingBox>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    panics: Mutex<HashSet<String>>,
    route_queries: Mutex<Vec<RouteQuery>>,
    area_queries: Mutex<Vec<AreaQuery>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn label_at(&self, position: LatLng, result: FetchResult<String>) {
        self.labels.lock().unwrap().push((position, result));
    }

    pub fn route_for(&self, provider: Option<Provider>, result: FetchResult<RouteResult>) {
        self.routes.lock().unwrap().insert(provider, result);
    }

    pub fn towers_for(&self, provider: Provider, result: FetchResult<Vec<Tower>>) {
        self.towers.lock().unwrap().insert(provider, result);
    }

    pub fn gaps_for(&self, provider: Provider, result: FetchResult<Vec<Geometry>>) {
        self.gaps.lock().unwrap().insert(provider, result);
    }

    pub fn bounds(&self, result: FetchResult<BoundingBox>) {
        *self.bounds.lock().unwrap() = Some(result);
    }

    /// Requests with this key wait until [`ScriptedBackend::open`] is called
    /// once for each of them.
    pub fn hold(&self, key: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_owned(), Arc::new(Notify::new()));
    }

    /// Requests with this key panic instead of answering.
    pub fn panic_at(&self, key: &str) {
        self.panics.lock().unwrap().insert(key.to_owned());
    }

    pub fn open(&self, key: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(key) {
            gate.notify_one();
        }
    }

    pub fn route_queries(&self) -> Vec<RouteQuery> {
        self.route_queries.lock().unwrap().clone()
    }

    pub fn area_queries(&self) -> Vec<AreaQuery> {
        self.area_queries.lock().unwrap().clone()
    }

    async fn pass_gate(&self, key: &str) {
        let panics = self.panics.lock().unwrap().contains(key);
        if panics {
            panic!("scripted panic for {}", key);
        }
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn node_at(&self, query: NodeQuery) -> FetchResult<String> {
        self.pass_gate(&node_key(query.position)).await;
        self.labels
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(position, _)| *position == query.position)
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Err(not_found("/node_at")))
    }

    async fn route(&self, query: RouteQuery) -> FetchResult<RouteResult> {
        self.route_queries.lock().unwrap().push(query.clone());
        self.pass_gate(&route_key(query.provider)).await;
        self.routes
            .lock()
            .unwrap()
            .get(&query.provider)
            .cloned()
            .unwrap_or_else(|| Ok(line_route(1000.0)))
    }

    async fn towers(&self, query: AreaQuery) -> FetchResult<Vec<Tower>> {
        self.area_queries.lock().unwrap().push(query);
        self.pass_gate(&format!("towers:{}", query.provider)).await;
        self.towers
            .lock()
            .unwrap()
            .get(&query.provider)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn coverage_gaps(&self, query: AreaQuery) -> FetchResult<Vec<Geometry>> {
        self.area_queries.lock().unwrap().push(query);
        self.gaps
            .lock()
            .unwrap()
            .get(&query.provider)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn map_bounds(&self) -> FetchResult<BoundingBox> {
        self.bounds
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(not_found("/map_coords")))
    }
}
