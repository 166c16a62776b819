use std::{any::Any, error, fmt, future::Future, panic::AssertUnwindSafe, sync::Arc};

use actors::{
    actor::{Actor, ActorError, SupervisionStrategy},
    actor_ref::{ActorRef, WeakActorRef},
    handler::{Handler, Message},
    mailbox::Mailbox,
};
use async_trait::async_trait;
use futures::FutureExt;
use geojson::Geometry;
use model::{
    endpoint::Role,
    provider::ProviderSelection,
    query::RouteQuery,
    route::RouteResult,
    selection::{Goal, Movement, Selection, SelectionChange},
    tower::Tower,
    BoundingBox, LatLng,
};
use tokio::sync::watch;

use crate::{
    config::SessionConfig,
    orchestrator::RouteTicket,
    overlay::{GapRefresh, RefreshTicket, TowerRefresh},
    resolver::ResolveTicket,
    state::{MapState, MapView},
    Backend, FetchError, FetchResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session task is gone; nothing can be changed or observed anymore.
    Closed,
}

impl error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::Closed => write!(f, "map session is closed"),
        }
    }
}

impl<A, M> From<ActorError<A, M>> for SessionError
where
    A: Actor,
    M: Mailbox<A>,
{
    fn from(why: ActorError<A, M>) -> Self {
        log::debug!("session unreachable: {}", why);
        SessionError::Closed
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// The controller of one map. User input and request completions are
/// messages in the same mailbox, so state changes never interleave.
pub struct MapSession<B: Backend> {
    backend: Arc<B>,
    state: MapState,
    in_flight: Arc<watch::Sender<usize>>,
    myself: Option<WeakActorRef<Self>>,
}

impl<B: Backend> MapSession<B> {
    /// Starts a session in its own task.
    pub fn spawn(backend: Arc<B>, config: SessionConfig) -> MapSessionHandle<B> {
        let (in_flight_tx, in_flight_rx) = watch::channel(0);
        let in_flight_tx = Arc::new(in_flight_tx);
        let actor = actors::run_with_capacity(config.mailbox_capacity, move || MapSession {
            backend: backend.clone(),
            state: MapState::new(&config),
            in_flight: in_flight_tx.clone(),
            myself: None,
        });
        MapSessionHandle {
            actor,
            in_flight: in_flight_rx,
        }
    }

    /// Runs `request` in the background and mails its result back as the
    /// message built by `completion`. A panicking request answers with
    /// [`FetchError::Aborted`].
    fn dispatch<T, R, M, C>(&self, request: R, completion: C)
    where
        T: Send + 'static,
        R: Future<Output = FetchResult<T>> + Send + 'static,
        M: Message,
        C: FnOnce(FetchResult<T>) -> M + Send + 'static,
        Self: Handler<M>,
    {
        let Some(myself) = self.myself.clone() else {
            log::error!("session not started, dropping request");
            return;
        };
        self.in_flight.send_modify(|count| *count += 1);
        tokio::spawn(async move {
            let output = match AssertUnwindSafe(request).catch_unwind().await {
                Ok(output) => output,
                Err(why) => {
                    let message = panic_message(&*why);
                    log::error!("backend request panicked: {}", message);
                    Err(FetchError::Aborted(message))
                }
            };
            match myself.upgrade() {
                Some(session) => {
                    if let Err(why) = session.tell(completion(output)).await {
                        log::debug!("completion not delivered: {}", why);
                    }
                }
                None => log::debug!("session closed, dropping completion"),
            }
        });
    }

    fn finished(&self) {
        self.in_flight.send_modify(|count| *count = count.saturating_sub(1));
    }

    fn dispatch_routes(&self, queries: Vec<(RouteTicket, RouteQuery)>) {
        for (ticket, query) in queries {
            log::debug!("GET /route?{}", query);
            let backend = self.backend.clone();
            self.dispatch(async move { backend.route(query).await }, move |result| {
                RouteFinished { ticket, result }
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

impl<B: Backend> Actor for MapSession<B> {
    fn started(&mut self, myself: WeakActorRef<Self>) {
        self.myself = Some(myself);
    }

    fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
        // keep what is on the map
        SupervisionStrategy::Resume
    }
}

pub struct Click {
    pub role: Role,
    pub latlng: LatLng,
}

impl Message for Click {
    type Response = ();
}

pub struct ChangeSelection(pub SelectionChange);

impl Message for ChangeSelection {
    type Response = ();
}

pub struct SetSelection(pub Selection);

impl Message for SetSelection {
    type Response = ();
}

pub struct Recompute;

impl Message for Recompute {
    type Response = ();
}

pub struct RefreshTowers {
    pub bounds: BoundingBox,
}

impl Message for RefreshTowers {
    type Response = ();
}

pub struct RefreshCoverageGaps {
    pub bounds: BoundingBox,
}

impl Message for RefreshCoverageGaps {
    type Response = ();
}

pub struct LoadMapBounds;

impl Message for LoadMapBounds {
    type Response = ();
}

pub struct Snapshot;

impl Message for Snapshot {
    type Response = MapView;
}

pub struct NodeResolved {
    ticket: ResolveTicket,
    result: FetchResult<String>,
}

impl Message for NodeResolved {
    type Response = ();
}

pub struct RouteFinished {
    ticket: RouteTicket,
    result: FetchResult<RouteResult>,
}

impl Message for RouteFinished {
    type Response = ();
}

pub struct TowersFetched {
    ticket: RefreshTicket<TowerRefresh>,
    result: FetchResult<Vec<Tower>>,
}

impl Message for TowersFetched {
    type Response = ();
}

pub struct CoverageGapsFetched {
    ticket: RefreshTicket<GapRefresh>,
    result: FetchResult<Vec<Geometry>>,
}

impl Message for CoverageGapsFetched {
    type Response = ();
}

pub struct MapBoundsFetched {
    result: FetchResult<BoundingBox>,
}

impl Message for MapBoundsFetched {
    type Response = ();
}

#[async_trait]
impl<B: Backend> Handler<Click> for MapSession<B> {
    async fn handle(&mut self, message: Click) {
        log::info!("{} set at {}", message.role, message.latlng);
        let (ticket, query) = self.state.click(message.role, message.latlng);
        log::debug!("GET /node_at?{}", query);
        let backend = self.backend.clone();
        self.dispatch(async move { backend.node_at(query).await }, move |result| {
            NodeResolved { ticket, result }
        });
    }
}

#[async_trait]
impl<B: Backend> Handler<NodeResolved> for MapSession<B> {
    async fn handle(&mut self, message: NodeResolved) {
        let queries = self.state.node_resolved(message.ticket, message.result);
        self.dispatch_routes(queries);
        self.finished();
    }
}

#[async_trait]
impl<B: Backend> Handler<ChangeSelection> for MapSession<B> {
    async fn handle(&mut self, message: ChangeSelection) {
        let queries = self.state.change_selection(message.0);
        self.dispatch_routes(queries);
    }
}

#[async_trait]
impl<B: Backend> Handler<SetSelection> for MapSession<B> {
    async fn handle(&mut self, message: SetSelection) {
        let queries = self.state.set_selection(message.0);
        self.dispatch_routes(queries);
    }
}

#[async_trait]
impl<B: Backend> Handler<Recompute> for MapSession<B> {
    async fn handle(&mut self, _: Recompute) {
        let queries = self.state.recompute();
        self.dispatch_routes(queries);
    }
}

#[async_trait]
impl<B: Backend> Handler<RouteFinished> for MapSession<B> {
    async fn handle(&mut self, message: RouteFinished) {
        let outcome = self.state.route_finished(message.ticket, message.result);
        log::debug!("route {:?}: {:?}", message.ticket.provider, outcome);
        self.finished();
    }
}

#[async_trait]
impl<B: Backend> Handler<RefreshTowers> for MapSession<B> {
    async fn handle(&mut self, message: RefreshTowers) {
        log::info!("loading towers");
        let Some((ticket, query)) = self.state.refresh_towers(message.bounds) else {
            return;
        };
        log::debug!("GET /towers?{}", query);
        let backend = self.backend.clone();
        self.dispatch(async move { backend.towers(query).await }, move |result| {
            TowersFetched { ticket, result }
        });
    }
}

#[async_trait]
impl<B: Backend> Handler<TowersFetched> for MapSession<B> {
    async fn handle(&mut self, message: TowersFetched) {
        self.state.towers_fetched(message.ticket, message.result);
        self.finished();
    }
}

#[async_trait]
impl<B: Backend> Handler<RefreshCoverageGaps> for MapSession<B> {
    async fn handle(&mut self, message: RefreshCoverageGaps) {
        let Some((ticket, query)) = self.state.refresh_coverage_gaps(message.bounds) else {
            return;
        };
        log::debug!("GET /low_coverage?{}", query);
        let backend = self.backend.clone();
        self.dispatch(
            async move { backend.coverage_gaps(query).await },
            move |result| CoverageGapsFetched { ticket, result },
        );
    }
}

#[async_trait]
impl<B: Backend> Handler<CoverageGapsFetched> for MapSession<B> {
    async fn handle(&mut self, message: CoverageGapsFetched) {
        self.state.coverage_gaps_fetched(message.ticket, message.result);
        self.finished();
    }
}

#[async_trait]
impl<B: Backend> Handler<LoadMapBounds> for MapSession<B> {
    async fn handle(&mut self, _: LoadMapBounds) {
        let backend = self.backend.clone();
        self.dispatch(async move { backend.map_bounds().await }, |result| {
            MapBoundsFetched { result }
        });
    }
}

#[async_trait]
impl<B: Backend> Handler<MapBoundsFetched> for MapSession<B> {
    async fn handle(&mut self, message: MapBoundsFetched) {
        self.state.map_bounds_fetched(message.result);
        self.finished();
    }
}

#[async_trait]
impl<B: Backend> Handler<Snapshot> for MapSession<B> {
    async fn handle(&mut self, _: Snapshot) -> MapView {
        let in_flight = *self.in_flight.borrow();
        self.state.view(in_flight)
    }
}

/// Entry point for everything that happens on the map. Every operation
/// returns once the session has handled it; requests it caused keep running
/// in the background.
pub struct MapSessionHandle<B: Backend> {
    actor: ActorRef<MapSession<B>>,
    in_flight: watch::Receiver<usize>,
}

impl<B: Backend> Clone for MapSessionHandle<B> {
    fn clone(&self) -> Self {
        Self {
            actor: self.actor.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<B: Backend> MapSessionHandle<B> {
    /// Primary click: place the start point.
    pub async fn click_start(&self, latlng: LatLng) -> SessionResult<()> {
        self.click(Role::Start, latlng).await
    }

    /// Secondary click: place the end point.
    pub async fn click_end(&self, latlng: LatLng) -> SessionResult<()> {
        self.click(Role::End, latlng).await
    }

    pub async fn click(&self, role: Role, latlng: LatLng) -> SessionResult<()> {
        Ok(self.actor.ask(Click { role, latlng }).await?)
    }

    pub async fn set_goal(&self, goal: Goal) -> SessionResult<()> {
        self.change(SelectionChange::Goal(goal)).await
    }

    pub async fn set_movement(&self, movement: Movement) -> SessionResult<()> {
        self.change(SelectionChange::Movement(movement)).await
    }

    pub async fn set_provider(&self, provider: ProviderSelection) -> SessionResult<()> {
        self.change(SelectionChange::Provider(provider)).await
    }

    pub async fn change(&self, change: SelectionChange) -> SessionResult<()> {
        Ok(self.actor.ask(ChangeSelection(change)).await?)
    }

    pub async fn set_selection(&self, selection: Selection) -> SessionResult<()> {
        Ok(self.actor.ask(SetSelection(selection)).await?)
    }

    pub async fn recompute(&self) -> SessionResult<()> {
        Ok(self.actor.ask(Recompute).await?)
    }

    /// Reloads the towers of the selected provider inside `bounds`, usually
    /// after the map stopped moving.
    pub async fn refresh_towers(&self, bounds: BoundingBox) -> SessionResult<()> {
        Ok(self.actor.ask(RefreshTowers { bounds }).await?)
    }

    pub async fn refresh_coverage_gaps(&self, bounds: BoundingBox) -> SessionResult<()> {
        Ok(self.actor.ask(RefreshCoverageGaps { bounds }).await?)
    }

    pub async fn load_map_bounds(&self) -> SessionResult<()> {
        Ok(self.actor.ask(LoadMapBounds).await?)
    }

    pub async fn view(&self) -> SessionResult<MapView> {
        Ok(self.actor.ask(Snapshot).await?)
    }

    /// Waits until every request issued so far has been answered and its
    /// answer handled.
    pub async fn settled(&self) -> SessionResult<()> {
        let mut in_flight = self.in_flight.clone();
        in_flight
            .wait_for(|count| *count == 0)
            .await
            .map(|_| ())
            .map_err(|_| SessionError::Closed)
    }
}
