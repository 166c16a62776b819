use geojson::Geometry;
use model::{
    endpoint::{Endpoint, Role},
    overlay::{CoverageGapLine, LayerGroup, Popup, RouteLine, TowerCircle},
    query::{AreaQuery, NodeQuery, RouteQuery},
    route::{RouteResult, RouteSummary},
    selection::{Selection, SelectionChange},
    tower::Tower,
    BoundingBox, LatLng,
};
use serde::Serialize;

use crate::{
    config::{SessionConfig, StalePolicy},
    orchestrator::{QueryOrchestrator, RouteOutcome, RouteTicket},
    overlay::{GapRefresh, OverlayRenderer, RefreshOutcome, RefreshTicket, TowerRefresh},
    resolver::{CoordinateResolver, ResolveOutcome, ResolveTicket},
    FetchResult,
};

/// Everything the map shows, owned by a single controller. All mutation goes
/// through the methods below.
#[derive(Debug)]
pub struct MapState {
    stale_results: StalePolicy,
    selection: Selection,
    resolver: CoordinateResolver,
    orchestrator: QueryOrchestrator,
    renderer: OverlayRenderer,
    start_popup: Option<Popup>,
    end_popup: Option<Popup>,
    routes: LayerGroup<RouteLine>,
    towers: LayerGroup<TowerCircle>,
    coverage_gaps: LayerGroup<CoverageGapLine>,
    summary: RouteSummary,
    map_bounds: Option<BoundingBox>,
    discarded_completions: u64,
}

impl MapState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            stale_results: config.stale_results,
            selection: config.initial_selection,
            resolver: CoordinateResolver::new(),
            orchestrator: QueryOrchestrator::new(),
            renderer: OverlayRenderer::new(),
            start_popup: None,
            end_popup: None,
            routes: LayerGroup::new(),
            towers: LayerGroup::new(),
            coverage_gaps: LayerGroup::new(),
            summary: RouteSummary::default(),
            map_bounds: None,
            discarded_completions: 0,
        }
    }

    /// Shows the popup at once and returns the lookup to issue.
    pub fn click(&mut self, role: Role, latlng: LatLng) -> (ResolveTicket, NodeQuery) {
        let popup = Popup::new(role, latlng);
        match role {
            Role::Start => self.start_popup = Some(popup),
            Role::End => self.end_popup = Some(popup),
        }
        self.resolver.begin(role, latlng)
    }

    /// Stores a lookup answer. Returns the route queries to issue if the
    /// answer changed a label.
    pub fn node_resolved(
        &mut self,
        ticket: ResolveTicket,
        result: FetchResult<String>,
    ) -> Vec<(RouteTicket, RouteQuery)> {
        match self.resolver.complete(ticket, result, self.stale_results) {
            ResolveOutcome::Resolved { .. } => self.recompute(),
            ResolveOutcome::Failed => Vec::new(),
            ResolveOutcome::Discarded => {
                self.discarded_completions += 1;
                Vec::new()
            }
        }
    }

    /// Applies a radio change. Returns the route queries to issue, none if
    /// the selection did not actually change.
    pub fn change_selection(&mut self, change: SelectionChange) -> Vec<(RouteTicket, RouteQuery)> {
        let mut selection = self.selection;
        selection.apply(change);
        self.set_selection(selection)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Vec<(RouteTicket, RouteQuery)> {
        if selection == self.selection {
            return Vec::new();
        }
        self.selection = selection;
        self.recompute()
    }

    pub fn recompute(&mut self) -> Vec<(RouteTicket, RouteQuery)> {
        let start = self.resolver.label(Role::Start).to_owned();
        let end = self.resolver.label(Role::End).to_owned();
        self.orchestrator
            .recompute(&self.selection, &start, &end, &mut self.routes)
    }

    pub fn route_finished(
        &mut self,
        ticket: RouteTicket,
        result: FetchResult<RouteResult>,
    ) -> RouteOutcome {
        let outcome = self.orchestrator.complete(
            ticket,
            result,
            self.stale_results,
            &mut self.routes,
            &mut self.summary,
        );
        if outcome == RouteOutcome::Discarded {
            self.discarded_completions += 1;
        }
        outcome
    }

    pub fn refresh_towers(
        &mut self,
        bounds: BoundingBox,
    ) -> Option<(RefreshTicket<TowerRefresh>, AreaQuery)> {
        self.renderer
            .begin_towers(bounds, self.selection.provider, &mut self.towers)
    }

    pub fn towers_fetched(
        &mut self,
        ticket: RefreshTicket<TowerRefresh>,
        result: FetchResult<Vec<Tower>>,
    ) -> RefreshOutcome {
        let outcome =
            self.renderer
                .complete_towers(ticket, result, self.stale_results, &mut self.towers);
        if outcome == RefreshOutcome::Discarded {
            self.discarded_completions += 1;
        }
        outcome
    }

    pub fn refresh_coverage_gaps(
        &mut self,
        bounds: BoundingBox,
    ) -> Option<(RefreshTicket<GapRefresh>, AreaQuery)> {
        self.renderer
            .begin_coverage_gaps(bounds, self.selection.provider, &mut self.coverage_gaps)
    }

    pub fn coverage_gaps_fetched(
        &mut self,
        ticket: RefreshTicket<GapRefresh>,
        result: FetchResult<Vec<Geometry>>,
    ) -> RefreshOutcome {
        let outcome = self.renderer.complete_coverage_gaps(
            ticket,
            result,
            self.stale_results,
            &mut self.coverage_gaps,
        );
        if outcome == RefreshOutcome::Discarded {
            self.discarded_completions += 1;
        }
        outcome
    }

    pub fn map_bounds_fetched(&mut self, result: FetchResult<BoundingBox>) {
        match result {
            Ok(bounds) => self.map_bounds = Some(bounds),
            Err(why) => log::warn!("could not load map bounds: {}", why),
        }
    }

    pub fn view(&self, in_flight: usize) -> MapView {
        MapView {
            selection: self.selection,
            start: self.resolver.endpoint(Role::Start).cloned(),
            end: self.resolver.endpoint(Role::End).cloned(),
            popups: self
                .start_popup
                .iter()
                .chain(self.end_popup.iter())
                .cloned()
                .collect(),
            summary: self.summary,
            routes: self.routes.clone(),
            towers: self.towers.clone(),
            coverage_gaps: self.coverage_gaps.clone(),
            map_bounds: self.map_bounds,
            in_flight,
            discarded_completions: self.discarded_completions,
        }
    }
}

/// Snapshot of the map at one point in time.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub selection: Selection,
    pub start: Option<Endpoint>,
    pub end: Option<Endpoint>,
    pub popups: Vec<Popup>,
    pub summary: RouteSummary,
    pub routes: LayerGroup<RouteLine>,
    pub towers: LayerGroup<TowerCircle>,
    pub coverage_gaps: LayerGroup<CoverageGapLine>,
    pub map_bounds: Option<BoundingBox>,
    /// Requests issued by the session whose answer has not been handled yet.
    pub in_flight: usize,
    pub discarded_completions: u64,
}

impl MapView {
    pub fn endpoint(&self, role: Role) -> Option<&Endpoint> {
        match role {
            Role::Start => self.start.as_ref(),
            Role::End => self.end.as_ref(),
        }
    }

    pub fn popup(&self, role: Role) -> Option<&Popup> {
        self.popups.iter().find(|popup| popup.role == role)
    }
}
