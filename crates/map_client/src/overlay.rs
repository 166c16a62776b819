use geojson::Geometry;
use model::{
    overlay::{CoverageGapLine, LayerGroup, PathStyle, RouteLine, TowerCircle},
    provider::{route_color, Provider, ProviderSelection},
    query::AreaQuery,
    route::RouteResult,
    tower::Tower,
    BoundingBox,
};
use utility::id::{HasId, Id, IdGenerator};

use crate::{config::StalePolicy, FetchResult};

/// Adds the geometry of `result` as a new route line. Routes without a
/// geometry (no path found) leave the group untouched.
pub fn draw_route(
    group: &mut LayerGroup<RouteLine>,
    provider: Option<Provider>,
    result: &RouteResult,
) -> Option<Id<RouteLine>> {
    let geometry = result.geometry.clone()?;
    Some(group.add(RouteLine {
        provider,
        geometry,
        style: PathStyle::route(route_color(provider)),
    }))
}

/// Replaces the group's content with one circle per tower.
pub fn draw_towers(group: &mut LayerGroup<TowerCircle>, provider: Provider, towers: &[Tower]) {
    group.clear();
    for tower in towers {
        group.add(TowerCircle {
            provider,
            center: tower.center(),
            radius_m: tower.radius_m(),
            style: PathStyle::tower(provider.color()),
        });
    }
}

/// Replaces the group's content with one line per gap geometry.
pub fn draw_coverage_gaps(
    group: &mut LayerGroup<CoverageGapLine>,
    provider: Provider,
    geometries: &[Geometry],
) {
    group.clear();
    for geometry in geometries {
        group.add(CoverageGapLine {
            provider,
            geometry: geometry.clone(),
            style: PathStyle::coverage_gap(provider.color()),
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TowerRefresh;

impl HasId for TowerRefresh {
    type IdType = u64;
}

#[derive(Debug, Clone, Copy)]
pub struct GapRefresh;

impl HasId for GapRefresh {
    type IdType = u64;
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshTicket<K: HasId<IdType = u64>> {
    pub generation: Id<K>,
    pub provider: Provider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The group now holds this many layers.
    Drawn(usize),
    Failed,
    Discarded,
}

/// Tracks the refreshes of the viewport bound overlays. Only the newest
/// refresh of each kind is current.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    tower_refreshes: IdGenerator<TowerRefresh>,
    gap_refreshes: IdGenerator<GapRefresh>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tower refresh for the provider selected right now. Without a
    /// single named provider there is nothing to ask for; the group is
    /// emptied instead.
    pub fn begin_towers(
        &mut self,
        bounds: BoundingBox,
        selection: ProviderSelection,
        group: &mut LayerGroup<TowerCircle>,
    ) -> Option<(RefreshTicket<TowerRefresh>, AreaQuery)> {
        let begun = begin_area(&mut self.tower_refreshes, bounds, selection);
        if begun.is_none() {
            log::debug!("no towers for provider selection {}", selection);
            group.clear();
        }
        begun
    }

    pub fn complete_towers(
        &self,
        ticket: RefreshTicket<TowerRefresh>,
        result: FetchResult<Vec<Tower>>,
        policy: StalePolicy,
        group: &mut LayerGroup<TowerCircle>,
    ) -> RefreshOutcome {
        settle(&self.tower_refreshes, ticket, result, policy, "towers", |towers| {
            draw_towers(group, ticket.provider, &towers);
            group.len()
        })
    }

    pub fn begin_coverage_gaps(
        &mut self,
        bounds: BoundingBox,
        selection: ProviderSelection,
        group: &mut LayerGroup<CoverageGapLine>,
    ) -> Option<(RefreshTicket<GapRefresh>, AreaQuery)> {
        let begun = begin_area(&mut self.gap_refreshes, bounds, selection);
        if begun.is_none() {
            log::debug!("no coverage gaps for provider selection {}", selection);
            group.clear();
        }
        begun
    }

    pub fn complete_coverage_gaps(
        &self,
        ticket: RefreshTicket<GapRefresh>,
        result: FetchResult<Vec<Geometry>>,
        policy: StalePolicy,
        group: &mut LayerGroup<CoverageGapLine>,
    ) -> RefreshOutcome {
        settle(
            &self.gap_refreshes,
            ticket,
            result,
            policy,
            "coverage gaps",
            |geometries| {
                draw_coverage_gaps(group, ticket.provider, &geometries);
                group.len()
            },
        )
    }
}

fn begin_area<K: HasId<IdType = u64>>(
    refreshes: &mut IdGenerator<K>,
    bounds: BoundingBox,
    selection: ProviderSelection,
) -> Option<(RefreshTicket<K>, AreaQuery)> {
    // superseding happens even without a request, so older answers can not
    // paint over the emptied group
    let generation = refreshes.next_id();
    let provider = selection.overlay_provider()?;
    Some((
        RefreshTicket {
            generation,
            provider,
        },
        AreaQuery { bounds, provider },
    ))
}

fn settle<K, T, F>(
    refreshes: &IdGenerator<K>,
    ticket: RefreshTicket<K>,
    result: FetchResult<T>,
    policy: StalePolicy,
    kind: &str,
    draw: F,
) -> RefreshOutcome
where
    K: HasId<IdType = u64>,
    F: FnOnce(T) -> usize,
{
    let stale = !refreshes.is_current(&ticket.generation);
    match result {
        Ok(_) if stale && policy == StalePolicy::Discard => {
            log::debug!("discarding superseded {} refresh {}", kind, ticket.generation);
            RefreshOutcome::Discarded
        }
        Ok(content) => {
            let drawn = draw(content);
            log::debug!("drew {} {} of {}", drawn, kind, ticket.provider);
            RefreshOutcome::Drawn(drawn)
        }
        Err(why) => {
            log::warn!("could not load {} of {}: {}", kind, ticket.provider, why);
            RefreshOutcome::Failed
        }
    }
}
