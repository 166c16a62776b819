use model::{
    overlay::{LayerGroup, RouteLine},
    provider::Provider,
    query::RouteQuery,
    route::{RouteResult, RouteSummary},
    selection::Selection,
};
use utility::id::{HasId, Id, IdGenerator};

use crate::{config::StalePolicy, overlay, FetchResult};

/// Tag of one recomputation and all route queries it fans out to.
pub struct Recompute;

impl HasId for Recompute {
    type IdType = u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTicket {
    pub generation: Id<Recompute>,
    pub provider: Option<Provider>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A route line was added and the display fields were updated.
    Drawn { stale: bool },
    /// The server found no path; only the display fields were updated.
    NoPath { stale: bool },
    /// The display fields were set to unknown.
    Failed,
    /// The answer belonged to an earlier recomputation and was dropped.
    Discarded,
}

/// Decides which route queries a selection needs and folds their answers
/// into the route layer group and the shared display fields.
#[derive(Debug, Default)]
pub struct QueryOrchestrator {
    rounds: IdGenerator<Recompute>,
}

impl QueryOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the route group and returns one query per provider filter of
    /// the selection. Labels are passed on as they are, even when empty.
    pub fn recompute(
        &mut self,
        selection: &Selection,
        start: &str,
        end: &str,
        routes: &mut LayerGroup<RouteLine>,
    ) -> Vec<(RouteTicket, RouteQuery)> {
        routes.clear();
        let generation = self.rounds.next_id();
        let queries = selection
            .provider
            .route_filters()
            .into_iter()
            .map(|provider| {
                (
                    RouteTicket {
                        generation,
                        provider,
                    },
                    RouteQuery::new(start, end, selection, provider),
                )
            })
            .collect::<Vec<_>>();
        log::info!(
            "recompute {}: {} route queries for {} -> {}",
            generation,
            queries.len(),
            start,
            end
        );
        queries
    }

    pub fn complete(
        &self,
        ticket: RouteTicket,
        result: FetchResult<RouteResult>,
        policy: StalePolicy,
        routes: &mut LayerGroup<RouteLine>,
        summary: &mut RouteSummary,
    ) -> RouteOutcome {
        let stale = !self.rounds.is_current(&ticket.generation);
        if stale && policy == StalePolicy::Discard {
            log::debug!(
                "discarding route of recompute {} ({})",
                ticket.generation,
                provider_name(ticket.provider)
            );
            return RouteOutcome::Discarded;
        }

        match result {
            Ok(route) => {
                summary.record(&route);
                match overlay::draw_route(routes, ticket.provider, &route) {
                    Some(_) => RouteOutcome::Drawn { stale },
                    None => {
                        log::info!("no path found ({})", provider_name(ticket.provider));
                        RouteOutcome::NoPath { stale }
                    }
                }
            }
            Err(why) => {
                log::warn!(
                    "route query failed ({}): {}",
                    provider_name(ticket.provider),
                    why
                );
                summary.mark_unknown();
                RouteOutcome::Failed
            }
        }
    }
}

fn provider_name(provider: Option<Provider>) -> &'static str {
    provider.map(|provider| provider.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use geojson::{Geometry, Value};
    use model::{
        provider::ProviderSelection,
        route::DisplayValue,
        selection::{Goal, Movement},
    };

    use super::*;
    use crate::FetchError;

    fn route(distance: f64) -> RouteResult {
        RouteResult {
            distance,
            travel_time: distance / 10.0,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![9.0, 48.0],
                vec![9.1, 48.1],
            ]))),
        }
    }

    fn selection(provider: ProviderSelection) -> Selection {
        Selection {
            goal: Goal::Speed,
            movement: Movement::Foot,
            provider,
        }
    }

    #[test]
    fn all_issues_four_queries() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let queries =
            orchestrator.recompute(&selection(ProviderSelection::All), "N1", "N2", &mut routes);
        assert_eq!(queries.len(), 4);
        let providers = queries.iter().map(|(_, q)| q.provider).collect::<Vec<_>>();
        assert_eq!(
            providers,
            vec![
                Some(Provider::Telekom),
                Some(Provider::Vodafone),
                Some(Provider::O2),
                None
            ]
        );
        assert!(queries
            .iter()
            .all(|(ticket, query)| ticket.provider == query.provider
                && query.goal == Goal::Speed
                && query.movement == Movement::Foot));
    }

    #[test]
    fn named_provider_issues_one_query() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let queries = orchestrator.recompute(
            &selection(ProviderSelection::Named(Provider::O2)),
            "N1",
            "N2",
            &mut routes,
        );
        assert_eq!(queries.len(), 1);
        assert_eq!(
            queries[0].1.to_string(),
            "s=N1&t=N2&goal=speed&move=foot&provider=o2"
        );
    }

    #[test]
    fn empty_labels_are_not_validated() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let queries = orchestrator.recompute(
            &selection(ProviderSelection::Unconstrained),
            "",
            "N2",
            &mut routes,
        );
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].1.start, "");
        assert_eq!(queries[0].1.provider, None);
    }

    #[test]
    fn recompute_clears_previous_routes() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();

        let queries =
            orchestrator.recompute(&selection(ProviderSelection::All), "N1", "N2", &mut routes);
        for (ticket, _) in queries {
            orchestrator.complete(
                ticket,
                Ok(route(1000.0)),
                StalePolicy::Discard,
                &mut routes,
                &mut summary,
            );
        }
        assert_eq!(routes.len(), 4);

        orchestrator.recompute(&selection(ProviderSelection::All), "N1", "N3", &mut routes);
        assert!(routes.is_empty());
    }

    #[test]
    fn failure_only_touches_display_fields() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();
        let queries =
            orchestrator.recompute(&selection(ProviderSelection::All), "N1", "N2", &mut routes);

        let mut outcomes = Vec::new();
        for (ticket, _) in queries {
            let result = if ticket.provider == Some(Provider::O2) {
                Err(FetchError::Status {
                    status: 500,
                    url: "/route".to_owned(),
                    body: None,
                })
            } else {
                Ok(route(1200.0))
            };
            outcomes.push(orchestrator.complete(
                ticket,
                result,
                StalePolicy::Discard,
                &mut routes,
                &mut summary,
            ));
        }
        assert_eq!(routes.len(), 3);
        assert_eq!(outcomes[2], RouteOutcome::Failed);
        // the failed query was not the last to complete
        assert_eq!(summary.distance, DisplayValue::Known(1200.0));
    }

    #[test]
    fn failure_arriving_last_marks_fields_unknown() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();
        let mut queries = orchestrator.recompute(
            &selection(ProviderSelection::All),
            "N1",
            "N2",
            &mut routes,
        );
        let (failing, _) = queries.remove(0);
        for (ticket, _) in queries {
            orchestrator.complete(
                ticket,
                Ok(route(700.0)),
                StalePolicy::Discard,
                &mut routes,
                &mut summary,
            );
        }
        orchestrator.complete(
            failing,
            Err(FetchError::Decode("truncated".to_owned())),
            StalePolicy::Discard,
            &mut routes,
            &mut summary,
        );
        assert_eq!(routes.len(), 3);
        assert_eq!(summary.distance, DisplayValue::Unknown);
        assert_eq!(summary.travel_time, DisplayValue::Unknown);
    }

    #[test]
    fn answers_of_earlier_recompute_are_discarded() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();
        let old = orchestrator.recompute(
            &selection(ProviderSelection::Named(Provider::Telekom)),
            "N1",
            "N2",
            &mut routes,
        );
        let new = orchestrator.recompute(
            &selection(ProviderSelection::Named(Provider::Vodafone)),
            "N1",
            "N2",
            &mut routes,
        );

        let outcome = orchestrator.complete(
            old[0].0,
            Ok(route(500.0)),
            StalePolicy::Discard,
            &mut routes,
            &mut summary,
        );
        assert_eq!(outcome, RouteOutcome::Discarded);
        assert!(routes.is_empty());
        assert_eq!(summary.distance, DisplayValue::Empty);

        orchestrator.complete(
            new[0].0,
            Ok(route(900.0)),
            StalePolicy::Discard,
            &mut routes,
            &mut summary,
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes.layers().next().unwrap().provider, Some(Provider::Vodafone));
    }

    #[test]
    fn answers_of_earlier_recompute_apply_when_configured() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();
        let old = orchestrator.recompute(
            &selection(ProviderSelection::Named(Provider::Telekom)),
            "N1",
            "N2",
            &mut routes,
        );
        orchestrator.recompute(
            &selection(ProviderSelection::Named(Provider::Vodafone)),
            "N1",
            "N2",
            &mut routes,
        );

        let outcome = orchestrator.complete(
            old[0].0,
            Ok(route(500.0)),
            StalePolicy::Apply,
            &mut routes,
            &mut summary,
        );
        assert_eq!(outcome, RouteOutcome::Drawn { stale: true });
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn missing_path_updates_fields_without_layer() {
        let mut orchestrator = QueryOrchestrator::new();
        let mut routes = LayerGroup::new();
        let mut summary = RouteSummary::default();
        let queries = orchestrator.recompute(
            &selection(ProviderSelection::Unconstrained),
            "N1",
            "N2",
            &mut routes,
        );
        let outcome = orchestrator.complete(
            queries[0].0,
            Ok(RouteResult {
                distance: 0.0,
                travel_time: 0.0,
                geometry: None,
            }),
            StalePolicy::Discard,
            &mut routes,
            &mut summary,
        );
        assert_eq!(outcome, RouteOutcome::NoPath { stale: false });
        assert!(routes.is_empty());
        assert_eq!(summary.distance.to_string(), "0");
    }
}
