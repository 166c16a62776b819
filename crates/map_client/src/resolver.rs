use model::{
    endpoint::{Endpoint, Role},
    query::NodeQuery,
    LatLng,
};
use utility::id::{HasId, Id, IdGenerator};

use crate::{config::StalePolicy, FetchResult};

/// Tag of the node lookups issued for one role.
pub struct NodeLookup;

impl HasId for NodeLookup {
    type IdType = u64;
}

/// Identifies one node lookup. Lookups of different roles never share a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveTicket {
    pub role: Role,
    pub generation: Id<NodeLookup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The label was stored; routes have to be recomputed.
    Resolved { stale: bool },
    /// The label was left untouched.
    Failed,
    /// The answer belonged to a superseded click and was dropped.
    Discarded,
}

/// Owns the start and end points and turns clicks into node lookups.
#[derive(Debug, Default)]
pub struct CoordinateResolver {
    start: Option<Endpoint>,
    end: Option<Endpoint>,
    start_lookups: IdGenerator<NodeLookup>,
    end_lookups: IdGenerator<NodeLookup>,
}

impl CoordinateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(&self, role: Role) -> Option<&Endpoint> {
        match role {
            Role::Start => self.start.as_ref(),
            Role::End => self.end.as_ref(),
        }
    }

    /// Label to route from or to. Empty if the role was never resolved.
    pub fn label(&self, role: Role) -> &str {
        self.endpoint(role)
            .map(|endpoint| endpoint.node_label.as_str())
            .unwrap_or("")
    }

    /// Places the endpoint of `role` at `latlng` and hands out the lookup
    /// for it. Any earlier lookup of the same role is superseded.
    pub fn begin(&mut self, role: Role, latlng: LatLng) -> (ResolveTicket, NodeQuery) {
        let (slot, lookups) = self.slot_mut(role);
        if let Some(endpoint) = slot.as_mut() {
            endpoint.relocate(latlng);
        } else {
            *slot = Some(Endpoint::new(role, latlng));
        }
        let ticket = ResolveTicket {
            role,
            generation: lookups.next_id(),
        };
        (ticket, NodeQuery { position: latlng })
    }

    pub fn complete(
        &mut self,
        ticket: ResolveTicket,
        result: FetchResult<String>,
        policy: StalePolicy,
    ) -> ResolveOutcome {
        let (slot, lookups) = self.slot_mut(ticket.role);
        let stale = !lookups.is_current(&ticket.generation);
        let Some(endpoint) = slot else {
            log::warn!("lookup for {} completed without endpoint", ticket.role);
            return ResolveOutcome::Discarded;
        };

        match result {
            Ok(_) if stale && policy == StalePolicy::Discard => {
                log::debug!(
                    "discarding superseded {} lookup {}",
                    ticket.role,
                    ticket.generation
                );
                ResolveOutcome::Discarded
            }
            Ok(label) => {
                log::info!("{} resolved to node {}", ticket.role, label);
                endpoint.resolve(label);
                ResolveOutcome::Resolved { stale }
            }
            // only the newest lookup decides about the error state
            Err(why) if stale => {
                log::debug!("superseded {} lookup failed: {}", ticket.role, why);
                ResolveOutcome::Discarded
            }
            Err(why) => {
                log::warn!("could not resolve {}: {}", ticket.role, why);
                endpoint.fail(why.to_string());
                ResolveOutcome::Failed
            }
        }
    }

    fn slot_mut(&mut self, role: Role) -> (&mut Option<Endpoint>, &mut IdGenerator<NodeLookup>) {
        match role {
            Role::Start => (&mut self.start, &mut self.start_lookups),
            Role::End => (&mut self.end, &mut self.end_lookups),
        }
    }
}
