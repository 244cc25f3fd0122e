//! Call + visit use-cases.
//!
//! # Responsibility
//! - Cascade call deletion to its visits.
//! - Keep the cached `is_study` / `is_return_visit` flags in step with the
//!   visit collection.
//!
//! # Invariants
//! - No visit ever points at a call that is not stored.
//! - After every mutation the touched calls' flags equal
//!   `rules::standing_for_call`.

use super::{ServiceError, ServiceResult};
use crate::clock::{Moment, SharedClock};
use crate::model::call::Call;
use crate::model::entity::EntityId;
use crate::model::visit::Visit;
use crate::rules::{standing_for_call, visits_for_call, VisitOrder};
use crate::storage::BlobStore;
use crate::store::EntityStore;
use chrono::Duration;
use log::info;

/// Window in which an upcoming next visit is flagged as "soon".
pub const NEXT_VISIT_SOON_DAYS: i64 = 4;

pub struct CallService<B: BlobStore + Clone> {
    calls: EntityStore<Call, B>,
    visits: EntityStore<Visit, B>,
}

impl<B: BlobStore + Clone> CallService<B> {
    /// Loads both collections and reconciles any stale cached flags.
    pub fn load(backend: B, clock: SharedClock) -> Self {
        let mut service = Self {
            calls: EntityStore::load(backend.clone(), clock.clone()),
            visits: EntityStore::load(backend, clock),
        };
        service.refresh_all_flags();
        service
    }

    pub fn calls(&self) -> &[Call] {
        self.calls.list()
    }

    pub fn visits(&self) -> &[Visit] {
        self.visits.list()
    }

    pub fn get_call(&self, id: &EntityId) -> Option<&Call> {
        self.calls.get(id)
    }

    pub fn get_visit(&self, id: &EntityId) -> Option<&Visit> {
        self.visits.get(id)
    }

    /// Creates or merges a call. Cached flags are re-derived afterwards,
    /// whatever the input carried.
    pub fn save_call(&mut self, call: Call) -> ServiceResult<()> {
        let id = call.id.clone();
        self.calls.upsert(call)?;
        self.refresh_flags(&id);
        Ok(())
    }

    /// Partial call update from a JSON object (`null` clears a field).
    pub fn patch_call(&mut self, id: &EntityId, patch: serde_json::Value) -> ServiceResult<()> {
        self.calls.upsert_patch(id, patch)?;
        self.refresh_flags(id);
        Ok(())
    }

    /// Creates or merges a visit.
    ///
    /// # Errors
    /// - `UnknownCall` when `visit.call.id` is not a stored call.
    pub fn save_visit(&mut self, visit: Visit) -> ServiceResult<()> {
        if !self.calls.contains(visit.call_id()) {
            return Err(ServiceError::UnknownCall(visit.call_id().clone()));
        }
        let previous_call = self
            .visits
            .get(&visit.id)
            .map(|stored| stored.call_id().clone());
        let call_id = visit.call_id().clone();

        self.visits.upsert(visit)?;

        self.refresh_flags(&call_id);
        if let Some(previous) = previous_call.filter(|previous| *previous != call_id) {
            self.refresh_flags(&previous);
        }
        Ok(())
    }

    /// Removes one visit. Absent ids are a no-op.
    pub fn delete_visit(&mut self, id: &EntityId) -> Option<Visit> {
        let removed = self.visits.remove(id)?;
        self.refresh_flags(removed.call_id());
        Some(removed)
    }

    /// Removes a call and every visit pointing at it.
    ///
    /// Returns the number of visits removed, or `None` when the call was
    /// not stored. Stray visits for an absent call are still swept.
    pub fn delete_call(&mut self, id: &EntityId) -> Option<usize> {
        let removed_visits = self.visits.remove_where(|visit| visit.call_id() == id).len();
        self.calls.remove(id)?;
        info!(
            "event=call_delete module=service status=ok cascaded_visits={removed_visits}"
        );
        Some(removed_visits)
    }

    /// Clears calls and visits together.
    pub fn delete_all_calls(&mut self) {
        self.visits.remove_all();
        self.calls.remove_all();
    }

    /// Visits of one call, oldest first or newest first.
    pub fn visits_for_call(&self, call_id: &EntityId, newest_first: bool) -> Vec<&Visit> {
        let mut visits = visits_for_call(self.visits.list(), call_id, VisitOrder::Chronological);
        if newest_first {
            visits.reverse();
        }
        visits
    }

    /// Latest visit by date; among equal dates the last stored wins.
    pub fn most_recent_visit(&self, call_id: &EntityId) -> Option<&Visit> {
        visits_for_call(self.visits.list(), call_id, VisitOrder::Chronological)
            .last()
            .copied()
    }

    /// Whether the most recent visit schedules a next visit inside
    /// `(now, now + 4 days)`.
    pub fn next_visit_is_soon(&self, call_id: &EntityId, now: &Moment) -> bool {
        let horizon = *now + Duration::days(NEXT_VISIT_SOON_DAYS);
        self.most_recent_visit(call_id)
            .and_then(|visit| visit.next_visit.as_ref())
            .is_some_and(|next| next.date > *now && next.date < horizon)
    }

    /// Case-insensitive substring match on the call name.
    pub fn search_calls(&self, query: &str) -> Vec<&Call> {
        let needle = query.trim().to_lowercase();
        self.calls
            .list()
            .iter()
            .filter(|call| call.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Re-derives the cached flags of every call.
    pub fn refresh_all_flags(&mut self) {
        let ids = self
            .calls
            .list()
            .iter()
            .map(|call| call.id.clone())
            .collect::<Vec<_>>();
        for id in ids {
            self.refresh_flags(&id);
        }
    }

    fn refresh_flags(&mut self, call_id: &EntityId) {
        let standing = standing_for_call(self.visits.list(), call_id);
        let stale = self.calls.get(call_id).is_some_and(|call| {
            call.is_study != standing.is_study || call.is_return_visit != standing.is_return_visit
        });
        if stale {
            self.calls.modify(call_id, |call| {
                call.is_study = standing.is_study;
                call.is_return_visit = standing.is_return_visit;
            });
        }
    }
}
