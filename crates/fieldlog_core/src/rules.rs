//! Derived-metric rules over visit history.
//!
//! # Responsibility
//! - Own the single derivation of a call's return-visit/study standing.
//! - Own the meaning of "first visit" for return-visit counting.
//!
//! # Invariants
//! - Reports and the cached call flags both go through [`derive_standing`].
//! - Chronological ordering is stable: visits sharing a date keep their
//!   insertion order.

use crate::clock::{is_same_month_and_year, Clock};
use crate::model::entity::EntityId;
use crate::model::visit::Visit;

/// Visits needed before a call counts as a return visit.
pub const RETURN_VISIT_MIN_VISITS: usize = 2;
/// Visits needed before a call counts as a study.
pub const STUDY_MIN_VISITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallStanding {
    pub is_return_visit: bool,
    pub is_study: bool,
}

/// Which visit is the "first" one when skipping the initial call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitOrder {
    /// Earliest `date` first.
    #[default]
    Chronological,
    /// Storage insertion order.
    Insertion,
}

pub fn derive_standing(visit_count: usize) -> CallStanding {
    CallStanding {
        is_return_visit: visit_count >= RETURN_VISIT_MIN_VISITS,
        is_study: visit_count >= STUDY_MIN_VISITS,
    }
}

/// Standing of `call_id` computed from the full visit collection.
pub fn standing_for_call(visits: &[Visit], call_id: &EntityId) -> CallStanding {
    derive_standing(
        visits
            .iter()
            .filter(|visit| visit.call_id() == call_id)
            .count(),
    )
}

/// Visits of one call in the requested order.
pub fn visits_for_call<'a>(
    visits: &'a [Visit],
    call_id: &EntityId,
    order: VisitOrder,
) -> Vec<&'a Visit> {
    let mut call_visits = visits
        .iter()
        .filter(|visit| visit.call_id() == call_id)
        .collect::<Vec<_>>();
    if order == VisitOrder::Chronological {
        call_visits.sort_by_key(|visit| visit.date);
    }
    call_visits
}

/// Non-initial visits of one call that fall in `month`/`year`.
///
/// `call_visits` must already be in the order produced by [`visits_for_call`].
pub fn return_visits_in_month(
    call_visits: &[&Visit],
    month: u32,
    year: i32,
    clock: &dyn Clock,
) -> usize {
    call_visits
        .iter()
        .skip(1)
        .filter(|visit| is_same_month_and_year(&visit.date, month, year, clock))
        .count()
}

#[cfg(test)]
mod tests {
    use super::{derive_standing, return_visits_in_month, visits_for_call, VisitOrder};
    use crate::clock::ManualClock;
    use crate::model::entity::EntityId;
    use crate::model::visit::Visit;
    use chrono::DateTime;

    fn visit(call: &str, date: &str) -> Visit {
        Visit::new(
            EntityId::from(call),
            DateTime::parse_from_rfc3339(date).unwrap(),
        )
    }

    #[test]
    fn standing_thresholds() {
        assert!(!derive_standing(1).is_return_visit);
        assert!(derive_standing(2).is_return_visit);
        assert!(!derive_standing(3).is_study);
        assert!(derive_standing(4).is_study);
    }

    #[test]
    fn chronological_order_decides_the_first_visit() {
        let clock = ManualClock::at_utc(2024, 3, 20).unwrap();
        // Stored out of order: the March visit was entered before the
        // February one, but February is the real first visit.
        let visits = vec![
            visit("c1", "2024-03-05T10:00:00Z"),
            visit("c1", "2024-02-05T10:00:00Z"),
            visit("c2", "2024-03-06T10:00:00Z"),
        ];
        let call = EntityId::from("c1");

        let chronological = visits_for_call(&visits, &call, VisitOrder::Chronological);
        assert_eq!(return_visits_in_month(&chronological, 2, 2024, &clock), 1);

        let insertion = visits_for_call(&visits, &call, VisitOrder::Insertion);
        assert_eq!(return_visits_in_month(&insertion, 2, 2024, &clock), 0);
    }
}
