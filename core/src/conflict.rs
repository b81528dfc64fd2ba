//! Same-day double-booking detection.
//!
//! Detection only surfaces existing double-bookings. Blocking an addition
//! is the caller's decision (see `Scheduler::add_volunteer`).

use crate::{
    service::Service,
    types::{EntityId, ServiceDate},
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Volunteer id → display titles of the other same-day services they are on.
pub type ConflictMap = BTreeMap<EntityId, BTreeSet<String>>;

/// For every volunteer on `target`, collect the titles of other services on
/// the same date that also carry that volunteer (any status). Volunteers
/// without conflicts are omitted.
pub fn find_same_day_conflicts(
    target: &Service,
    all_services: &[Service],
    date_format: &str,
) -> ConflictMap {
    let same_day: Vec<&Service> = other_services_on(target.date, &target.service_id, all_services)
        .collect();

    let mut conflicts = ConflictMap::new();
    for volunteer_id in target.assignments.volunteer_ids() {
        let titles: BTreeSet<String> = same_day
            .iter()
            .filter(|s| s.assignments.contains_volunteer(volunteer_id))
            .map(|s| s.display_title(date_format))
            .collect();
        if !titles.is_empty() {
            conflicts.insert(volunteer_id.to_string(), titles);
        }
    }
    conflicts
}

/// Services on `date`, other than `exclude_service_id`, that already carry
/// `volunteer_id`. Used before adding a volunteer.
pub fn bookings_on_date<'a>(
    volunteer_id: &'a str,
    date: ServiceDate,
    exclude_service_id: &'a str,
    all_services: &'a [Service],
) -> impl Iterator<Item = &'a Service> + 'a {
    other_services_on(date, exclude_service_id, all_services)
        .filter(move |s| s.assignments.contains_volunteer(volunteer_id))
}

fn other_services_on<'a>(
    date: ServiceDate,
    exclude_service_id: &'a str,
    all_services: &'a [Service],
) -> impl Iterator<Item = &'a Service> + 'a {
    all_services
        .iter()
        .filter(move |s| s.date == date && s.service_id != exclude_service_id)
}

// ── Preview ──────────────────────────────────────────────────────────────────

/// A bounded, UI-facing summary of one volunteer's conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPreview {
    pub volunteer_id: EntityId,
    pub examples: Vec<String>,
    /// Conflicting titles not listed in `examples`.
    pub overflow: usize,
}

/// At most `limit` example titles per volunteer plus an overflow count.
/// The underlying map is never truncated.
pub fn preview_conflicts(conflicts: &ConflictMap, limit: usize) -> Vec<ConflictPreview> {
    conflicts
        .iter()
        .map(|(volunteer_id, titles)| ConflictPreview {
            volunteer_id: volunteer_id.clone(),
            examples: titles.iter().take(limit).cloned().collect(),
            overflow: titles.len().saturating_sub(limit),
        })
        .collect()
}

/// Total number of (volunteer, other service) conflict pairs.
pub fn total_conflicts(conflicts: &ConflictMap) -> usize {
    conflicts.values().map(BTreeSet::len).sum()
}
