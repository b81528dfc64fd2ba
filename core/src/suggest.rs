//! Auto-suggestion engine: ranked volunteer picks for open ministry slots.
//!
//! For each requested ministry, in request order:
//!   1. Skip the ministry unless the caller may manage it.
//!   2. Filter volunteers: member of the ministry, not already on the target
//!      service, not picked for another ministry in this run, not unavailable
//!      on the date, not booked on another service that day.
//!   3. Rank by composite history score, highest first. Ties keep roster order.
//!   4. Take the top `slots`; report the shortfall as `missing_slots`.
//!
//! Pure computation over a `ScheduleSnapshot`. Nothing is written here.

use crate::{
    availability::is_unavailable,
    conflict::bookings_on_date,
    error::{RotaError, RotaResult},
    history::{composite_score, score_volunteer},
    roster::{Caller, Volunteer},
    service::Service,
    snapshot::ScheduleSnapshot,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub ministry_id: EntityId,
    pub slots: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub ministry_id: EntityId,
    pub ministry_name: String,
    pub requested_slots: u32,
    pub suggested_volunteer_ids: Vec<EntityId>,
    pub missing_slots: u32,
}

pub fn suggest(
    target: &Service,
    requests: &[SlotRequest],
    snapshot: &ScheduleSnapshot,
    caller: &Caller,
) -> RotaResult<Vec<Suggestion>> {
    let total_slots: u64 = requests.iter().map(|r| u64::from(r.slots)).sum();
    if total_slots == 0 {
        return Err(RotaError::validation(
            "request at least one slot before asking for suggestions",
        ));
    }

    let mut taken: HashSet<&str> = HashSet::new();
    let mut scores: HashMap<&str, f64> = HashMap::new();
    let mut suggestions = Vec::new();

    for request in requests.iter().filter(|r| r.slots > 0) {
        if !caller.can_manage(&request.ministry_id) {
            log::debug!(
                "suggest: caller {} skipped ministry {} (not led)",
                caller.volunteer_id,
                request.ministry_id
            );
            continue;
        }

        let mut ranked: Vec<(&Volunteer, f64)> = snapshot
            .volunteers
            .iter()
            .filter(|v| !taken.contains(v.volunteer_id.as_str()))
            .filter(|v| is_eligible(v, &request.ministry_id, target, snapshot))
            .map(|v| {
                let score = *scores.entry(v.volunteer_id.as_str()).or_insert_with(|| {
                    composite_score(&score_volunteer(&v.volunteer_id, target.date, &snapshot.services))
                });
                (v, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let picked: Vec<EntityId> = ranked
            .iter()
            .take(request.slots as usize)
            .map(|(v, _)| v.volunteer_id.clone())
            .collect();
        for (v, _) in ranked.iter().take(picked.len()) {
            taken.insert(v.volunteer_id.as_str());
        }

        log::debug!(
            "suggest: service={} ministry={} eligible={} picked={}",
            target.service_id,
            request.ministry_id,
            ranked.len(),
            picked.len()
        );

        let missing_slots = request.slots.saturating_sub(picked.len() as u32);
        suggestions.push(Suggestion {
            ministry_id: request.ministry_id.clone(),
            ministry_name: snapshot
                .ministry_name(&request.ministry_id)
                .unwrap_or(request.ministry_id.as_str())
                .to_string(),
            requested_slots: request.slots,
            suggested_volunteer_ids: picked,
            missing_slots,
        });
    }

    Ok(suggestions)
}

fn is_eligible(v: &Volunteer, ministry_id: &str, target: &Service, snapshot: &ScheduleSnapshot) -> bool {
    v.organization_id == target.organization_id
        && v.belongs_to(ministry_id)
        && !target.assignments.contains_volunteer(&v.volunteer_id)
        && is_unavailable(&v.volunteer_id, target.date, &snapshot.unavailability).is_none()
        && bookings_on_date(&v.volunteer_id, target.date, &target.service_id, &snapshot.services)
            .next()
            .is_none()
}

/// Every suggested id across ministries, first occurrence wins.
pub fn suggested_ids(suggestions: &[Suggestion]) -> Vec<&str> {
    let mut seen = HashSet::new();
    suggestions
        .iter()
        .flat_map(|s| s.suggested_volunteer_ids.iter().map(String::as_str))
        .filter(|id| seen.insert(*id))
        .collect()
}
