//! Fairness and reliability statistics from a volunteer's past assignments.
//!
//! Pure functions over an explicit cutoff date. No hidden "now".

use crate::{
    assignment::AssignmentStatus,
    service::Service,
    types::ServiceDate,
};
use chrono::Duration;
use serde::Serialize;

// ── Constants ────────────────────────────────────────────────────────────────

/// Length of the rolling load window.
pub const RECENT_WINDOW_WEEKS: i64 = 8;
/// Reported when the volunteer has never been assigned.
pub const NEVER_ASSIGNED_DAYS: i64 = 999;

pub const BALANCE_BASE: f64 = 40.0;
pub const BALANCE_PER_RECENT: f64 = 6.0;
pub const RELIABILITY_WEIGHT: f64 = 25.0;
pub const RELIABILITY_NEWCOMER: f64 = 12.0;
pub const RECENCY_CAP: f64 = 20.0;
pub const RECENCY_SATURATION_DAYS: f64 = 60.0;
pub const DECLINE_PENALTY_PER: f64 = 2.0;
pub const DECLINE_PENALTY_CAP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_assignments: u32,
    pub confirmed_assignments: u32,
    pub declined_assignments: u32,
    pub recent_assignments_8w: u32,
    pub days_since_last_assignment: i64,
}

/// Gather statistics from every service strictly before `cutoff`.
/// A service counts once per volunteer, with the status of its first entry.
pub fn score_volunteer(volunteer_id: &str, cutoff: ServiceDate, services: &[Service]) -> HistoryStats {
    let window_start = cutoff - Duration::weeks(RECENT_WINDOW_WEEKS);

    let mut stats = HistoryStats {
        total_assignments: 0,
        confirmed_assignments: 0,
        declined_assignments: 0,
        recent_assignments_8w: 0,
        days_since_last_assignment: NEVER_ASSIGNED_DAYS,
    };
    let mut last: Option<ServiceDate> = None;

    for service in services.iter().filter(|s| s.date < cutoff) {
        let Some(entry) = service.assignments.volunteer(volunteer_id) else {
            continue;
        };
        stats.total_assignments += 1;
        match entry.status {
            AssignmentStatus::Confirmed => stats.confirmed_assignments += 1,
            AssignmentStatus::Declined => stats.declined_assignments += 1,
            AssignmentStatus::Pending => {}
        }
        if service.date >= window_start {
            stats.recent_assignments_8w += 1;
        }
        last = last.max(Some(service.date));
    }

    if let Some(last) = last {
        stats.days_since_last_assignment = (cutoff - last).num_days();
    }
    stats
}

/// Ranking value: balance + reliability + recency − decline penalty.
///
/// A volunteer with no history scores 0 for recency: the newcomer reliability
/// default already gives them a fair start.
pub fn composite_score(stats: &HistoryStats) -> f64 {
    let balance = (BALANCE_BASE - stats.recent_assignments_8w as f64 * BALANCE_PER_RECENT).max(0.0);

    let reliability = if stats.total_assignments > 0 {
        stats.confirmed_assignments as f64 / stats.total_assignments as f64 * RELIABILITY_WEIGHT
    } else {
        RELIABILITY_NEWCOMER
    };

    let recency = if stats.total_assignments > 0 {
        (stats.days_since_last_assignment as f64 / RECENCY_SATURATION_DAYS * RECENCY_CAP)
            .min(RECENCY_CAP)
    } else {
        0.0
    };

    let penalty = (stats.declined_assignments as f64 * DECLINE_PENALTY_PER).min(DECLINE_PENALTY_CAP);

    balance + reliability + recency - penalty
}
