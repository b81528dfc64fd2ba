//! Volunteer unavailability windows.

use crate::types::{EntityId, ServiceDate};
use serde::{Deserialize, Serialize};

/// A volunteer-declared date range, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub volunteer_id: EntityId,
    pub start_date: ServiceDate,
    pub end_date: ServiceDate,
    pub reason: Option<String>,
}

impl UnavailabilityWindow {
    pub fn covers(&self, date: ServiceDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// The window blocking `volunteer_id` on `date`, if any.
///
/// When several windows overlap the date, the one with the earliest start
/// date wins (then earliest end date, then input order).
pub fn is_unavailable<'a>(
    volunteer_id: &str,
    date: ServiceDate,
    windows: &'a [UnavailabilityWindow],
) -> Option<&'a UnavailabilityWindow> {
    windows
        .iter()
        .filter(|w| w.volunteer_id == volunteer_id && w.covers(date))
        .min_by_key(|w| (w.start_date, w.end_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> ServiceDate {
        ServiceDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window(v: &str, start: ServiceDate, end: ServiceDate, reason: &str) -> UnavailabilityWindow {
        UnavailabilityWindow {
            volunteer_id: v.into(),
            start_date: start,
            end_date: end,
            reason: Some(reason.into()),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let w = [window("v1", d(2024, 7, 1), d(2024, 7, 14), "trip")];
        assert!(is_unavailable("v1", d(2024, 7, 1), &w).is_some());
        assert!(is_unavailable("v1", d(2024, 7, 14), &w).is_some());
        assert!(is_unavailable("v1", d(2024, 6, 30), &w).is_none());
        assert!(is_unavailable("v1", d(2024, 7, 15), &w).is_none());
    }

    #[test]
    fn other_volunteers_windows_ignored() {
        let w = [window("v2", d(2024, 7, 1), d(2024, 7, 14), "trip")];
        assert!(is_unavailable("v1", d(2024, 7, 5), &w).is_none());
    }

    #[test]
    fn earliest_overlapping_window_returned() {
        let w = [
            window("v1", d(2024, 7, 5), d(2024, 7, 6), "later"),
            window("v1", d(2024, 7, 1), d(2024, 7, 31), "earlier"),
        ];
        let hit = is_unavailable("v1", d(2024, 7, 5), &w).unwrap();
        assert_eq!(hit.reason.as_deref(), Some("earlier"));
    }
}
