//! Recurring service series.
//!
//! A series is just a batch of services created together. Nothing links the
//! members afterwards; each one is edited and deleted independently.

use crate::{
    error::{RotaError, RotaResult},
    service::NewService,
    types::{EntityId, ServiceDate},
};
use chrono::Days;
use serde::{Deserialize, Serialize};

/// Upper bound on a single batch, roughly two years of weekly services.
pub const MAX_OCCURRENCES: u32 = 104;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub organization_id: EntityId,
    pub title: Option<String>,
    pub event_type_id: Option<EntityId>,
    pub first_date: ServiceDate,
    pub interval_weeks: u32,
    pub occurrences: u32,
}

pub fn plan_series(request: &SeriesRequest) -> RotaResult<Vec<NewService>> {
    if request.occurrences == 0 {
        return Err(RotaError::validation("a series needs at least one occurrence"));
    }
    if request.occurrences > MAX_OCCURRENCES {
        return Err(RotaError::validation(format!(
            "a series may not exceed {MAX_OCCURRENCES} occurrences"
        )));
    }
    if request.interval_weeks == 0 {
        return Err(RotaError::validation("series interval must be at least one week"));
    }

    let step_days = u64::from(request.interval_weeks) * 7;
    (0..request.occurrences)
        .map(|i| {
            let date = request
                .first_date
                .checked_add_days(Days::new(step_days * u64::from(i)))
                .ok_or_else(|| {
                    RotaError::validation(format!(
                        "occurrence {} falls outside the supported calendar",
                        i + 1
                    ))
                })?;
            Ok(NewService {
                service_id: uuid::Uuid::new_v4().to_string(),
                organization_id: request.organization_id.clone(),
                date,
                title: request.title.clone(),
                event_type_id: request.event_type_id.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn request(occurrences: u32, interval_weeks: u32) -> SeriesRequest {
        SeriesRequest {
            organization_id: "org".into(),
            title: Some("Sunday Worship".into()),
            event_type_id: None,
            first_date: ServiceDate::from_ymd_opt(2024, 1, 7).unwrap(),
            interval_weeks,
            occurrences,
        }
    }

    #[test]
    fn weekly_series_spaced_by_interval() {
        let planned = plan_series(&request(3, 2)).unwrap();
        let dates: Vec<String> = planned.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-07", "2024-01-21", "2024-02-04"]);
    }

    #[test]
    fn every_occurrence_gets_a_distinct_id() {
        let planned = plan_series(&request(5, 1)).unwrap();
        let ids: HashSet<&str> = planned.iter().map(|s| s.service_id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn interval_past_the_calendar_is_rejected() {
        let err = plan_series(&request(MAX_OCCURRENCES, 2_000_000)).unwrap_err();
        assert!(matches!(err, RotaError::Validation { .. }), "got {err:?}");
    }

    #[test]
    fn zero_occurrences_or_interval_rejected() {
        assert!(matches!(plan_series(&request(0, 1)), Err(RotaError::Validation { .. })));
        assert!(matches!(plan_series(&request(3, 0)), Err(RotaError::Validation { .. })));
    }
}
