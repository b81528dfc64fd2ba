//! Demo roster seeding for a fresh database.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use rota_core::{
    assignment::AssignmentStatus,
    availability::UnavailabilityWindow,
    recurrence::SeriesRequest,
    roster::{AccessLevel, Ministry, MinistryMembership, Volunteer},
    scheduler::Scheduler,
    types::EntityId,
};

const MINISTRIES: &[(&str, &str)] = &[
    ("louvor", "Louvor"),
    ("midia", "Mídia"),
    ("recepcao", "Recepção"),
    ("infantil", "Infantil"),
];

/// (id, name, [(ministry, is_leader)])
const VOLUNTEERS: &[(&str, &str, &[(&str, bool)])] = &[
    ("ana", "Ana Souza", &[("louvor", true)]),
    ("bruno", "Bruno Lima", &[("louvor", false), ("midia", false)]),
    ("carla", "Carla Dias", &[("louvor", false)]),
    ("davi", "Davi Rocha", &[("midia", true)]),
    ("elisa", "Elisa Prado", &[("midia", false), ("recepcao", false)]),
    ("felipe", "Felipe Nunes", &[("recepcao", false)]),
    ("gabi", "Gabriela Melo", &[("recepcao", false), ("infantil", true)]),
    ("heitor", "Heitor Alves", &[("infantil", false)]),
    ("iris", "Íris Castro", &[("infantil", false), ("louvor", false)]),
];

/// The first Sunday on or after `today`.
pub fn next_sunday(today: NaiveDate) -> NaiveDate {
    let offset = (7 - today.weekday().num_days_from_sunday()) % 7;
    today + Duration::days(i64::from(offset))
}

/// Seed one organization: ministries, volunteers, eight weeks of past
/// Sunday services with history, four upcoming ones, and one absence.
/// Returns the ids of the upcoming services, earliest first.
pub fn seed(scheduler: &Scheduler, organization_id: &str, anchor: NaiveDate) -> Result<Vec<EntityId>> {
    let store = scheduler.store();
    store.insert_organization(organization_id, "Igreja Demo")?;
    store.insert_event_type(organization_id, "culto", "Culto de Domingo")?;

    for (ministry_id, name) in MINISTRIES {
        store.insert_ministry(&Ministry {
            ministry_id: ministry_id.to_string(),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
        })?;
    }

    for (volunteer_id, name, memberships) in VOLUNTEERS {
        let leads = memberships.iter().any(|(_, leader)| *leader);
        store.insert_volunteer(&Volunteer {
            volunteer_id: volunteer_id.to_string(),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
            access_level: if leads { AccessLevel::Leader } else { AccessLevel::Volunteer },
            ministries: memberships
                .iter()
                .map(|(ministry_id, is_leader)| MinistryMembership {
                    ministry_id: ministry_id.to_string(),
                    is_leader: *is_leader,
                })
                .collect(),
        })?;
    }

    let past = scheduler.create_series(&SeriesRequest {
        organization_id: organization_id.to_string(),
        title: None,
        event_type_id: Some("culto".into()),
        first_date: anchor - Duration::weeks(8),
        interval_weeks: 1,
        occurrences: 8,
    })?;

    // Rotate the roster through past services so history differs per person.
    for (week, service_id) in past.iter().enumerate() {
        for (i, (volunteer_id, _, _)) in VOLUNTEERS.iter().enumerate() {
            if (i + week) % 3 != 0 {
                continue;
            }
            scheduler.add_volunteer(service_id, volunteer_id, false)?;
            let status = if (i * 7 + week) % 5 == 0 {
                AssignmentStatus::Declined
            } else {
                AssignmentStatus::Confirmed
            };
            let reason = (status == AssignmentStatus::Declined).then_some("viagem");
            scheduler.update_status(service_id, volunteer_id, status, reason)?;
        }
    }

    let upcoming = scheduler.create_series(&SeriesRequest {
        organization_id: organization_id.to_string(),
        title: None,
        event_type_id: Some("culto".into()),
        first_date: anchor,
        interval_weeks: 1,
        occurrences: 4,
    })?;

    store.insert_unavailability(&UnavailabilityWindow {
        volunteer_id: "bruno".into(),
        start_date: anchor - Duration::days(2),
        end_date: anchor + Duration::days(5),
        reason: Some("férias".into()),
    })?;

    log::info!(
        "demo: seeded org={organization_id} with {} volunteers, {} past and {} upcoming services",
        VOLUNTEERS.len(),
        past.len(),
        upcoming.len()
    );
    Ok(upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_sunday_is_today_on_sundays() {
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert_eq!(next_sunday(sunday), sunday);
        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(next_sunday(wednesday), NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }
}
