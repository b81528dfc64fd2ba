//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use rota_core::{
    assignment::{AssignmentStatus, Assignments, VolunteerAssignment},
    availability::UnavailabilityWindow,
    roster::{AccessLevel, Caller, Ministry, MinistryMembership, Volunteer},
    service::{NewService, Service},
    snapshot::ScheduleSnapshot,
    store::RotaStore,
};

pub const ORG: &str = "org-1";

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date literal")
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── In-memory values ─────────────────────────────────────────────────────────

pub fn service(id: &str, date: &str, title: &str, volunteers: &[(&str, AssignmentStatus)]) -> Service {
    Service {
        service_id: id.into(),
        organization_id: ORG.into(),
        date: d(date),
        title: Some(title.into()),
        event_type: None,
        assignments: Assignments {
            volunteers: volunteers
                .iter()
                .map(|(v, status)| VolunteerAssignment {
                    status: *status,
                    ..VolunteerAssignment::pending(*v)
                })
                .collect(),
            preachers: Vec::new(),
        },
    }
}

pub fn volunteer(id: &str, ministries: &[&str]) -> Volunteer {
    Volunteer {
        volunteer_id: id.into(),
        organization_id: ORG.into(),
        name: id.to_uppercase(),
        access_level: AccessLevel::Volunteer,
        ministries: ministries
            .iter()
            .map(|m| MinistryMembership {
                ministry_id: m.to_string(),
                is_leader: false,
            })
            .collect(),
    }
}

pub fn ministry(id: &str, name: &str) -> Ministry {
    Ministry {
        ministry_id: id.into(),
        organization_id: ORG.into(),
        name: name.into(),
    }
}

pub fn window(volunteer_id: &str, start: &str, end: &str) -> UnavailabilityWindow {
    UnavailabilityWindow {
        volunteer_id: volunteer_id.into(),
        start_date: d(start),
        end_date: d(end),
        reason: Some("travel".into()),
    }
}

pub fn admin() -> Caller {
    Caller {
        volunteer_id: "admin".into(),
        organization_id: ORG.into(),
        access_level: AccessLevel::Admin,
        led_ministries: Default::default(),
    }
}

pub fn leader_of(ministries: &[&str]) -> Caller {
    Caller {
        volunteer_id: "leader".into(),
        organization_id: ORG.into(),
        access_level: AccessLevel::Leader,
        led_ministries: ministries.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn snapshot(
    services: Vec<Service>,
    volunteers: Vec<Volunteer>,
    ministries: Vec<Ministry>,
    unavailability: Vec<UnavailabilityWindow>,
) -> ScheduleSnapshot {
    ScheduleSnapshot {
        organization_id: ORG.into(),
        services,
        volunteers,
        ministries,
        unavailability,
    }
}

// ── Persisted fixtures ───────────────────────────────────────────────────────

/// Migrated in-memory store with one organization, two ministries and an
/// event type.
pub fn store() -> RotaStore {
    init_logging();
    let store = RotaStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_organization(ORG, "Igreja Central").expect("insert org");
    store.insert_ministry(&ministry("music", "Louvor")).expect("insert ministry");
    store.insert_ministry(&ministry("media", "Mídia")).expect("insert ministry");
    store.insert_event_type(ORG, "culto", "Culto de Domingo").expect("insert event type");
    store
}

pub fn persist_volunteer(store: &RotaStore, id: &str, ministries: &[(&str, bool)]) -> Volunteer {
    let mut v = volunteer(id, &[]);
    v.ministries = ministries
        .iter()
        .map(|(m, leader)| MinistryMembership {
            ministry_id: m.to_string(),
            is_leader: *leader,
        })
        .collect();
    if ministries.iter().any(|(_, leader)| *leader) {
        v.access_level = AccessLevel::Leader;
    }
    store.insert_volunteer(&v).expect("insert volunteer");
    v
}

pub fn persist_service(store: &RotaStore, id: &str, date: &str, title: Option<&str>) {
    store
        .insert_service(&NewService {
            service_id: id.into(),
            organization_id: ORG.into(),
            date: d(date),
            title: title.map(str::to_string),
            event_type_id: None,
        })
        .expect("insert service");
}
