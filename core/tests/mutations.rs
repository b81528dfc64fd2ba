//! Idempotent edits against the canonical assignment structure.

use rota_core::assignment::{build, AssignmentStatus, Assignments, VolunteerAssignment};
use serde_json::json;

#[test]
fn adding_twice_equals_adding_once() {
    let mut once = Assignments::default();
    assert!(once.add_volunteer("v1"));

    let mut twice = once.clone();
    assert!(!twice.add_volunteer("v1"), "second add must be a no-op");
    assert_eq!(once, twice);
    assert_eq!(twice.volunteers, vec![VolunteerAssignment::pending("v1")]);
}

#[test]
fn removing_absent_volunteer_is_noop() {
    let mut a = Assignments::default();
    a.add_volunteer("v1");
    let before = a.clone();
    assert!(!a.remove_volunteer("ghost"));
    assert_eq!(a, before);
}

#[test]
fn remove_drops_the_volunteer() {
    let mut a = Assignments::default();
    a.add_volunteer("v1");
    a.add_volunteer("v2");
    assert!(a.remove_volunteer("v1"));
    assert!(!a.contains_volunteer("v1"));
    assert!(a.contains_volunteer("v2"));
}

#[test]
fn leaving_declined_clears_the_note() {
    let mut a = Assignments {
        volunteers: vec![VolunteerAssignment {
            status: AssignmentStatus::Declined,
            note: Some("sick".into()),
            ..VolunteerAssignment::pending("v1")
        }],
        preachers: vec![],
    };
    assert_eq!(a.update_status("v1", AssignmentStatus::Confirmed, None), Some(true));
    assert_eq!(a.volunteers[0].status, AssignmentStatus::Confirmed);
    assert_eq!(a.volunteers[0].note, None);
}

#[test]
fn decline_without_reason_stores_empty_note() {
    let mut a = Assignments::default();
    a.add_volunteer("v1");
    a.update_status("v1", AssignmentStatus::Declined, None);
    assert_eq!(a.volunteers[0].note.as_deref(), Some(""));
}

#[test]
fn status_update_for_unassigned_volunteer_reports_none() {
    let mut a = Assignments::default();
    assert_eq!(a.update_status("v1", AssignmentStatus::Confirmed, None), None);
}

/// pending → declined("travel") → confirmed leaves no note field behind.
#[test]
fn decline_then_reconfirm() {
    let mut a = Assignments::default();
    a.add_volunteer("v1");

    a.update_status("v1", AssignmentStatus::Declined, Some("travel"));
    assert_eq!(a.volunteers[0].note.as_deref(), Some("travel"));

    a.update_status("v1", AssignmentStatus::Confirmed, None);
    assert_eq!(
        build(&a).unwrap(),
        json!({
            "volunteers": [{ "volunteerId": "v1", "status": "confirmed" }],
            "preachers": [],
        })
    );
}

#[test]
fn suggested_volunteers_are_marked_and_deduplicated() {
    let mut a = Assignments::default();
    a.add_volunteer("v1");

    let added = a.apply_suggested(["v1", "v2", "v3", "v2"], "auto_schedule");
    assert_eq!(added, vec!["v2", "v3"]);
    assert_eq!(a.volunteers.len(), 3);
    assert_eq!(a.volunteers[0].note, None, "manual entry keeps no marker");
    assert_eq!(a.volunteers[1].note.as_deref(), Some("auto_schedule"));
    assert_eq!(a.volunteers[1].status, AssignmentStatus::Pending);
}

#[test]
fn preachers_add_and_remove_idempotently() {
    let mut a = Assignments::default();
    assert!(a.add_preacher("p1", "Pr. Ana"));
    assert!(!a.add_preacher("p1", "Pr. Ana (again)"));
    assert_eq!(a.preachers.len(), 1);
    assert_eq!(a.preachers[0].name, "Pr. Ana");
    assert_eq!(a.preachers[0].role, "pregador");

    assert!(a.remove_preacher("p1"));
    assert!(!a.remove_preacher("p1"));
    assert!(a.preachers.is_empty());
}
