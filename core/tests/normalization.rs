//! Assignment payload normalization and re-serialization.

use rota_core::assignment::{
    build, normalize, AssignmentStatus, Assignments, PreacherAssignment, VolunteerAssignment,
};
use serde_json::{json, Value};

/// Whatever comes out of storage, normalize returns two lists and never panics.
#[test]
fn normalize_is_total() {
    let inputs = [
        Value::Null,
        json!([]),
        json!([{ "volunteerId": "v1", "status": "pending" }]),
        json!({}),
        json!({ "volunteers": [] }),
        json!({ "preachers": [] }),
        json!({ "volunteers": null, "preachers": null }),
        json!({ "volunteers": {}, "preachers": "p1" }),
        json!({ "other": [1, 2, 3] }),
        json!(true),
        json!(3.5),
        json!("[]"),
    ];
    for raw in &inputs {
        let a = normalize(raw);
        let rebuilt = build(&a).expect("build");
        assert!(rebuilt["volunteers"].is_array(), "volunteers missing for {raw}");
        assert!(rebuilt["preachers"].is_array(), "preachers missing for {raw}");
    }
}

#[test]
fn null_and_empty_object_are_empty() {
    assert_eq!(normalize(&Value::Null), Assignments::default());
    assert_eq!(normalize(&json!({})), Assignments::default());
}

/// A legacy bare list becomes the volunteers list; preachers start empty.
#[test]
fn legacy_list_migrates_to_structured_form() {
    let a = normalize(&json!([{ "volunteerId": "v1", "status": "confirmed" }]));
    assert_eq!(
        a,
        Assignments {
            volunteers: vec![VolunteerAssignment {
                volunteer_id: Some("v1".into()),
                team_id: None,
                status: AssignmentStatus::Confirmed,
                note: None,
            }],
            preachers: vec![],
        }
    );
    assert_eq!(
        build(&a).unwrap(),
        json!({
            "volunteers": [{ "volunteerId": "v1", "status": "confirmed" }],
            "preachers": [],
        })
    );
}

#[test]
fn structured_form_reads_both_lists() {
    let a = normalize(&json!({
        "volunteers": [
            { "volunteerId": "v1", "status": "declined", "note": "travel" },
            { "teamId": "t7", "status": "pending" },
        ],
        "preachers": [{ "preacherId": "p1", "name": "Pr. Marcos", "role": "pregador" }],
    }));
    assert_eq!(a.volunteers.len(), 2);
    assert_eq!(a.volunteers[0].note.as_deref(), Some("travel"));
    assert_eq!(a.volunteers[1].team_id.as_deref(), Some("t7"));
    assert_eq!(a.preachers, vec![PreacherAssignment::new("p1", "Pr. Marcos")]);
}

/// normalize(build(x)) == x for canonical values.
#[test]
fn build_then_normalize_round_trips() {
    let canonical = [
        Assignments::default(),
        Assignments {
            volunteers: vec![
                VolunteerAssignment::pending("v1"),
                VolunteerAssignment {
                    status: AssignmentStatus::Declined,
                    note: Some(String::new()),
                    ..VolunteerAssignment::pending("v2")
                },
                VolunteerAssignment::pending("v3").with_note("auto_schedule"),
                VolunteerAssignment {
                    volunteer_id: None,
                    team_id: Some("t1".into()),
                    status: AssignmentStatus::Confirmed,
                    note: None,
                },
            ],
            preachers: vec![PreacherAssignment::new("p1", "Pr. Ana")],
        },
    ];
    for x in canonical {
        let built = build(&x).expect("build");
        assert_eq!(normalize(&built), x);
    }
}
