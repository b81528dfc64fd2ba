//! Ranked volunteer suggestions over a snapshot.

mod common;

use common::*;
use rota_core::{
    assignment::AssignmentStatus::{Confirmed, Pending},
    error::RotaError,
    suggest::{suggest, suggested_ids, SlotRequest},
};

fn req(ministry_id: &str, slots: u32) -> SlotRequest {
    SlotRequest {
        ministry_id: ministry_id.into(),
        slots,
    }
}

fn target() -> rota_core::service::Service {
    service("target", "2024-06-02", "Sunday Worship", &[])
}

#[test]
fn fills_requested_slots_from_eligible_members() {
    let snap = snapshot(
        vec![target()],
        vec![volunteer("a", &["music"]), volunteer("b", &["music"])],
        vec![ministry("music", "Louvor")],
        vec![],
    );

    let two = suggest(&target(), &[req("music", 2)], &snap, &admin()).unwrap();
    assert_eq!(two.len(), 1);
    assert_eq!(two[0].ministry_name, "Louvor");
    assert_eq!(two[0].suggested_volunteer_ids.len(), 2);
    assert_eq!(two[0].missing_slots, 0);

    let three = suggest(&target(), &[req("music", 3)], &snap, &admin()).unwrap();
    assert_eq!(three[0].requested_slots, 3);
    assert_eq!(three[0].suggested_volunteer_ids.len(), 2);
    assert_eq!(three[0].missing_slots, 1);
}

/// c rested since January (85), a served last week (≈61.3), b is new (52).
#[test]
fn ranks_by_composite_score() {
    let history = vec![
        service("last-week", "2024-05-26", "Sunday", &[("a", Confirmed)]),
        service("january", "2024-01-07", "Sunday", &[("c", Confirmed)]),
    ];
    let mut services = history;
    services.push(target());
    let snap = snapshot(
        services,
        vec![
            volunteer("a", &["music"]),
            volunteer("b", &["music"]),
            volunteer("c", &["music"]),
        ],
        vec![ministry("music", "Louvor")],
        vec![],
    );

    let out = suggest(&target(), &[req("music", 3)], &snap, &admin()).unwrap();
    assert_eq!(out[0].suggested_volunteer_ids, vec!["c", "a", "b"]);
}

#[test]
fn ties_keep_roster_order() {
    let snap = snapshot(
        vec![target()],
        vec![
            volunteer("z", &["music"]),
            volunteer("m", &["music"]),
            volunteer("a", &["music"]),
        ],
        vec![ministry("music", "Louvor")],
        vec![],
    );
    let out = suggest(&target(), &[req("music", 3)], &snap, &admin()).unwrap();
    assert_eq!(out[0].suggested_volunteer_ids, vec!["z", "m", "a"]);
}

/// Unavailability is a hard filter, not a score penalty.
#[test]
fn unavailable_volunteer_is_never_suggested() {
    let services = vec![
        service("january", "2024-01-07", "Sunday", &[("top", Confirmed)]),
        target(),
    ];
    let snap = snapshot(
        services,
        vec![volunteer("top", &["music"]), volunteer("new", &["music"])],
        vec![ministry("music", "Louvor")],
        vec![window("top", "2024-06-01", "2024-06-02")],
    );
    let out = suggest(&target(), &[req("music", 2)], &snap, &admin()).unwrap();
    assert_eq!(out[0].suggested_volunteer_ids, vec!["new"]);
    assert_eq!(out[0].missing_slots, 1);
}

#[test]
fn volunteer_booked_elsewhere_that_day_is_excluded() {
    let services = vec![
        service("youth", "2024-06-02", "Youth Service", &[("a", Pending)]),
        target(),
    ];
    let snap = snapshot(
        services,
        vec![volunteer("a", &["music"]), volunteer("b", &["music"])],
        vec![ministry("music", "Louvor")],
        vec![],
    );
    let out = suggest(&target(), &[req("music", 2)], &snap, &admin()).unwrap();
    assert_eq!(out[0].suggested_volunteer_ids, vec!["b"]);
}

#[test]
fn volunteers_already_on_the_service_are_excluded() {
    let on_it = service("target", "2024-06-02", "Sunday Worship", &[("a", Pending)]);
    let snap = snapshot(
        vec![on_it.clone()],
        vec![volunteer("a", &["music"]), volunteer("b", &["music"])],
        vec![ministry("music", "Louvor")],
        vec![],
    );
    let out = suggest(&on_it, &[req("music", 2)], &snap, &admin()).unwrap();
    assert_eq!(out[0].suggested_volunteer_ids, vec!["b"]);
}

/// A volunteer in two ministries is picked for the first request only.
#[test]
fn a_volunteer_fills_at_most_one_ministry() {
    let snap = snapshot(
        vec![target()],
        vec![volunteer("both", &["music", "media"]), volunteer("m", &["media"])],
        vec![ministry("music", "Louvor"), ministry("media", "Mídia")],
        vec![],
    );
    let out = suggest(&target(), &[req("music", 1), req("media", 2)], &snap, &admin()).unwrap();

    assert_eq!(out[0].ministry_id, "music", "output follows request order");
    assert_eq!(out[0].suggested_volunteer_ids, vec!["both"]);
    assert_eq!(out[1].ministry_id, "media");
    assert_eq!(out[1].suggested_volunteer_ids, vec!["m"]);
    assert_eq!(out[1].missing_slots, 1);
    assert_eq!(suggested_ids(&out), vec!["both", "m"]);
}

#[test]
fn leaders_only_get_ministries_they_lead() {
    let snap = snapshot(
        vec![target()],
        vec![volunteer("a", &["music"]), volunteer("b", &["media"])],
        vec![ministry("music", "Louvor"), ministry("media", "Mídia")],
        vec![],
    );
    let out = suggest(
        &target(),
        &[req("music", 1), req("media", 1)],
        &snap,
        &leader_of(&["media"]),
    )
    .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].ministry_id, "media");
    assert_eq!(out[0].suggested_volunteer_ids, vec!["b"]);
}

#[test]
fn zero_total_slots_is_rejected() {
    let snap = snapshot(vec![target()], vec![], vec![], vec![]);
    let err = suggest(&target(), &[req("music", 0), req("media", 0)], &snap, &admin()).unwrap_err();
    assert!(matches!(err, RotaError::Validation { .. }), "got {err:?}");

    let err = suggest(&target(), &[], &snap, &admin()).unwrap_err();
    assert!(matches!(err, RotaError::Validation { .. }));
}

#[test]
fn zero_slot_requests_are_skipped() {
    let snap = snapshot(
        vec![target()],
        vec![volunteer("a", &["music"])],
        vec![ministry("music", "Louvor"), ministry("media", "Mídia")],
        vec![],
    );
    let out = suggest(&target(), &[req("media", 0), req("music", 1)], &snap, &admin()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].ministry_id, "music");
}

#[test]
fn unknown_ministry_name_falls_back_to_id() {
    let snap = snapshot(vec![target()], vec![], vec![], vec![]);
    let out = suggest(&target(), &[req("kids", 1)], &snap, &admin()).unwrap();
    assert_eq!(out[0].ministry_name, "kids");
    assert_eq!(out[0].missing_slots, 1);
}
