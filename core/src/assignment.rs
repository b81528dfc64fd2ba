//! Assignment payload model and normalizer.
//!
//! A service's assignments are persisted as a JSON payload that has drifted
//! over time. Two shapes are legal on read:
//!   - legacy: a bare list of volunteer assignments
//!   - structured: `{ "volunteers": [...], "preachers": [...] }`
//!
//! RULE: Anything read from storage passes through `normalize()` exactly once.
//! Everything written back goes through `build()`, which only ever emits the
//! structured form. The legacy shape never leaves this module.

use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role tag carried by every preacher assignment.
pub const PREACHER_ROLE: &str = "pregador";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<EntityId>,
    /// Team assignments share the list but are not scheduled by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<EntityId>,
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Decline reason, or the auto-schedule marker. Absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl VolunteerAssignment {
    /// A fresh assignment. `pending` is the only legal initial status.
    pub fn pending(volunteer_id: impl Into<EntityId>) -> Self {
        Self {
            volunteer_id: Some(volunteer_id.into()),
            team_id: None,
            status: AssignmentStatus::Pending,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_for(&self, volunteer_id: &str) -> bool {
        self.volunteer_id.as_deref() == Some(volunteer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreacherAssignment {
    pub preacher_id: EntityId,
    /// Name snapshot taken when the preacher was assigned.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_preacher_role")]
    pub role: String,
}

fn default_preacher_role() -> String {
    PREACHER_ROLE.to_string()
}

impl PreacherAssignment {
    pub fn new(preacher_id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            preacher_id: preacher_id.into(),
            name: name.into(),
            role: default_preacher_role(),
        }
    }
}

/// Canonical in-memory form. Both lists are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignments {
    pub volunteers: Vec<VolunteerAssignment>,
    pub preachers: Vec<PreacherAssignment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub declined: usize,
}

impl Assignments {
    pub fn contains_volunteer(&self, volunteer_id: &str) -> bool {
        self.volunteers.iter().any(|a| a.is_for(volunteer_id))
    }

    pub fn contains_preacher(&self, preacher_id: &str) -> bool {
        self.preachers.iter().any(|p| p.preacher_id == preacher_id)
    }

    pub fn volunteer(&self, volunteer_id: &str) -> Option<&VolunteerAssignment> {
        self.volunteers.iter().find(|a| a.is_for(volunteer_id))
    }

    /// Volunteer ids in list order. Team-only entries are skipped.
    pub fn volunteer_ids(&self) -> impl Iterator<Item = &str> {
        self.volunteers.iter().filter_map(|a| a.volunteer_id.as_deref())
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for a in &self.volunteers {
            match a.status {
                AssignmentStatus::Pending => counts.pending += 1,
                AssignmentStatus::Confirmed => counts.confirmed += 1,
                AssignmentStatus::Declined => counts.declined += 1,
            }
        }
        counts
    }
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// The shapes a persisted payload can take, decoded once at the boundary.
enum RawAssignments<'a> {
    Missing,
    LegacyList(&'a [Value]),
    Structured {
        volunteers: Option<&'a Value>,
        preachers: Option<&'a Value>,
    },
    Malformed,
}

impl<'a> RawAssignments<'a> {
    fn classify(raw: &'a Value) -> Self {
        match raw {
            Value::Null => Self::Missing,
            Value::Array(items) => Self::LegacyList(items),
            Value::Object(map) => Self::Structured {
                volunteers: map.get("volunteers"),
                preachers: map.get("preachers"),
            },
            _ => Self::Malformed,
        }
    }
}

/// Convert any persisted payload into the canonical structured form.
/// Never fails: unusable shapes degrade to empty lists.
pub fn normalize(raw: &Value) -> Assignments {
    match RawAssignments::classify(raw) {
        RawAssignments::Missing => Assignments::default(),
        RawAssignments::LegacyList(items) => Assignments {
            volunteers: decode_list(items, "volunteers"),
            preachers: Vec::new(),
        },
        RawAssignments::Structured { volunteers, preachers } => Assignments {
            volunteers: decode_field(volunteers, "volunteers"),
            preachers: decode_field(preachers, "preachers"),
        },
        RawAssignments::Malformed => {
            log::warn!("assignments: unrecognised payload shape, treating as empty");
            Assignments::default()
        }
    }
}

/// Serialize the canonical form for storage. Always the structured shape.
pub fn build(assignments: &Assignments) -> serde_json::Result<Value> {
    serde_json::to_value(assignments)
}

fn decode_field<T: serde::de::DeserializeOwned>(field: Option<&Value>, key: &str) -> Vec<T> {
    match field {
        Some(Value::Array(items)) => decode_list(items, key),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            log::warn!("assignments: '{key}' is not a list, treating as empty");
            Vec::new()
        }
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(items: &[Value], key: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("assignments: dropping malformed '{key}' entry {item}: {e}");
                None
            }
        })
        .collect()
}
