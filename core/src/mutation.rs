//! Idempotent edits against the canonical assignment structure.
//!
//! Every operation returns whether the structure changed, so the store can
//! skip the write (and the audit entry) for no-ops.

use crate::assignment::{AssignmentStatus, Assignments, PreacherAssignment, VolunteerAssignment};
use crate::types::EntityId;

impl Assignments {
    /// Append a pending assignment unless the volunteer is already present.
    pub fn add_volunteer(&mut self, volunteer_id: &str) -> bool {
        if self.contains_volunteer(volunteer_id) {
            return false;
        }
        self.volunteers.push(VolunteerAssignment::pending(volunteer_id));
        true
    }

    /// Drop every assignment for the volunteer. Absent ids are a no-op.
    pub fn remove_volunteer(&mut self, volunteer_id: &str) -> bool {
        let before = self.volunteers.len();
        self.volunteers.retain(|a| !a.is_for(volunteer_id));
        self.volunteers.len() != before
    }

    /// Set the status of an existing assignment.
    ///
    /// `declined` stores `reason` (empty when none given) as the note; any
    /// other status clears the note. Returns `None` if the volunteer is not
    /// assigned, `Some(changed)` otherwise.
    pub fn update_status(
        &mut self,
        volunteer_id: &str,
        status: AssignmentStatus,
        reason: Option<&str>,
    ) -> Option<bool> {
        let entry = self.volunteers.iter_mut().find(|a| a.is_for(volunteer_id))?;
        let note = match status {
            AssignmentStatus::Declined => Some(reason.unwrap_or_default().to_string()),
            _ => None,
        };
        let changed = entry.status != status || entry.note != note;
        entry.status = status;
        entry.note = note;
        Some(changed)
    }

    /// Append machine-suggested volunteers as pending, tagged with `marker`.
    /// Ids already present, or repeated within `volunteer_ids`, are skipped.
    /// Returns the ids actually added, in order.
    pub fn apply_suggested<'a, I>(&mut self, volunteer_ids: I, marker: &str) -> Vec<EntityId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = Vec::new();
        for id in volunteer_ids {
            if self.contains_volunteer(id) {
                continue;
            }
            self.volunteers
                .push(VolunteerAssignment::pending(id).with_note(marker));
            added.push(id.to_string());
        }
        added
    }

    pub fn add_preacher(&mut self, preacher_id: &str, name: &str) -> bool {
        if self.contains_preacher(preacher_id) {
            return false;
        }
        self.preachers.push(PreacherAssignment::new(preacher_id, name));
        true
    }

    pub fn remove_preacher(&mut self, preacher_id: &str) -> bool {
        let before = self.preachers.len();
        self.preachers.retain(|p| p.preacher_id != preacher_id);
        self.preachers.len() != before
    }
}
