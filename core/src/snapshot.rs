//! Consistent read snapshot of one organization's scheduling state.
//!
//! RULE: Suggestion and conflict computations run against a single snapshot.
//! Nothing mutates a snapshot once it has been read; a later mutation reads
//! fresh state from the store instead.

use crate::{
    availability::UnavailabilityWindow,
    roster::{Ministry, Volunteer},
    service::Service,
    types::EntityId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub organization_id: EntityId,
    pub services: Vec<Service>,
    pub volunteers: Vec<Volunteer>,
    pub ministries: Vec<Ministry>,
    pub unavailability: Vec<UnavailabilityWindow>,
}

impl ScheduleSnapshot {
    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.service_id == service_id)
    }

    pub fn ministry_name(&self, ministry_id: &str) -> Option<&str> {
        self.ministries
            .iter()
            .find(|m| m.ministry_id == ministry_id)
            .map(|m| m.name.as_str())
    }
}
