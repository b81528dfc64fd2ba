//! Services: the calendar events that need staffing.

use crate::{
    assignment::Assignments,
    types::{EntityId, ServiceDate},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub event_type_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: EntityId,
    pub organization_id: EntityId,
    pub date: ServiceDate,
    pub title: Option<String>,
    pub event_type: Option<EventType>,
    pub assignments: Assignments,
}

impl Service {
    /// Title shown to users: the explicit title, else the event type's name,
    /// else the date rendered with `date_format`.
    pub fn display_title(&self, date_format: &str) -> String {
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if let Some(et) = &self.event_type {
            return et.name.clone();
        }
        self.date.format(date_format).to_string()
    }
}

/// A service not yet persisted. Assignments always start empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub service_id: EntityId,
    pub organization_id: EntityId,
    pub date: ServiceDate,
    pub title: Option<String>,
    pub event_type_id: Option<EntityId>,
}
