//! Volunteers, ministries, and who may manage what.
//!
//! RULE: Leadership checks go through `Caller::can_manage`. Nothing else
//! re-derives the set of led ministries.

use crate::{service::Service, types::EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Admin,
    Leader,
    Volunteer,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Leader => "leader",
            Self::Volunteer => "volunteer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "leader" => Some(Self::Leader),
            "volunteer" => Some(Self::Volunteer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinistryMembership {
    pub ministry_id: EntityId,
    pub is_leader: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub volunteer_id: EntityId,
    pub organization_id: EntityId,
    pub name: String,
    pub access_level: AccessLevel,
    pub ministries: Vec<MinistryMembership>,
}

impl Volunteer {
    pub fn belongs_to(&self, ministry_id: &str) -> bool {
        self.ministries.iter().any(|m| m.ministry_id == ministry_id)
    }

    pub fn led_ministries(&self) -> impl Iterator<Item = &str> {
        self.ministries
            .iter()
            .filter(|m| m.is_leader)
            .map(|m| m.ministry_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ministry {
    pub ministry_id: EntityId,
    pub organization_id: EntityId,
    pub name: String,
}

/// Identity and role context of whoever is driving an operation.
/// Supplied by the auth layer; the core never computes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    pub volunteer_id: EntityId,
    pub organization_id: EntityId,
    pub access_level: AccessLevel,
    pub led_ministries: BTreeSet<EntityId>,
}

impl Caller {
    pub fn from_volunteer(v: &Volunteer) -> Self {
        Self {
            volunteer_id: v.volunteer_id.clone(),
            organization_id: v.organization_id.clone(),
            access_level: v.access_level,
            led_ministries: v.led_ministries().map(str::to_string).collect(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.access_level == AccessLevel::Admin
    }

    /// Admins manage every ministry; everyone else exactly the ones they lead.
    pub fn can_manage(&self, ministry_id: &str) -> bool {
        self.is_admin() || self.led_ministries.contains(ministry_id)
    }

    /// Admins may delete any service. Leaders may delete a service only when
    /// every assigned volunteer belongs to a ministry they lead.
    pub fn can_delete_service(&self, service: &Service, volunteers: &[Volunteer]) -> bool {
        if self.is_admin() {
            return true;
        }
        if self.led_ministries.is_empty() {
            return false;
        }
        service.assignments.volunteer_ids().all(|id| {
            volunteers
                .iter()
                .find(|v| v.volunteer_id == id)
                .is_some_and(|v| v.ministries.iter().any(|m| self.can_manage(&m.ministry_id)))
        })
    }
}
