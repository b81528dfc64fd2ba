use crate::types::{EntityId, ServiceDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service '{service_id}' not found")]
    ServiceNotFound { service_id: EntityId },

    #[error("Volunteer '{volunteer_id}' not found")]
    VolunteerNotFound { volunteer_id: EntityId },

    #[error("Volunteer '{volunteer_id}' is not assigned to service '{service_id}'")]
    AssignmentNotFound {
        service_id: EntityId,
        volunteer_id: EntityId,
    },

    #[error("Rejected: {reason}")]
    Validation { reason: String },

    #[error("Volunteer '{volunteer_id}' is unavailable from {start_date} to {end_date}")]
    Unavailable {
        volunteer_id: EntityId,
        start_date: ServiceDate,
        end_date: ServiceDate,
        reason: Option<String>,
    },

    #[error("Volunteer '{volunteer_id}' is already scheduled that day: {}", titles.join(", "))]
    Conflict {
        volunteer_id: EntityId,
        titles: Vec<String>,
    },

    #[error("Not permitted: {reason}")]
    Forbidden { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RotaError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }
}

pub type RotaResult<T> = Result<T, RotaError>;
