//! Shared primitive types used across the scheduling core.

/// A stable, unique identifier for any entity (organization, service,
/// volunteer, ministry, event type, preacher, team).
pub type EntityId = String;

/// A calendar day with no time-of-day component. Serialized as `YYYY-MM-DD`.
pub type ServiceDate = chrono::NaiveDate;
