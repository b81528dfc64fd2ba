//! Volunteer scheduling core: assignment normalization, same-day conflict
//! detection, history scoring and auto-suggestion for church services.

pub mod assignment;
pub mod audit;
pub mod availability;
pub mod config;
pub mod conflict;
pub mod error;
pub mod history;
pub mod mutation;
pub mod recurrence;
pub mod roster;
pub mod scheduler;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod suggest;
pub mod types;
