//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The scheduler calls store methods and never executes SQL directly.
//!
//! Assignment payloads are read through `assignment::normalize` and written
//! through `assignment::build`, so the legacy shape never escapes this layer.

use crate::{
    assignment::Assignments,
    availability::UnavailabilityWindow,
    error::{RotaError, RotaResult},
    roster::Volunteer,
    service::Service,
    snapshot::ScheduleSnapshot,
    types::{EntityId, ServiceDate},
};
use rusqlite::{Connection, Transaction, TransactionBehavior};

mod audit;
mod roster;
mod service;
mod unavailability;

pub struct RotaStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

/// Result of a read-modify-write on a service's assignments.
#[derive(Debug, Clone)]
pub struct Modified<T> {
    /// The service as committed (or as read, when nothing changed).
    pub service: Service,
    pub changed: bool,
    pub value: T,
}

/// Read-only queries available inside an assignment transaction.
pub struct TxView<'a> {
    conn: &'a Connection,
}

impl TxView<'_> {
    /// Services of `organization_id` on `date`, as seen by this transaction.
    pub fn services_on(&self, organization_id: &str, date: ServiceDate) -> RotaResult<Vec<Service>> {
        service::list_services(self.conn, organization_id, date, date)
    }

    pub fn unavailability_for(&self, volunteer_id: &str) -> RotaResult<Vec<UnavailabilityWindow>> {
        unavailability::for_volunteer(self.conn, volunteer_id)
    }

    /// The volunteer, if they are on `organization_id`'s roster.
    /// Volunteers of other organizations read as not found.
    pub fn roster_member(&self, organization_id: &str, volunteer_id: &str) -> RotaResult<Volunteer> {
        let volunteer = roster::fetch_volunteer(self.conn, volunteer_id)?;
        if volunteer.organization_id != organization_id {
            return Err(RotaError::VolunteerNotFound {
                volunteer_id: volunteer_id.to_string(),
            });
        }
        Ok(volunteer)
    }
}

impl RotaStore {
    pub fn open(path: &str) -> RotaResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RotaResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> RotaResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RotaResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_unavailability.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_audit_log.sql"))?;
        Ok(())
    }

    // ── Assignments ────────────────────────────────────────────

    /// Read-modify-write of one service's assignments in a single
    /// `BEGIN IMMEDIATE` transaction.
    ///
    /// The payload is re-read inside the transaction, normalized, and handed
    /// to `f`. If `f` leaves the assignments unchanged nothing is written. An
    /// error from `f` rolls the transaction back.
    pub fn modify_assignments<T, F>(&self, service_id: &str, f: F) -> RotaResult<Modified<T>>
    where
        F: FnOnce(&TxView<'_>, &Service, &mut Assignments) -> RotaResult<T>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut current = service::fetch_service(&tx, service_id)?;

        let mut next = current.assignments.clone();
        let value = f(&TxView { conn: &tx }, &current, &mut next)?;

        let changed = next != current.assignments;
        if changed {
            service::write_assignments(&tx, service_id, &next)?;
            current.assignments = next;
        }
        tx.commit()?;

        Ok(Modified {
            service: current,
            changed,
            value,
        })
    }

    // ── Snapshot ───────────────────────────────────────────────

    /// Everything the suggestion engine needs for one organization, read in
    /// one transaction so the pieces agree with each other.
    pub fn snapshot(&self, organization_id: &str) -> RotaResult<ScheduleSnapshot> {
        let tx = self.conn.unchecked_transaction()?;
        let snapshot = ScheduleSnapshot {
            organization_id: EntityId::from(organization_id),
            services: service::services_for_org(&tx, organization_id)?,
            volunteers: roster::volunteers_for_org(&tx, organization_id)?,
            ministries: roster::ministries_for_org(&tx, organization_id)?,
            unavailability: unavailability::for_org(&tx, organization_id)?,
        };
        tx.commit()?;
        log::debug!(
            "snapshot: org={organization_id} services={} volunteers={} windows={}",
            snapshot.services.len(),
            snapshot.volunteers.len(),
            snapshot.unavailability.len()
        );
        Ok(snapshot)
    }
}
