use super::RotaStore;
use crate::{availability::UnavailabilityWindow, error::RotaResult};
use rusqlite::{params, Connection};

fn window_row_mapper(r: &rusqlite::Row<'_>) -> rusqlite::Result<UnavailabilityWindow> {
    Ok(UnavailabilityWindow {
        volunteer_id: r.get(0)?,
        start_date: r.get(1)?,
        end_date: r.get(2)?,
        reason: r.get(3)?,
    })
}

pub(super) fn for_org(conn: &Connection, organization_id: &str) -> RotaResult<Vec<UnavailabilityWindow>> {
    let mut stmt = conn.prepare(
        "SELECT u.volunteer_id, u.start_date, u.end_date, u.reason
         FROM unavailability u
         JOIN volunteer v ON v.volunteer_id = u.volunteer_id
         WHERE v.organization_id = ?1
         ORDER BY u.volunteer_id, u.start_date, u.id",
    )?;
    let rows = stmt.query_map(params![organization_id], window_row_mapper)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn for_volunteer(conn: &Connection, volunteer_id: &str) -> RotaResult<Vec<UnavailabilityWindow>> {
    let mut stmt = conn.prepare(
        "SELECT volunteer_id, start_date, end_date, reason
         FROM unavailability WHERE volunteer_id = ?1
         ORDER BY start_date, id",
    )?;
    let rows = stmt.query_map(params![volunteer_id], window_row_mapper)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl RotaStore {
    // ── Unavailability ─────────────────────────────────────────────

    pub fn insert_unavailability(&self, w: &UnavailabilityWindow) -> RotaResult<i64> {
        self.conn.execute(
            "INSERT INTO unavailability (volunteer_id, start_date, end_date, reason)
             VALUES (?1, ?2, ?3, ?4)",
            params![&w.volunteer_id, w.start_date, w.end_date, w.reason.as_deref()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn unavailability_for_org(&self, organization_id: &str) -> RotaResult<Vec<UnavailabilityWindow>> {
        for_org(&self.conn, organization_id)
    }

    pub fn unavailability_for_volunteer(&self, volunteer_id: &str) -> RotaResult<Vec<UnavailabilityWindow>> {
        for_volunteer(&self.conn, volunteer_id)
    }
}
