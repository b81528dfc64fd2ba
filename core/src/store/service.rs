use super::RotaStore;
use crate::{
    assignment::{build, normalize, Assignments},
    error::{RotaError, RotaResult},
    service::{EventType, NewService, Service},
    types::ServiceDate,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

const SERVICE_SELECT: &str = "
    SELECT s.service_id, s.organization_id, s.service_date, s.title,
           s.event_type_id, et.name, s.assignments
    FROM service s
    LEFT JOIN event_type et ON et.event_type_id = s.event_type_id";

// Helper function for mapping service rows
fn service_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Service> {
    let event_type_id: Option<String> = row.get(4)?;
    let event_type_name: Option<String> = row.get(5)?;
    let payload: Option<String> = row.get(6)?;
    let service_id: String = row.get(0)?;
    let assignments = decode_payload(&service_id, payload.as_deref());
    Ok(Service {
        service_id,
        organization_id: row.get(1)?,
        date: row.get(2)?,
        title: row.get(3)?,
        event_type: event_type_id.zip(event_type_name).map(|(event_type_id, name)| EventType {
            event_type_id,
            name,
        }),
        assignments,
    })
}

/// Unparsable text is treated like a missing payload.
fn decode_payload(service_id: &str, payload: Option<&str>) -> Assignments {
    let raw = match payload {
        None => Value::Null,
        Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
            log::warn!("service {service_id}: assignments payload is not JSON ({e}), treating as empty");
            Value::Null
        }),
    };
    normalize(&raw)
}

pub(super) fn fetch_service(conn: &Connection, service_id: &str) -> RotaResult<Service> {
    conn.query_row(
        &format!("{SERVICE_SELECT} WHERE s.service_id = ?1"),
        params![service_id],
        service_row_mapper,
    )
    .optional()?
    .ok_or_else(|| RotaError::ServiceNotFound {
        service_id: service_id.to_string(),
    })
}

pub(super) fn write_assignments(
    conn: &Connection,
    service_id: &str,
    assignments: &Assignments,
) -> RotaResult<()> {
    let payload = serde_json::to_string(&build(assignments)?)?;
    let updated = conn.execute(
        "UPDATE service SET assignments = ?1 WHERE service_id = ?2",
        params![payload, service_id],
    )?;
    if updated == 0 {
        return Err(RotaError::ServiceNotFound {
            service_id: service_id.to_string(),
        });
    }
    Ok(())
}

pub(super) fn list_services(
    conn: &Connection,
    organization_id: &str,
    from: ServiceDate,
    to: ServiceDate,
) -> RotaResult<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "{SERVICE_SELECT}
         WHERE s.organization_id = ?1 AND s.service_date BETWEEN ?2 AND ?3
         ORDER BY s.service_date ASC, s.service_id ASC"
    ))?;
    let rows = stmt.query_map(params![organization_id, from, to], service_row_mapper)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn services_for_org(conn: &Connection, organization_id: &str) -> RotaResult<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "{SERVICE_SELECT}
         WHERE s.organization_id = ?1
         ORDER BY s.service_date ASC, s.service_id ASC"
    ))?;
    let rows = stmt.query_map(params![organization_id], service_row_mapper)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn insert_new_service(conn: &Connection, s: &NewService) -> RotaResult<()> {
    let payload = serde_json::to_string(&build(&Assignments::default())?)?;
    conn.execute(
        "INSERT INTO service (service_id, organization_id, service_date, title, event_type_id, assignments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &s.service_id,
            &s.organization_id,
            s.date,
            s.title.as_deref(),
            s.event_type_id.as_deref(),
            payload,
        ],
    )?;
    Ok(())
}

impl RotaStore {
    // ── Service ────────────────────────────────────────────────────

    /// Insert a service with empty structured assignments.
    pub fn insert_service(&self, s: &NewService) -> RotaResult<()> {
        insert_new_service(&self.conn, s)
    }

    /// Insert a batch (e.g. a recurring series) atomically.
    pub fn insert_services(&self, batch: &[NewService]) -> RotaResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for s in batch {
            insert_new_service(&tx, s)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Write a raw payload, bypassing normalization. Used to load data that
    /// predates the structured shape.
    pub fn import_raw_assignments(&self, service_id: &str, payload: Option<&str>) -> RotaResult<()> {
        let updated = self.conn.execute(
            "UPDATE service SET assignments = ?1 WHERE service_id = ?2",
            params![payload, service_id],
        )?;
        if updated == 0 {
            return Err(RotaError::ServiceNotFound {
                service_id: service_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_service(&self, service_id: &str) -> RotaResult<Service> {
        fetch_service(&self.conn, service_id)
    }

    /// Raw assignments text as stored, for inspection and tests.
    pub fn raw_assignments(&self, service_id: &str) -> RotaResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT assignments FROM service WHERE service_id = ?1",
                params![service_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RotaError::ServiceNotFound {
                service_id: service_id.to_string(),
            })
    }

    /// Overwrite the assignments. Prefer `modify_assignments` for edits.
    pub fn update_service_assignments(&self, service_id: &str, assignments: &Assignments) -> RotaResult<()> {
        write_assignments(&self.conn, service_id, assignments)
    }

    /// Change the title and event type of a service.
    pub fn update_service_details(
        &self,
        service_id: &str,
        title: Option<&str>,
        event_type_id: Option<&str>,
    ) -> RotaResult<()> {
        let updated = self.conn.execute(
            "UPDATE service SET title = ?1, event_type_id = ?2 WHERE service_id = ?3",
            params![title, event_type_id, service_id],
        )?;
        if updated == 0 {
            return Err(RotaError::ServiceNotFound {
                service_id: service_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn list_services(
        &self,
        organization_id: &str,
        from: ServiceDate,
        to: ServiceDate,
    ) -> RotaResult<Vec<Service>> {
        list_services(&self.conn, organization_id, from, to)
    }

    pub fn services_for_org(&self, organization_id: &str) -> RotaResult<Vec<Service>> {
        services_for_org(&self.conn, organization_id)
    }

    pub fn delete_service(&self, service_id: &str) -> RotaResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM service WHERE service_id = ?1",
            params![service_id],
        )?;
        if deleted == 0 {
            return Err(RotaError::ServiceNotFound {
                service_id: service_id.to_string(),
            });
        }
        Ok(())
    }
}
