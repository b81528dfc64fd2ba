//! Organizations, event types, ministries, volunteers and memberships.

use super::RotaStore;
use crate::{
    error::{RotaError, RotaResult},
    roster::{AccessLevel, Ministry, MinistryMembership, Volunteer},
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

fn parse_access_level(raw: String) -> rusqlite::Result<AccessLevel> {
    AccessLevel::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown access level '{raw}'").into(),
        )
    })
}

pub(super) fn volunteers_for_org(conn: &Connection, organization_id: &str) -> RotaResult<Vec<Volunteer>> {
    let mut memberships: HashMap<String, Vec<MinistryMembership>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT mm.volunteer_id, mm.ministry_id, mm.is_leader
             FROM ministry_membership mm
             JOIN volunteer v ON v.volunteer_id = mm.volunteer_id
             WHERE v.organization_id = ?1
             ORDER BY mm.volunteer_id, mm.ministry_id",
        )?;
        let rows = stmt.query_map(params![organization_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                MinistryMembership {
                    ministry_id: r.get(1)?,
                    is_leader: r.get::<_, i32>(2)? != 0,
                },
            ))
        })?;
        for row in rows {
            let (volunteer_id, membership) = row?;
            memberships.entry(volunteer_id).or_default().push(membership);
        }
    }

    let mut stmt = conn.prepare(
        "SELECT volunteer_id, organization_id, name, access_level
         FROM volunteer WHERE organization_id = ?1
         ORDER BY name ASC, volunteer_id ASC",
    )?;
    let rows = stmt.query_map(params![organization_id], |r| {
        Ok(Volunteer {
            volunteer_id: r.get(0)?,
            organization_id: r.get(1)?,
            name: r.get(2)?,
            access_level: parse_access_level(r.get(3)?)?,
            ministries: Vec::new(),
        })
    })?;

    let mut result = Vec::new();
    for row in rows {
        let mut v = row?;
        v.ministries = memberships.remove(&v.volunteer_id).unwrap_or_default();
        result.push(v);
    }
    Ok(result)
}

pub(super) fn fetch_volunteer(conn: &Connection, volunteer_id: &str) -> RotaResult<Volunteer> {
    let not_found = || RotaError::VolunteerNotFound {
        volunteer_id: volunteer_id.to_string(),
    };
    let organization_id: String = conn
        .query_row(
            "SELECT organization_id FROM volunteer WHERE volunteer_id = ?1",
            params![volunteer_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or_else(not_found)?;
    volunteers_for_org(conn, &organization_id)?
        .into_iter()
        .find(|v| v.volunteer_id == volunteer_id)
        .ok_or_else(not_found)
}

pub(super) fn ministries_for_org(conn: &Connection, organization_id: &str) -> RotaResult<Vec<Ministry>> {
    let mut stmt = conn.prepare(
        "SELECT ministry_id, organization_id, name
         FROM ministry WHERE organization_id = ?1
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![organization_id], |r| {
        Ok(Ministry {
            ministry_id: r.get(0)?,
            organization_id: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl RotaStore {
    // ── Organization ───────────────────────────────────────────────

    pub fn insert_organization(&self, organization_id: &str, name: &str) -> RotaResult<()> {
        self.conn.execute(
            "INSERT INTO organization (organization_id, name) VALUES (?1, ?2)",
            params![organization_id, name],
        )?;
        Ok(())
    }

    pub fn insert_event_type(&self, organization_id: &str, event_type_id: &str, name: &str) -> RotaResult<()> {
        self.conn.execute(
            "INSERT INTO event_type (event_type_id, organization_id, name) VALUES (?1, ?2, ?3)",
            params![event_type_id, organization_id, name],
        )?;
        Ok(())
    }

    // ── Ministry ───────────────────────────────────────────────────

    pub fn insert_ministry(&self, m: &Ministry) -> RotaResult<()> {
        self.conn.execute(
            "INSERT INTO ministry (ministry_id, organization_id, name) VALUES (?1, ?2, ?3)",
            params![&m.ministry_id, &m.organization_id, &m.name],
        )?;
        Ok(())
    }

    pub fn ministries_for_org(&self, organization_id: &str) -> RotaResult<Vec<Ministry>> {
        ministries_for_org(&self.conn, organization_id)
    }

    // ── Volunteer ──────────────────────────────────────────────────

    /// Insert a volunteer together with their ministry memberships.
    pub fn insert_volunteer(&self, v: &Volunteer) -> RotaResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO volunteer (volunteer_id, organization_id, name, access_level)
             VALUES (?1, ?2, ?3, ?4)",
            params![&v.volunteer_id, &v.organization_id, &v.name, v.access_level.as_str()],
        )?;
        for m in &v.ministries {
            tx.execute(
                "INSERT INTO ministry_membership (volunteer_id, ministry_id, is_leader)
                 VALUES (?1, ?2, ?3)",
                params![&v.volunteer_id, &m.ministry_id, if m.is_leader { 1 } else { 0 }],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn volunteers_for_org(&self, organization_id: &str) -> RotaResult<Vec<Volunteer>> {
        volunteers_for_org(&self.conn, organization_id)
    }

    pub fn get_volunteer(&self, volunteer_id: &str) -> RotaResult<Volunteer> {
        fetch_volunteer(&self.conn, volunteer_id)
    }
}
