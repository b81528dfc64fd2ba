use super::RotaStore;
use crate::{audit::AuditEntry, error::RotaResult};
use rusqlite::params;

impl RotaStore {
    // ── Audit log ──────────────────────────────────────────────────

    pub fn append_audit(&self, entry: &AuditEntry) -> RotaResult<()> {
        self.conn.execute(
            "INSERT INTO audit_log (action, entity_id, metadata) VALUES (?1, ?2, ?3)",
            params![&entry.action, &entry.entity_id, &entry.metadata],
        )?;
        Ok(())
    }

    pub fn audit_entries_for(&self, entity_id: &str) -> RotaResult<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, action, entity_id, metadata
             FROM audit_log WHERE entity_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![entity_id], |row| {
                Ok(AuditEntry {
                    id: Some(row.get(0)?),
                    action: row.get(1)?,
                    entity_id: row.get(2)?,
                    metadata: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
