//! The scheduler: every assignment read and write for one store.
//!
//! RULES:
//!   - Every mutation is a read-modify-write inside one store transaction
//!     (`RotaStore::modify_assignments`); in-memory copies are never written back.
//!   - Unavailability always blocks an addition. A same-day booking elsewhere
//!     blocks it unless the caller forces the addition.
//!   - One audit entry per committed change, recorded after the commit.
//!     No-ops record nothing.

use crate::{
    assignment::AssignmentStatus,
    audit::{AuditEntry, AuditEvent, AuditSink, LogAuditSink},
    availability::is_unavailable,
    config::RotaConfig,
    conflict::{bookings_on_date, find_same_day_conflicts, preview_conflicts, ConflictMap, ConflictPreview},
    error::{RotaError, RotaResult},
    recurrence::{plan_series, SeriesRequest},
    roster::Caller,
    service::Service,
    store::RotaStore,
    suggest::{suggest, suggested_ids, SlotRequest, Suggestion},
    types::EntityId,
};

pub struct Scheduler {
    store: RotaStore,
    audit: Box<dyn AuditSink>,
    config: RotaConfig,
}

impl Scheduler {
    pub fn new(store: RotaStore, audit: Box<dyn AuditSink>, config: RotaConfig) -> Self {
        Self { store, audit, config }
    }

    /// A scheduler that audits to the log.
    pub fn build(store: RotaStore, config: RotaConfig) -> Self {
        Self::new(store, Box::new(LogAuditSink), config)
    }

    pub fn store(&self) -> &RotaStore {
        &self.store
    }

    pub fn config(&self) -> &RotaConfig {
        &self.config
    }

    pub fn service(&self, service_id: &str) -> RotaResult<Service> {
        self.store.get_service(service_id)
    }

    // ── Conflicts ──────────────────────────────────────────────

    /// Volunteers on `service_id` who are also on another service that day.
    pub fn conflicts(&self, service_id: &str) -> RotaResult<ConflictMap> {
        let target = self.store.get_service(service_id)?;
        let same_day = self
            .store
            .list_services(&target.organization_id, target.date, target.date)?;
        Ok(find_same_day_conflicts(
            &target,
            &same_day,
            &self.config.fallback_title_format,
        ))
    }

    pub fn conflict_previews(&self, service_id: &str) -> RotaResult<Vec<ConflictPreview>> {
        let conflicts = self.conflicts(service_id)?;
        Ok(preview_conflicts(&conflicts, self.config.conflict_preview_limit))
    }

    // ── Suggestions ────────────────────────────────────────────

    /// Ranked suggestions for the open slots of one service. Read-only.
    pub fn suggest(
        &self,
        service_id: &str,
        requests: &[SlotRequest],
        caller: &Caller,
    ) -> RotaResult<Vec<Suggestion>> {
        if requests.iter().all(|r| r.slots == 0) {
            return Err(RotaError::validation(
                "request at least one slot before asking for suggestions",
            ));
        }
        let organization_id = self.store.get_service(service_id)?.organization_id;
        if caller.organization_id != organization_id {
            return Err(RotaError::Forbidden {
                reason: format!("service '{service_id}' belongs to another organization"),
            });
        }

        let snapshot = self.store.snapshot(&organization_id)?;
        let target = snapshot
            .service(service_id)
            .ok_or_else(|| RotaError::ServiceNotFound {
                service_id: service_id.to_string(),
            })?;
        suggest(target, requests, &snapshot, caller)
    }

    /// Append every suggested volunteer not already on the service, as
    /// pending and tagged with the auto-schedule note. Ids off the roster or
    /// unavailable on the date are skipped. Returns the ids added.
    pub fn apply_suggestions(
        &self,
        service_id: &str,
        suggestions: &[Suggestion],
    ) -> RotaResult<Vec<EntityId>> {
        let marker = self.config.auto_schedule_note.as_str();
        let ids = suggested_ids(suggestions);
        let result = self.store.modify_assignments(service_id, |view, service, assignments| {
            let mut admissible = Vec::with_capacity(ids.len());
            for &id in &ids {
                if assignments.contains_volunteer(id) {
                    continue;
                }
                match view.roster_member(&service.organization_id, id) {
                    Ok(_) => {}
                    Err(RotaError::VolunteerNotFound { .. }) => {
                        log::warn!("service={service_id}: skipped suggested {id}, not on the roster");
                        continue;
                    }
                    Err(e) => return Err(e),
                }
                let windows = view.unavailability_for(id)?;
                if is_unavailable(id, service.date, &windows).is_some() {
                    log::warn!("service={service_id}: skipped suggested {id}, unavailable that day");
                    continue;
                }
                admissible.push(id);
            }
            Ok(assignments.apply_suggested(admissible, marker))
        })?;

        if result.changed {
            log::info!(
                "service={service_id}: applied {} suggested volunteer(s)",
                result.value.len()
            );
            self.emit(&AuditEvent::SuggestionsApplied {
                service_id: service_id.to_string(),
                volunteer_ids: result.value.clone(),
            });
        }
        Ok(result.value)
    }

    // ── Volunteers ─────────────────────────────────────────────

    /// Add a volunteer as pending. Returns `false` if they were already on it.
    ///
    /// Fails with `VolunteerNotFound` when the id is not on the roster of the
    /// service's organization, with `Unavailable` when the date is inside one
    /// of their windows whatever `force` says, and with `Conflict` when they
    /// are on another service that day unless `force` is set.
    pub fn add_volunteer(&self, service_id: &str, volunteer_id: &str, force: bool) -> RotaResult<bool> {
        let date_format = self.config.fallback_title_format.as_str();
        let result = self.store.modify_assignments(service_id, |view, service, assignments| {
            if assignments.contains_volunteer(volunteer_id) {
                return Ok(Vec::new());
            }
            view.roster_member(&service.organization_id, volunteer_id)?;

            let windows = view.unavailability_for(volunteer_id)?;
            if let Some(w) = is_unavailable(volunteer_id, service.date, &windows) {
                return Err(RotaError::Unavailable {
                    volunteer_id: volunteer_id.to_string(),
                    start_date: w.start_date,
                    end_date: w.end_date,
                    reason: w.reason.clone(),
                });
            }

            let same_day = view.services_on(&service.organization_id, service.date)?;
            let titles: Vec<String> =
                bookings_on_date(volunteer_id, service.date, &service.service_id, &same_day)
                    .map(|s| s.display_title(date_format))
                    .collect();
            if !titles.is_empty() && !force {
                return Err(RotaError::Conflict {
                    volunteer_id: volunteer_id.to_string(),
                    titles,
                });
            }

            assignments.add_volunteer(volunteer_id);
            Ok(titles)
        })?;

        if result.changed {
            if !result.value.is_empty() {
                log::warn!(
                    "service={service_id}: {volunteer_id} force-added despite booking on {}",
                    result.value.join(", ")
                );
            }
            log::info!("service={service_id}: assigned {volunteer_id}");
            self.emit(&AuditEvent::VolunteerAssigned {
                service_id: service_id.to_string(),
                volunteer_id: volunteer_id.to_string(),
                forced: !result.value.is_empty(),
            });
        }
        Ok(result.changed)
    }

    /// Remove a volunteer. Returns `false` if they were not on the service.
    pub fn remove_volunteer(&self, service_id: &str, volunteer_id: &str) -> RotaResult<bool> {
        let result = self.store.modify_assignments(service_id, |_, _, assignments| {
            Ok(assignments.remove_volunteer(volunteer_id))
        })?;

        if result.changed {
            log::info!("service={service_id}: unassigned {volunteer_id}");
            self.emit(&AuditEvent::VolunteerUnassigned {
                service_id: service_id.to_string(),
                volunteer_id: volunteer_id.to_string(),
            });
        }
        Ok(result.changed)
    }

    /// Confirm, decline, or reset an assignment. `reason` is kept only for
    /// `declined`; any other status clears the note.
    pub fn update_status(
        &self,
        service_id: &str,
        volunteer_id: &str,
        status: AssignmentStatus,
        reason: Option<&str>,
    ) -> RotaResult<bool> {
        let result = self.store.modify_assignments(service_id, |_, _, assignments| {
            assignments
                .update_status(volunteer_id, status, reason)
                .ok_or_else(|| RotaError::AssignmentNotFound {
                    service_id: service_id.to_string(),
                    volunteer_id: volunteer_id.to_string(),
                })
        })?;

        if result.changed {
            let note = result
                .service
                .assignments
                .volunteer(volunteer_id)
                .and_then(|a| a.note.clone());
            log::info!(
                "service={service_id}: {volunteer_id} is now {}",
                status.as_str()
            );
            self.emit(&AuditEvent::AssignmentStatusChanged {
                service_id: service_id.to_string(),
                volunteer_id: volunteer_id.to_string(),
                status,
                note,
            });
        }
        Ok(result.changed)
    }

    // ── Preachers ──────────────────────────────────────────────

    pub fn add_preacher(&self, service_id: &str, preacher_id: &str, name: &str) -> RotaResult<bool> {
        let result = self.store.modify_assignments(service_id, |_, _, assignments| {
            Ok(assignments.add_preacher(preacher_id, name))
        })?;

        if result.changed {
            log::info!("service={service_id}: preacher {preacher_id} assigned");
            self.emit(&AuditEvent::PreacherAssigned {
                service_id: service_id.to_string(),
                preacher_id: preacher_id.to_string(),
            });
        }
        Ok(result.changed)
    }

    pub fn remove_preacher(&self, service_id: &str, preacher_id: &str) -> RotaResult<bool> {
        let result = self.store.modify_assignments(service_id, |_, _, assignments| {
            Ok(assignments.remove_preacher(preacher_id))
        })?;

        if result.changed {
            log::info!("service={service_id}: preacher {preacher_id} removed");
            self.emit(&AuditEvent::PreacherRemoved {
                service_id: service_id.to_string(),
                preacher_id: preacher_id.to_string(),
            });
        }
        Ok(result.changed)
    }

    // ── Services ───────────────────────────────────────────────

    /// Create every occurrence of a recurring series in one batch.
    pub fn create_series(&self, request: &SeriesRequest) -> RotaResult<Vec<EntityId>> {
        let planned = plan_series(request)?;
        self.store.insert_services(&planned)?;

        let service_ids: Vec<EntityId> = planned.into_iter().map(|s| s.service_id).collect();
        log::info!(
            "org={}: created series of {} service(s)",
            request.organization_id,
            service_ids.len()
        );
        self.emit(&AuditEvent::SeriesCreated {
            organization_id: request.organization_id.clone(),
            service_ids: service_ids.clone(),
        });
        Ok(service_ids)
    }

    pub fn delete_service(&self, service_id: &str, caller: &Caller) -> RotaResult<()> {
        let service = self.store.get_service(service_id)?;
        let volunteers = self.store.volunteers_for_org(&service.organization_id)?;
        if caller.organization_id != service.organization_id
            || !caller.can_delete_service(&service, &volunteers)
        {
            return Err(RotaError::Forbidden {
                reason: format!("{} may not delete service '{service_id}'", caller.volunteer_id),
            });
        }

        self.store.delete_service(service_id)?;
        log::info!("service={service_id}: deleted by {}", caller.volunteer_id);
        self.emit(&AuditEvent::ServiceDeleted {
            service_id: service_id.to_string(),
            deleted_by: caller.volunteer_id.clone(),
        });
        Ok(())
    }

    // ── Audit ──────────────────────────────────────────────────

    fn emit(&self, event: &AuditEvent) {
        let entry = match AuditEntry::from_event(event) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("audit: could not serialize {}: {e}", event.action());
                return;
            }
        };
        if let Err(e) = self.audit.record(&entry) {
            log::warn!("audit: sink rejected {} for {}: {e}", entry.action, entry.entity_id);
        }
    }
}
