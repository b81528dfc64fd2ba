//! rota-runner: headless driver for the volunteer scheduling core.
//!
//! Usage:
//!   rota-runner --demo
//!   rota-runner --db rota.db --org igreja-1 --ipc-mode

mod demo;

use anyhow::Result;
use chrono::Local;
use rota_core::{
    assignment::AssignmentStatus,
    audit::SqliteAuditSink,
    config::RotaConfig,
    conflict::ConflictPreview,
    error::RotaResult,
    roster::{AccessLevel, Caller},
    scheduler::Scheduler,
    service::Service,
    store::RotaStore,
    suggest::{SlotRequest, Suggestion},
    types::EntityId,
};
use serde::Serialize;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetService {
        service_id: EntityId,
    },
    Conflicts {
        service_id: EntityId,
    },
    Suggest {
        service_id: EntityId,
        requests: Vec<SlotRequest>,
        #[serde(default)]
        caller: Option<Caller>,
    },
    ApplySuggestions {
        service_id: EntityId,
        suggestions: Vec<Suggestion>,
    },
    AddVolunteer {
        service_id: EntityId,
        volunteer_id: EntityId,
        #[serde(default)]
        force: bool,
    },
    RemoveVolunteer {
        service_id: EntityId,
        volunteer_id: EntityId,
    },
    SetStatus {
        service_id: EntityId,
        volunteer_id: EntityId,
        status: AssignmentStatus,
        #[serde(default)]
        reason: Option<String>,
    },
    AddPreacher {
        service_id: EntityId,
        preacher_id: EntityId,
        name: String,
    },
    RemovePreacher {
        service_id: EntityId,
        preacher_id: EntityId,
    },
    Quit,
}

#[derive(Serialize)]
struct ServiceView {
    service: Service,
    title: String,
    conflicts: Vec<ConflictPreview>,
}

#[derive(Serialize)]
struct Changed {
    changed: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let seed_demo = args.iter().any(|a| a == "--demo");
    let db = string_arg(&args, "--db", ":memory:");
    let data_dir = string_arg(&args, "--data-dir", "./data");
    let org = string_arg(&args, "--org", "demo");

    if !ipc_mode {
        println!("rota-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  org:       {org}");
        println!();
    }

    // For :memory: use a shared-cache URI so the audit sink's second
    // connection sees the same database.
    let db_effective: String = if db == ":memory:" {
        format!("file:rota_{}?mode=memory&cache=shared", unix_seconds())
    } else {
        db.to_string()
    };
    let store = RotaStore::open(&db_effective)?;
    store.migrate()?;

    let config = RotaConfig::load(data_dir)?;
    let audit = SqliteAuditSink::new(store.reopen()?);
    let scheduler = Scheduler::new(store, Box::new(audit), config);

    let upcoming = if seed_demo {
        let anchor = demo::next_sunday(Local::now().date_naive());
        demo::seed(&scheduler, org, anchor)?
    } else {
        Vec::new()
    };

    if ipc_mode {
        run_ipc_loop(&scheduler, org)?;
    } else {
        print_summary(&scheduler, org, &upcoming)?;
    }

    Ok(())
}

fn run_ipc_loop(scheduler: &Scheduler, org: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(scheduler, org, cmd) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("ipc: {e}");
                serde_json::json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(scheduler: &Scheduler, org: &str, cmd: IpcCommand) -> RotaResult<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::GetService { service_id } => serde_json::to_value(service_view(scheduler, &service_id)?)?,
        IpcCommand::Conflicts { service_id } => {
            serde_json::to_value(scheduler.conflict_previews(&service_id)?)?
        }
        IpcCommand::Suggest {
            service_id,
            requests,
            caller,
        } => {
            let caller = caller.unwrap_or_else(|| runner_caller(org));
            serde_json::to_value(scheduler.suggest(&service_id, &requests, &caller)?)?
        }
        IpcCommand::ApplySuggestions {
            service_id,
            suggestions,
        } => serde_json::json!({
            "added": scheduler.apply_suggestions(&service_id, &suggestions)?,
        }),
        IpcCommand::AddVolunteer {
            service_id,
            volunteer_id,
            force,
        } => serde_json::to_value(Changed {
            changed: scheduler.add_volunteer(&service_id, &volunteer_id, force)?,
        })?,
        IpcCommand::RemoveVolunteer {
            service_id,
            volunteer_id,
        } => serde_json::to_value(Changed {
            changed: scheduler.remove_volunteer(&service_id, &volunteer_id)?,
        })?,
        IpcCommand::SetStatus {
            service_id,
            volunteer_id,
            status,
            reason,
        } => serde_json::to_value(Changed {
            changed: scheduler.update_status(&service_id, &volunteer_id, status, reason.as_deref())?,
        })?,
        IpcCommand::AddPreacher {
            service_id,
            preacher_id,
            name,
        } => serde_json::to_value(Changed {
            changed: scheduler.add_preacher(&service_id, &preacher_id, &name)?,
        })?,
        IpcCommand::RemovePreacher {
            service_id,
            preacher_id,
        } => serde_json::to_value(Changed {
            changed: scheduler.remove_preacher(&service_id, &preacher_id)?,
        })?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

fn service_view(scheduler: &Scheduler, service_id: &str) -> RotaResult<ServiceView> {
    let service = scheduler.service(service_id)?;
    let title = service.display_title(&scheduler.config().fallback_title_format);
    let conflicts = scheduler.conflict_previews(service_id)?;
    Ok(ServiceView {
        service,
        title,
        conflicts,
    })
}

/// The runner acts as an administrator of the organization it was given.
fn runner_caller(org: &str) -> Caller {
    Caller {
        volunteer_id: "rota-runner".into(),
        organization_id: org.to_string(),
        access_level: AccessLevel::Admin,
        led_ministries: Default::default(),
    }
}

fn print_summary(scheduler: &Scheduler, org: &str, upcoming: &[EntityId]) -> Result<()> {
    let store = scheduler.store();
    let volunteers = store.volunteers_for_org(org)?;
    let ministries = store.ministries_for_org(org)?;
    let format = scheduler.config().fallback_title_format.as_str();

    // Staff the next upcoming service from suggestions before reporting.
    if let Some(next) = upcoming.first() {
        let requests: Vec<SlotRequest> = ministries
            .iter()
            .map(|m| SlotRequest {
                ministry_id: m.ministry_id.clone(),
                slots: 2,
            })
            .collect();
        let suggestions = scheduler.suggest(next, &requests, &runner_caller(org))?;
        let applied = scheduler.apply_suggestions(next, &suggestions)?;

        println!("=== SUGGESTIONS ===");
        for s in &suggestions {
            let missing = if s.missing_slots > 0 {
                format!(" | missing {}", s.missing_slots)
            } else {
                String::new()
            };
            println!(
                "  {:<10} | {}/{} | {}{}",
                s.ministry_name,
                s.suggested_volunteer_ids.len(),
                s.requested_slots,
                s.suggested_volunteer_ids.join(", "),
                missing
            );
        }
        println!("  applied: {}", applied.len());
        println!();
    }

    let services = store.services_for_org(org)?;
    println!("=== ROSTER SUMMARY ===");
    println!("  services:    {}", services.len());
    println!("  volunteers:  {}", volunteers.len());
    println!("  ministries:  {}", ministries.len());
    if services.is_empty() {
        println!("  (No services yet; pass --demo to seed some)");
        return Ok(());
    }

    println!();
    for service in &services {
        let counts = service.assignments.status_counts();
        println!(
            "  {} | {:<18} | pending {} | confirmed {} | declined {}",
            service.date.format(format),
            service.display_title(format),
            counts.pending,
            counts.confirmed,
            counts.declined
        );
        for c in scheduler.conflict_previews(&service.service_id)? {
            let more = if c.overflow > 0 {
                format!(" (+{} more)", c.overflow)
            } else {
                String::new()
            };
            println!("      conflict {}: {}{}", c.volunteer_id, c.examples.join(", "), more);
        }
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn unix_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
