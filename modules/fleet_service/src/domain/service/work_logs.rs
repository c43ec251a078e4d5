use super::{apply, fetch, remove, Directory};
use crate::contract::{Caller, FleetError, NewWorkLog, WorkLog, WorkLogStatus, WorkLogUpdate};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_non_negative, require_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for WorkLog {
    const COLLECTION: &'static str = "work_logs";
    const DERIVED: &'static [&'static str] = &["crew_name", "ship_name"];
}

#[derive(Debug, Serialize)]
struct ReviewPatch {
    status: WorkLogStatus,
    approved_by: String,
    approved_by_name: String,
    approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogFilter {
    pub ship_id: Option<String>,
    pub crew_id: Option<String>,
    pub status: Option<WorkLogStatus>,
}

pub struct WorkLogsService {
    logs: Collection<WorkLog>,
    directory: Directory,
}

impl WorkLogsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            logs: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut log: WorkLog) -> Result<WorkLog, FleetError> {
        log.crew_name = self.directory.user_name(Some(&log.crew_id)).await?;
        log.ship_name = self.directory.ship_name(Some(&log.ship_id)).await?;
        Ok(log)
    }

    /// CREW only reach their own entries; others anything on their ship
    fn ensure_visible(caller: &Caller, log: &WorkLog) -> Result<(), FleetError> {
        if caller.is_crew() && log.crew_id != caller.user_id {
            return Err(FleetError::forbidden("Access denied to this work log"));
        }
        ensure_ship_access(caller, Some(&log.ship_id))
    }

    /// Owners may edit or delete their own entry until it is reviewed
    fn ensure_editable(caller: &Caller, log: &WorkLog) -> Result<(), FleetError> {
        if caller.is_crew() {
            if log.crew_id != caller.user_id {
                return Err(FleetError::forbidden("Can only modify your own work logs"));
            }
            if log.status != WorkLogStatus::Pending {
                return Err(FleetError::validation("Only pending work logs can be modified"));
            }
        }
        ensure_ship_access(caller, Some(&log.ship_id))
    }

    #[instrument(skip(self, caller, new_log), fields(crew_id = %caller.user_id))]
    pub async fn create(&self, caller: &Caller, new_log: NewWorkLog) -> Result<WorkLog, FleetError> {
        require_text("task_type", &new_log.task_type)?;
        require_text("description", &new_log.description)?;
        require_non_negative("hours_worked", new_log.hours_worked)?;

        let ship_id = new_log
            .ship_id
            .or_else(|| caller.ship_id.clone())
            .ok_or_else(|| FleetError::validation("ship_id is required"))?;
        ensure_ship_access(caller, Some(&ship_id))?;
        self.directory.require_ship(&ship_id).await?;

        let now = Utc::now();
        let log = WorkLog {
            id: String::new(),
            ship_id,
            crew_id: caller.user_id.clone(),
            date: new_log.date,
            task_type: new_log.task_type,
            description: new_log.description,
            hours_worked: new_log.hours_worked,
            status: WorkLogStatus::Pending,
            photo_url: new_log.photo_url,
            remarks: new_log.remarks,
            approved_by: None,
            approved_by_name: None,
            approved_at: None,
            crew_name: None,
            ship_name: None,
            created_at: now,
            updated_at: now,
        };
        let log = self.logs.insert(&log).await.map_err(FleetError::internal)?;
        info!(log_id = %log.id, "work log created");
        self.present(log).await
    }

    pub async fn list(&self, caller: &Caller, filter: WorkLogFilter) -> Result<Vec<WorkLog>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.ship_id.as_deref());
        let mut filters = Vec::new();
        let crew_id = if caller.is_crew() {
            Some(caller.user_id.clone())
        } else {
            filter.crew_id
        };
        if let Some(crew_id) = crew_id {
            filters.push(FieldFilter::eq("crew_id", crew_id));
        }
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }

        let mut logs = self
            .logs
            .find_scoped(&scope, "ship_id", filters)
            .await
            .map_err(FleetError::internal)?;
        logs.sort_by(|a, b| b.date.cmp(&a.date));

        let mut out = Vec::with_capacity(logs.len());
        for log in logs {
            out.push(self.present(log).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<WorkLog, FleetError> {
        let log = fetch(&self.logs, "Work log", id).await?;
        Self::ensure_visible(caller, &log)?;
        self.present(log).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: WorkLogUpdate) -> Result<WorkLog, FleetError> {
        let log = fetch(&self.logs, "Work log", id).await?;
        Self::ensure_editable(caller, &log)?;
        if let Some(hours) = update.hours_worked {
            require_non_negative("hours_worked", hours)?;
        }
        let log = apply(&self.logs, "Work log", id, &update).await?;
        info!(log_id = %id, "work log updated");
        self.present(log).await
    }

    pub async fn approve(&self, caller: &Caller, id: &str) -> Result<WorkLog, FleetError> {
        self.review(caller, id, WorkLogStatus::Approved).await
    }

    pub async fn reject(&self, caller: &Caller, id: &str) -> Result<WorkLog, FleetError> {
        self.review(caller, id, WorkLogStatus::Rejected).await
    }

    #[instrument(skip(self, caller))]
    async fn review(&self, caller: &Caller, id: &str, outcome: WorkLogStatus) -> Result<WorkLog, FleetError> {
        caller.require_master()?;
        let log = fetch(&self.logs, "Work log", id).await?;
        if log.status != WorkLogStatus::Pending {
            return Err(FleetError::validation("Only pending work logs can be reviewed"));
        }
        let patch = ReviewPatch {
            status: outcome,
            approved_by: caller.user_id.clone(),
            approved_by_name: caller.name.clone(),
            approved_at: Utc::now(),
        };
        let log = apply(&self.logs, "Work log", id, &patch).await?;
        info!(log_id = %id, status = ?outcome, "work log reviewed");
        self.present(log).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        let log = fetch(&self.logs, "Work log", id).await?;
        Self::ensure_editable(caller, &log)?;
        remove(&self.logs, "Work log", id).await?;
        info!(log_id = %id, "work log deleted");
        Ok(())
    }
}
