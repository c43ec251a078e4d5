use super::{apply, fetch, remove, Directory};
use crate::contract::{
    Caller, FleetError, NewTask, Role, Task, TaskStats, TaskStatus, TaskUpdate,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_non_negative, require_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

impl Record for Task {
    const COLLECTION: &'static str = "pms_tasks";
    const DERIVED: &'static [&'static str] = &["ship_name", "assigned_to_name"];
}

/// Stored changes beyond what the caller sent
#[derive(Debug, Default, Serialize)]
struct TaskPatch {
    #[serde(flatten)]
    update: TaskUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    ship_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approved_by: Option<Option<String>>,
}

/// List filters for tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub ship_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
}

pub struct TasksService {
    tasks: Collection<Task>,
    directory: Directory,
}

impl TasksService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            tasks: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut task: Task) -> Result<Task, FleetError> {
        task.ship_name = self.directory.ship_name(Some(&task.ship_id)).await?;
        task.assigned_to_name = self.directory.user_name(task.assigned_to.as_deref()).await?;
        Ok(task)
    }

    /// Ship of a CREW assignee, which tasks follow
    async fn assignee_ship(&self, assignee_id: &str) -> Result<Option<String>, FleetError> {
        let assignee = self.directory.require_user(assignee_id).await?;
        Ok(match (assignee.role, assignee.ship_id) {
            (Role::Crew, Some(ship_id)) => Some(ship_id),
            _ => None,
        })
    }

    fn ensure_visible(caller: &Caller, task: &Task) -> Result<(), FleetError> {
        ensure_ship_access(caller, Some(&task.ship_id))?;
        if caller.is_crew() && task.assigned_to.as_deref() != Some(caller.user_id.as_str()) {
            return Err(FleetError::forbidden("Access denied to this task"));
        }
        Ok(())
    }

    #[instrument(skip(self, caller, new_task), fields(equipment = %new_task.equipment_name))]
    pub async fn create(&self, caller: &Caller, new_task: NewTask) -> Result<Task, FleetError> {
        caller.require_staff_or_master()?;
        require_text("equipment_name", &new_task.equipment_name)?;
        require_text("task_description", &new_task.task_description)?;
        if let Some(hours) = new_task.estimated_hours {
            require_non_negative("estimated_hours", hours)?;
        }

        let mut ship_id = if caller.is_master() {
            new_task.ship_id
        } else {
            Some(caller.ship_id.clone().ok_or_else(|| {
                FleetError::forbidden("Staff must be assigned to a vessel to create tasks")
            })?)
        };
        if let Some(assignee) = &new_task.assigned_to {
            if let Some(crew_ship) = self.assignee_ship(assignee).await? {
                ship_id = Some(crew_ship);
            }
        }
        let ship_id = ship_id.ok_or_else(|| FleetError::validation("ship_id is required"))?;
        self.directory.require_ship(&ship_id).await?;

        let now = Utc::now();
        let task = Task {
            id: String::new(),
            ship_id,
            equipment_name: new_task.equipment_name,
            task_description: new_task.task_description,
            frequency: new_task.frequency,
            priority: new_task.priority,
            status: TaskStatus::Pending,
            assigned_to: new_task.assigned_to,
            due_date: new_task.due_date,
            completed_date: None,
            estimated_hours: new_task.estimated_hours,
            actual_hours: None,
            instructions: new_task.instructions,
            safety_notes: new_task.safety_notes,
            completion_notes: None,
            photos: Vec::new(),
            created_by: caller.user_id.clone(),
            approved_by: None,
            ship_name: None,
            assigned_to_name: None,
            created_at: now,
            updated_at: now,
        };
        let task = self.tasks.insert(&task).await.map_err(FleetError::internal)?;
        info!(task_id = %task.id, ship_id = %task.ship_id, "task created");
        self.present(task).await
    }

    /// Scoped list; CREW additionally see only tasks assigned to them
    pub async fn list(&self, caller: &Caller, filter: TaskFilter) -> Result<Vec<Task>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.ship_id.as_deref());
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        let assignee = if caller.is_crew() {
            Some(caller.user_id.clone())
        } else {
            filter.assigned_to
        };
        if let Some(assignee) = assignee {
            filters.push(FieldFilter::eq("assigned_to", assignee));
        }

        let mut tasks = self
            .tasks
            .find_scoped(&scope, "ship_id", filters)
            .await
            .map_err(FleetError::internal)?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = tasks.len(), "listed tasks");

        let mut out = Vec::with_capacity(tasks.len());
        for task in tasks {
            out.push(self.present(task).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Task, FleetError> {
        let task = fetch(&self.tasks, "Task", id).await?;
        Self::ensure_visible(caller, &task)?;
        self.present(task).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: TaskUpdate) -> Result<Task, FleetError> {
        let task = fetch(&self.tasks, "Task", id).await?;
        if caller.is_crew() {
            if task.assigned_to.as_deref() != Some(caller.user_id.as_str()) {
                return Err(FleetError::forbidden("Can only update assigned tasks"));
            }
            if !update.is_crew_editable() {
                return Err(FleetError::forbidden(
                    "Crew may only update status, completion notes, actual hours and photos",
                ));
            }
            if update.status.is_some_and(|status| !status.is_crew_settable()) {
                return Err(FleetError::forbidden(
                    "Crew may only move tasks between pending, in progress and completed",
                ));
            }
        }
        ensure_ship_access(caller, Some(&task.ship_id))?;
        if let Some(hours) = update.actual_hours {
            require_non_negative("actual_hours", hours)?;
        }

        let mut patch = TaskPatch::default();
        if let Some(assignee) = update.assigned_to.as_deref() {
            if task.assigned_to.as_deref() != Some(assignee) {
                patch.ship_id = self.assignee_ship(assignee).await?;
            }
        }
        if update.status == Some(TaskStatus::Completed) {
            patch.completed_date = Some(Utc::now());
        }
        patch.update = update;

        let task = apply(&self.tasks, "Task", id, &patch).await?;
        info!(task_id = %id, status = ?task.status, "task updated");
        self.present(task).await
    }

    /// MASTER signs off a completed task
    #[instrument(skip(self, caller))]
    pub async fn approve(&self, caller: &Caller, id: &str) -> Result<Task, FleetError> {
        caller.require_master()?;
        let task = fetch(&self.tasks, "Task", id).await?;
        if task.status != TaskStatus::Completed {
            return Err(FleetError::validation("Task must be completed before approval"));
        }
        let patch = TaskPatch {
            update: TaskUpdate {
                status: Some(TaskStatus::Approved),
                ..Default::default()
            },
            approved_by: Some(Some(caller.user_id.clone())),
            ..Default::default()
        };
        let task = apply(&self.tasks, "Task", id, &patch).await?;
        info!(task_id = %id, "task approved");
        self.present(task).await
    }

    /// MASTER sends a completed task back to work
    #[instrument(skip(self, caller))]
    pub async fn reject(&self, caller: &Caller, id: &str) -> Result<Task, FleetError> {
        caller.require_master()?;
        let task = fetch(&self.tasks, "Task", id).await?;
        if task.status != TaskStatus::Completed {
            return Err(FleetError::validation("Only completed tasks can be rejected"));
        }
        let patch = TaskPatch {
            update: TaskUpdate {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
            approved_by: Some(None),
            ..Default::default()
        };
        let task = apply(&self.tasks, "Task", id, &patch).await?;
        info!(task_id = %id, "task rejected");
        self.present(task).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_staff_or_master()?;
        let task = fetch(&self.tasks, "Task", id).await?;
        ensure_ship_access(caller, Some(&task.ship_id))?;
        remove(&self.tasks, "Task", id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    pub async fn ship_stats(&self, caller: &Caller, ship_id: &str) -> Result<TaskStats, FleetError> {
        ensure_ship_access(caller, Some(ship_id))?;
        let tasks = self
            .tasks
            .find(&[FieldFilter::eq("ship_id", ship_id)])
            .await
            .map_err(FleetError::internal)?;

        let mut stats = TaskStats {
            ship_id: ship_id.to_owned(),
            total: tasks.len(),
            ..Default::default()
        };
        for task in &tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Overdue => stats.overdue += 1,
                TaskStatus::Approved => stats.approved += 1,
                TaskStatus::Rejected => stats.rejected += 1,
            }
        }
        stats.awaiting_approval = stats.completed;
        Ok(stats)
    }
}
