//! Work-assignment fan-out: templates x assignees -> pending submissions

use super::Directory;
use crate::contract::{
    AssigneeSelector, Caller, FilledData, FleetError, FormSubmission, FormTemplate, Role,
    SubmissionStatus, TemplateSelector, User, WorkOrder,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct FanoutService {
    templates: Collection<FormTemplate>,
    users: Collection<User>,
    submissions: Collection<FormSubmission>,
    directory: Directory,
}

impl FanoutService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            templates: Collection::new(store.clone()),
            users: Collection::new(store.clone()),
            submissions: Collection::new(store),
            directory,
        }
    }

    async fn resolve_templates(&self, selector: &TemplateSelector) -> Result<Vec<FormTemplate>, FleetError> {
        let templates = match selector {
            TemplateSelector::Ids(ids) => {
                let mut found = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.templates.get(id).await.map_err(FleetError::internal)? {
                        Some(template) => found.push(template),
                        None => debug!(template_id = %id, "skipping unknown template"),
                    }
                }
                found
            }
            TemplateSelector::Category(category) => self
                .templates
                .find(&[FieldFilter::eq("category", category)])
                .await
                .map_err(FleetError::internal)?,
        };
        if templates.is_empty() {
            return Err(FleetError::not_found(
                "Form template",
                match selector {
                    TemplateSelector::Ids(ids) => ids.join(","),
                    TemplateSelector::Category(category) => format!("{category:?}"),
                },
            ));
        }
        Ok(templates)
    }

    /// `None` stands for the vessel-wide, unassigned sentinel
    async fn resolve_assignees(
        &self,
        vessel_id: &str,
        selector: &AssigneeSelector,
    ) -> Result<Vec<Option<User>>, FleetError> {
        match selector {
            AssigneeSelector::Users(ids) => {
                let mut found = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.directory.user(id).await? {
                        Some(user) => found.push(Some(user)),
                        None => debug!(user_id = %id, "skipping unknown assignee"),
                    }
                }
                Ok(found)
            }
            AssigneeSelector::AllCrewOnVessel => Ok(self
                .users
                .find(&[
                    FieldFilter::eq("ship_id", vessel_id),
                    FieldFilter::eq("role", Role::Crew),
                ])
                .await
                .map_err(FleetError::internal)?
                .into_iter()
                .map(Some)
                .collect()),
            AssigneeSelector::Unassigned => Ok(vec![None]),
        }
    }

    /// Create one PENDING submission per (template, assignee) pair in one
    /// atomic batch. Re-triggering the same order creates duplicates.
    #[instrument(skip(self, caller, order), fields(vessel_id = %order.vessel_id))]
    pub async fn trigger_work(&self, caller: &Caller, order: WorkOrder) -> Result<Vec<FormSubmission>, FleetError> {
        caller.require_staff_or_master()?;
        let vessel = self.directory.require_ship(&order.vessel_id).await?;
        let templates = self.resolve_templates(&order.templates).await?;
        let assignees = self.resolve_assignees(&vessel.id, &order.assignees).await?;

        let now = Utc::now();
        let mut batch = Vec::with_capacity(templates.len() * assignees.len());
        for template in &templates {
            for assignee in &assignees {
                batch.push(FormSubmission {
                    id: String::new(),
                    template_id: template.id.clone(),
                    template_name: template.name.clone(),
                    vessel_id: vessel.id.clone(),
                    vessel_name: vessel.name.clone(),
                    filled_data: FilledData::new(),
                    status: SubmissionStatus::Pending,
                    assigned_to: assignee.as_ref().map(|u| u.id.clone()),
                    assigned_to_name: assignee.as_ref().map(|u| u.name.clone()),
                    assigned_by: caller.user_id.clone(),
                    assigned_by_name: caller.name.clone(),
                    assigned_at: now,
                    due_date: order.due_date,
                    submitted_by: None,
                    submitted_by_name: None,
                    submitted_at: None,
                    reviewed_by: None,
                    reviewed_by_name: None,
                    reviewed_at: None,
                    approval_notes: None,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        let created = self
            .submissions
            .insert_batch(&batch)
            .await
            .map_err(FleetError::internal)?;
        info!(
            templates = templates.len(),
            assignees = assignees.len(),
            created = created.len(),
            "work triggered"
        );
        Ok(created)
    }
}
