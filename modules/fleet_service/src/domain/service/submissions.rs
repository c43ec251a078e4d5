//! Form submission lifecycle
//!
//! PENDING -> SUBMITTED by the assignee (any vessel user when unassigned),
//! SUBMITTED -> APPROVED | REJECTED by MASTER. STAFF and MASTER may override
//! the status of a PENDING or SUBMITTED submission directly. APPROVED and
//! REJECTED are terminal; nothing moves a submission into FLAGGED.

use super::{apply, fetch};
use crate::contract::{
    Caller, FilledData, FleetError, FormSubmission, SubmissionStatus, SubmissionUpdate,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for FormSubmission {
    const COLLECTION: &'static str = "form_submissions";
}

#[derive(Debug, Default, Serialize)]
struct SubmissionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    filled_data: Option<FilledData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SubmissionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_at: Option<DateTime<Utc>>,
}

impl SubmissionPatch {
    fn stamp_submitted(&mut self, caller: &Caller, at: DateTime<Utc>) {
        self.submitted_by = Some(caller.user_id.clone());
        self.submitted_by_name = Some(caller.name.clone());
        self.submitted_at = Some(at);
    }

    fn stamp_reviewed(&mut self, caller: &Caller, at: DateTime<Utc>) {
        self.reviewed_by = Some(caller.user_id.clone());
        self.reviewed_by_name = Some(caller.name.clone());
        self.reviewed_at = Some(at);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub vessel_id: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub template_id: Option<String>,
}

pub struct SubmissionsService {
    submissions: Collection<FormSubmission>,
}

/// CREW only reach their own or unassigned submissions
fn crew_may_access(caller: &Caller, submission: &FormSubmission) -> bool {
    match &submission.assigned_to {
        Some(assignee) => *assignee == caller.user_id,
        None => true,
    }
}

impl SubmissionsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            submissions: Collection::new(store),
        }
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<FormSubmission, FleetError> {
        let submission = fetch(&self.submissions, "Submission", id).await?;
        ensure_ship_access(caller, Some(&submission.vessel_id))?;
        if caller.is_crew() && !crew_may_access(caller, &submission) {
            return Err(FleetError::forbidden("Submission is assigned to another user"));
        }
        Ok(submission)
    }

    pub async fn list(&self, caller: &Caller, filter: SubmissionFilter) -> Result<Vec<FormSubmission>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.vessel_id.as_deref());
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        if let Some(template_id) = filter.template_id {
            filters.push(FieldFilter::eq("template_id", template_id));
        }
        let mut submissions = self
            .submissions
            .find_scoped(&scope, "vessel_id", filters)
            .await
            .map_err(FleetError::internal)?;
        if caller.is_crew() {
            submissions.retain(|s| crew_may_access(caller, s));
        }
        submissions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(submissions)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<FormSubmission, FleetError> {
        self.fetch_accessible(caller, id).await
    }

    /// Fill in, submit, or administratively override a submission
    #[instrument(skip(self, caller, update))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        update: SubmissionUpdate,
    ) -> Result<FormSubmission, FleetError> {
        let current = self.fetch_accessible(caller, id).await?;
        if current.status.is_final() {
            return Err(FleetError::validation(format!(
                "Submission is already {:?} and can no longer be modified",
                current.status
            )));
        }
        if update.status == Some(SubmissionStatus::Flagged) {
            return Err(FleetError::validation("Submissions cannot be flagged"));
        }
        if caller.is_crew() {
            if current.status != SubmissionStatus::Pending {
                return Err(FleetError::validation("Only pending submissions can be edited"));
            }
            if !matches!(update.status, None | Some(SubmissionStatus::Submitted)) {
                return Err(FleetError::forbidden("Crew may only submit a form"));
            }
        }

        let now = Utc::now();
        let mut patch = SubmissionPatch {
            filled_data: update.filled_data,
            status: update.status,
            approval_notes: update.approval_notes,
            ..Default::default()
        };
        match update.status {
            Some(SubmissionStatus::Submitted) if current.status == SubmissionStatus::Pending => {
                patch.stamp_submitted(caller, now)
            }
            Some(SubmissionStatus::Approved | SubmissionStatus::Rejected) => {
                patch.stamp_reviewed(caller, now)
            }
            _ => {}
        }

        let submission = apply(&self.submissions, "Submission", id, &patch).await?;
        info!(submission_id = %id, status = ?submission.status, "submission updated");
        Ok(submission)
    }

    pub async fn approve(&self, caller: &Caller, id: &str, notes: Option<String>) -> Result<FormSubmission, FleetError> {
        self.review(caller, id, SubmissionStatus::Approved, notes).await
    }

    pub async fn reject(&self, caller: &Caller, id: &str, notes: Option<String>) -> Result<FormSubmission, FleetError> {
        self.review(caller, id, SubmissionStatus::Rejected, notes).await
    }

    #[instrument(skip(self, caller, notes))]
    async fn review(
        &self,
        caller: &Caller,
        id: &str,
        outcome: SubmissionStatus,
        notes: Option<String>,
    ) -> Result<FormSubmission, FleetError> {
        caller.require_master()?;
        let current = fetch(&self.submissions, "Submission", id).await?;
        if current.status != SubmissionStatus::Submitted {
            return Err(FleetError::validation(format!(
                "Only submitted forms can be reviewed (current status: {:?})",
                current.status
            )));
        }
        let mut patch = SubmissionPatch {
            status: Some(outcome),
            approval_notes: notes,
            ..Default::default()
        };
        patch.stamp_reviewed(caller, Utc::now());

        let submission = apply(&self.submissions, "Submission", id, &patch).await?;
        info!(submission_id = %id, status = ?outcome, "submission reviewed");
        Ok(submission)
    }
}
