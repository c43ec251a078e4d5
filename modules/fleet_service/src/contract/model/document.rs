//! Manuals, form templates and form submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ManualType {
    #[serde(rename = "FPM")]
    Fpm,
    #[serde(rename = "SMM")]
    Smm,
    #[serde(rename = "CPM")]
    Cpm,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Manual {
    pub id: String,
    pub title: String,
    pub manual_type: ManualType,
    pub version: String,
    pub file_url: Option<String>,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewManual {
    pub title: String,
    pub manual_type: ManualType,
    pub version: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FormCategory {
    Checklist,
    Report,
    #[serde(rename = "ISM")]
    Ism,
    #[serde(rename = "PMS")]
    Pms,
    #[serde(rename = "HR")]
    Hr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Signature,
    Photo,
    Table,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// One input on a form; table fields nest their column definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub columns: Option<Vec<FormField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormTemplate {
    pub id: String,
    pub name: String,
    pub category: FormCategory,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default = "super::default_true")]
    pub approval_required: bool,
    pub manual_reference_id: Option<String>,
    #[serde(default)]
    pub scheduled: ScheduleFrequency,
    /// Audience expected to fill the form
    pub role: super::Role,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewFormTemplate {
    pub name: String,
    pub category: FormCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default = "super::default_true")]
    pub approval_required: bool,
    #[serde(default)]
    pub manual_reference_id: Option<String>,
    #[serde(default)]
    pub scheduled: ScheduleFrequency,
    #[serde(default = "default_audience")]
    pub role: super::Role,
}

fn default_audience() -> super::Role {
    super::Role::Crew
}

/// Submission lifecycle: PENDING -> SUBMITTED -> {APPROVED, REJECTED}
///
/// `Flagged` is part of the stored vocabulary but no operation moves a
/// submission into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
    Flagged,
}

impl SubmissionStatus {
    /// Approved and rejected submissions are read-only
    pub fn is_final(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

pub type FilledData = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormSubmission {
    pub id: String,
    pub template_id: String,
    pub template_name: String,
    pub vessel_id: String,
    pub vessel_name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub filled_data: FilledData,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub assigned_by: String,
    pub assigned_by_name: String,
    pub assigned_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub submitted_by: Option<String>,
    pub submitted_by_name: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub reviewed_by_name: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub approval_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which templates a work trigger targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    Ids(Vec<String>),
    Category(FormCategory),
}

/// Who receives the generated submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeSelector {
    Users(Vec<String>),
    AllCrewOnVessel,
    /// One vessel-wide submission per template
    Unassigned,
}

/// Input of the work-assignment fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrder {
    pub vessel_id: String,
    pub templates: TemplateSelector,
    pub assignees: AssigneeSelector,
    pub due_date: Option<DateTime<Utc>>,
}

/// Edit of a submission by its assignee or an administrator
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmissionUpdate {
    /// Replaces the stored map wholesale
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub filled_data: Option<FilledData>,
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    #[serde(default)]
    pub approval_notes: Option<String>,
}
