//! REST query strings, action bodies and response envelopes
//!
//! Entity bodies (`NewShip`, `TaskUpdate`, ...) are the contract models
//! themselves; this module only holds what is specific to HTTP.

use crate::contract::{
    BunkeringStatus, CandidateSource, CargoStatus, CandidateStage, ClientStatus, CommunicationCategory,
    CommunicationStatus, CommunicationType, FormCategory, InvoiceStatus, ManualType,
    SubmissionStatus, TaskStatus, WorkLogStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// List envelope shared by every collection endpoint
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ===== Query strings =====

#[derive(Debug, Default, Deserialize)]
pub struct ShipQuery {
    pub ship_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub ship_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkLogQuery {
    pub ship_id: Option<String>,
    pub crew_id: Option<String>,
    pub status: Option<WorkLogStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub ship_id: Option<String>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BunkeringQuery {
    pub ship_id: Option<String>,
    pub status: Option<BunkeringStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CargoQuery {
    pub ship_id: Option<String>,
    pub status: Option<CargoStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateQuery {
    pub vessel_id: Option<String>,
    pub stage: Option<CandidateStage>,
    pub source: Option<CandidateSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommunicationQuery {
    pub ship_id: Option<String>,
    #[serde(rename = "type")]
    pub comm_type: Option<CommunicationType>,
    pub status: Option<CommunicationStatus>,
    pub category: Option<CommunicationCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub status: Option<ClientStatus>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManualQuery {
    pub manual_type: Option<ManualType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<FormCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionQuery {
    pub vessel_id: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub template_id: Option<String>,
}

// ===== Action bodies =====

/// Optional reviewer notes on approve/reject
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondRequest {
    pub response: String,
    #[serde(default)]
    pub mark_completed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StageRequest {
    pub stage: CandidateStage,
}

/// Fan-out request: templates by id or category, assignees by id or
/// the whole crew of the vessel; neither means one unassigned copy each
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TriggerWorkRequest {
    pub vessel_id: String,
    #[serde(default)]
    pub template_ids: Vec<String>,
    #[serde(default, alias = "form_category")]
    pub category: Option<FormCategory>,
    #[serde(default, alias = "assigned_crew_ids")]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub assign_to_all_crew: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}
