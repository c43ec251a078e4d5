use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationType {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationCategory {
    Training,
    Manning,
    Safety,
    Medical,
    Dispute,
    Certification,
    Inspection,
    Compliance,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStatus {
    #[default]
    Pending,
    ActionRequired,
    InProgress,
    Completed,
    Archived,
}

/// Correspondence with the Directorate General of Shipping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Communication {
    pub id: String,
    #[schema(example = "DGS-IN-2025-001")]
    pub ref_no: String,
    pub comm_type: CommunicationType,
    pub subject: String,
    pub content: String,
    pub category: CommunicationCategory,
    #[serde(default)]
    pub status: CommunicationStatus,
    pub dg_office: Option<String>,
    pub ship_id: Option<String>,
    pub crew_id: Option<String>,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub response: Option<String>,
    pub response_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_by: String,
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCommunication {
    /// Generated when absent
    #[serde(default)]
    pub ref_no: Option<String>,
    pub comm_type: CommunicationType,
    pub subject: String,
    pub content: String,
    pub category: CommunicationCategory,
    #[serde(default)]
    pub status: CommunicationStatus,
    #[serde(default)]
    pub dg_office: Option<String>,
    #[serde(default)]
    pub ship_id: Option<String>,
    #[serde(default)]
    pub crew_id: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

fn default_priority() -> String {
    "normal".to_owned()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CommunicationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CommunicationCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CommunicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dg_office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommunicationStats {
    pub total: usize,
    pub pending: usize,
    pub action_required: usize,
    pub completed: usize,
    pub incoming: usize,
    pub outgoing: usize,
}
