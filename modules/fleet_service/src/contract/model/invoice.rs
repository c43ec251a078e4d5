use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceCategory {
    Fuel,
    Maintenance,
    Provisions,
    PortFees,
    CrewWages,
    Insurance,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Paid,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: String,
    pub ship_id: String,
    #[schema(example = "INV-202501-0001")]
    pub invoice_number: String,
    pub vendor_name: String,
    pub category: InvoiceCategory,
    pub amount: f64,
    pub currency: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub remarks: Option<String>,
    pub created_by: String,
    pub created_by_name: Option<String>,
    pub approved_by: Option<String>,
    pub approval_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewInvoice {
    pub ship_id: String,
    /// Generated when absent
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub vendor_name: String,
    pub category: InvoiceCategory,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

fn default_currency() -> String {
    "USD".to_owned()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InvoiceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<InvoiceCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceStats {
    pub total_count: usize,
    pub total_amount: f64,
    /// Submitted and approved, not yet paid
    pub pending_amount: f64,
    pub paid_amount: f64,
    pub draft: usize,
    pub submitted: usize,
    pub approved: usize,
    pub paid: usize,
    pub rejected: usize,
}
