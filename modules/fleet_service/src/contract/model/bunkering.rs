use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Vlsfo,
    Hfo,
    Mgo,
    Lsmgo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BunkeringStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Fuel bunkering operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bunkering {
    pub id: String,
    pub ship_id: String,
    pub port: String,
    pub supplier: String,
    pub fuel_type: FuelType,
    /// Metric tonnes
    pub quantity: f64,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: BunkeringStatus,
    pub cost_per_mt: Option<f64>,
    pub total_cost: Option<f64>,
    pub officer_in_charge: Option<String>,
    #[serde(default)]
    pub checklist_completed: bool,
    #[serde(default)]
    pub sample_taken: bool,
    pub remarks: Option<String>,
    pub created_by: String,
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBunkering {
    pub ship_id: String,
    pub port: String,
    pub supplier: String,
    pub fuel_type: FuelType,
    pub quantity: f64,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub cost_per_mt: Option<f64>,
    #[serde(default)]
    pub officer_in_charge: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BunkeringUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BunkeringStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_mt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer_in_charge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
