use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CargoType {
    #[default]
    Loading,
    Unloading,
    Transfer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CargoStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

/// Cargo loading, discharge or transfer at a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cargo {
    pub id: String,
    pub ship_id: String,
    #[serde(default)]
    pub cargo_type: CargoType,
    pub cargo_name: String,
    /// Planned quantity in `unit`
    pub quantity: f64,
    pub actual_quantity: Option<f64>,
    pub unit: String,
    pub port: String,
    #[serde(default)]
    pub status: CargoStatus,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_unit() -> String {
    "MT".to_owned()
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCargo {
    pub ship_id: String,
    #[serde(default)]
    pub cargo_type: CargoType,
    pub cargo_name: String,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub port: String,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CargoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CargoStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
