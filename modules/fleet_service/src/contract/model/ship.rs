use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShipType {
    BulkCarrier,
    OilTanker,
    ContainerShip,
    ChemicalTanker,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShipStatus {
    #[default]
    Active,
    Maintenance,
    Docked,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ship {
    pub id: String,
    #[schema(example = "MV Test")]
    pub name: String,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    pub imo_number: String,
    pub flag_state: String,
    pub call_sign: Option<String>,
    pub gross_tonnage: Option<f64>,
    pub built_year: Option<i32>,
    #[serde(default)]
    pub status: ShipStatus,
    pub owner: Option<String>,
    pub operator: Option<String>,
    pub client_id: Option<String>,
    /// Users currently assigned to this ship, computed at read time
    #[serde(default)]
    pub crew_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewShip {
    pub name: String,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    pub imo_number: String,
    pub flag_state: String,
    #[serde(default)]
    pub call_sign: Option<String>,
    #[serde(default)]
    pub gross_tonnage: Option<f64>,
    #[serde(default)]
    pub built_year: Option<i32>,
    #[serde(default)]
    pub status: ShipStatus,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ShipUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imo_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_tonnage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ShipStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}
