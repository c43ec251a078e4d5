use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CandidateSource {
    Website,
    Agent,
    Referral,
    Direct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStage {
    #[default]
    Applied,
    Shortlisted1,
    Shortlisted2,
    Final,
    Prejoining,
    Accepted,
    Rejected,
}

/// Recruitment pipeline candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub rank: String,
    pub experience: Option<String>,
    pub vessel_id: Option<String>,
    pub source: CandidateSource,
    #[serde(default)]
    pub stage: CandidateStage,
    pub notes: Option<String>,
    pub initials: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub rank: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub vessel_id: Option<String>,
    pub source: CandidateSource,
    #[serde(default)]
    pub stage: CandidateStage,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CandidateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CandidateSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<CandidateStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Upper-cased first letters of the first two words of `name`
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
