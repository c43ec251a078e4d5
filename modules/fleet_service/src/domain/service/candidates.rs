use super::{apply, fetch, remove, Directory};
use crate::contract::{
    initials_of, Caller, Candidate, CandidateSource, CandidateStage, CandidateUpdate, FleetError,
    NewCandidate,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_text, validate_email};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Candidate {
    const COLLECTION: &'static str = "candidates";
    const DERIVED: &'static [&'static str] = &["vessel_name"];
}

#[derive(Debug, Default, Serialize)]
struct CandidatePatch {
    #[serde(flatten)]
    update: CandidateUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    initials: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub vessel_id: Option<String>,
    pub stage: Option<CandidateStage>,
    pub source: Option<CandidateSource>,
}

pub struct CandidatesService {
    candidates: Collection<Candidate>,
    directory: Directory,
}

impl CandidatesService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            candidates: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut candidate: Candidate) -> Result<Candidate, FleetError> {
        candidate.vessel_name = self.directory.ship_name(candidate.vessel_id.as_deref()).await?;
        Ok(candidate)
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<Candidate, FleetError> {
        caller.require_staff_or_master()?;
        let candidate = fetch(&self.candidates, "Candidate", id).await?;
        ensure_ship_access(caller, candidate.vessel_id.as_deref())?;
        Ok(candidate)
    }

    async fn ensure_vessel(&self, caller: &Caller, vessel_id: Option<&str>) -> Result<(), FleetError> {
        match vessel_id {
            Some(vessel_id) => {
                ensure_ship_access(caller, Some(vessel_id))?;
                self.directory.require_ship(vessel_id).await?;
                Ok(())
            }
            None => ensure_ship_access(caller, None),
        }
    }

    #[instrument(skip(self, caller, new_candidate), fields(rank = %new_candidate.rank))]
    pub async fn create(&self, caller: &Caller, new_candidate: NewCandidate) -> Result<Candidate, FleetError> {
        caller.require_staff_or_master()?;
        require_text("name", &new_candidate.name)?;
        require_text("rank", &new_candidate.rank)?;
        validate_email(&new_candidate.email)?;
        self.ensure_vessel(caller, new_candidate.vessel_id.as_deref()).await?;

        let now = Utc::now();
        let candidate = Candidate {
            id: String::new(),
            initials: initials_of(&new_candidate.name),
            name: new_candidate.name,
            email: new_candidate.email,
            phone: new_candidate.phone,
            rank: new_candidate.rank,
            experience: new_candidate.experience,
            vessel_id: new_candidate.vessel_id,
            source: new_candidate.source,
            stage: new_candidate.stage,
            notes: new_candidate.notes,
            vessel_name: None,
            created_at: now,
            updated_at: now,
        };
        let candidate = self
            .candidates
            .insert(&candidate)
            .await
            .map_err(FleetError::internal)?;
        info!(candidate_id = %candidate.id, "candidate created");
        self.present(candidate).await
    }

    pub async fn list(&self, caller: &Caller, filter: CandidateFilter) -> Result<Vec<Candidate>, FleetError> {
        caller.require_staff_or_master()?;
        let scope = ShipScope::resolve(caller, filter.vessel_id.as_deref());
        let mut filters = Vec::new();
        if let Some(stage) = filter.stage {
            filters.push(FieldFilter::eq("stage", stage));
        }
        if let Some(source) = filter.source {
            filters.push(FieldFilter::eq("source", source));
        }
        let mut candidates = self
            .candidates
            .find_scoped(&scope, "vessel_id", filters)
            .await
            .map_err(FleetError::internal)?;
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut out = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            out.push(self.present(candidate).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Candidate, FleetError> {
        let candidate = self.fetch_accessible(caller, id).await?;
        self.present(candidate).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: CandidateUpdate) -> Result<Candidate, FleetError> {
        self.fetch_accessible(caller, id).await?;
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if update.vessel_id.is_some() {
            self.ensure_vessel(caller, update.vessel_id.as_deref()).await?;
        }
        let initials = match &update.name {
            Some(name) => {
                require_text("name", name)?;
                Some(initials_of(name))
            }
            None => None,
        };
        let patch = CandidatePatch { update, initials };
        let candidate = apply(&self.candidates, "Candidate", id, &patch).await?;
        info!(candidate_id = %id, "candidate updated");
        self.present(candidate).await
    }

    /// Move a candidate along the recruitment pipeline
    #[instrument(skip(self, caller))]
    pub async fn set_stage(&self, caller: &Caller, id: &str, stage: CandidateStage) -> Result<Candidate, FleetError> {
        self.fetch_accessible(caller, id).await?;
        let patch = CandidatePatch {
            update: CandidateUpdate {
                stage: Some(stage),
                ..Default::default()
            },
            initials: None,
        };
        let candidate = apply(&self.candidates, "Candidate", id, &patch).await?;
        info!(candidate_id = %id, stage = ?stage, "candidate stage changed");
        self.present(candidate).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.candidates, "Candidate", id).await?;
        info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }
}
