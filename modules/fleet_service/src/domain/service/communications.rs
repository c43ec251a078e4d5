use super::{apply, fetch, remove, Directory};
use crate::contract::{
    Caller, Communication, CommunicationCategory, CommunicationStats, CommunicationStatus,
    CommunicationType, CommunicationUpdate, FleetError, NewCommunication,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::require_text;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Communication {
    const COLLECTION: &'static str = "dg_communications";
    const DERIVED: &'static [&'static str] = &["ship_name"];
}

#[derive(Debug, Default, Serialize)]
struct ResponsePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CommunicationStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct CommunicationFilter {
    pub ship_id: Option<String>,
    pub comm_type: Option<CommunicationType>,
    pub status: Option<CommunicationStatus>,
    pub category: Option<CommunicationCategory>,
}

pub struct CommunicationsService {
    communications: Collection<Communication>,
    directory: Directory,
    ref_prefix: String,
}

impl CommunicationsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory, ref_prefix: String) -> Self {
        Self {
            communications: Collection::new(store),
            directory,
            ref_prefix,
        }
    }

    async fn present(&self, mut comm: Communication) -> Result<Communication, FleetError> {
        comm.ship_name = self.directory.ship_name(comm.ship_id.as_deref()).await?;
        Ok(comm)
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<Communication, FleetError> {
        let comm = fetch(&self.communications, "Communication", id).await?;
        ensure_ship_access(caller, comm.ship_id.as_deref())?;
        Ok(comm)
    }

    /// `<prefix>-IN-YYYY-NNN` or `<prefix>-OUT-YYYY-NNN`, numbered per direction
    async fn next_ref(&self, comm_type: CommunicationType, now: DateTime<Utc>) -> Result<String, FleetError> {
        let existing = self
            .communications
            .find(&[FieldFilter::eq("comm_type", comm_type)])
            .await
            .map_err(FleetError::internal)?
            .len();
        let direction = match comm_type {
            CommunicationType::Incoming => "IN",
            CommunicationType::Outgoing => "OUT",
        };
        Ok(format!(
            "{}-{}-{}-{:03}",
            self.ref_prefix,
            direction,
            now.year(),
            existing + 1
        ))
    }

    #[instrument(skip(self, caller, new_comm), fields(subject = %new_comm.subject))]
    pub async fn create(&self, caller: &Caller, new_comm: NewCommunication) -> Result<Communication, FleetError> {
        caller.require_staff_or_master()?;
        require_text("subject", &new_comm.subject)?;
        require_text("content", &new_comm.content)?;
        if let Some(ship_id) = &new_comm.ship_id {
            ensure_ship_access(caller, Some(ship_id))?;
            self.directory.require_ship(ship_id).await?;
        }

        let now = Utc::now();
        let ref_no = match new_comm.ref_no {
            Some(ref_no) if !ref_no.trim().is_empty() => ref_no,
            _ => self.next_ref(new_comm.comm_type, now).await?,
        };
        let comm = Communication {
            id: String::new(),
            ref_no,
            comm_type: new_comm.comm_type,
            subject: new_comm.subject,
            content: new_comm.content,
            category: new_comm.category,
            status: new_comm.status,
            dg_office: new_comm.dg_office,
            ship_id: new_comm.ship_id,
            crew_id: new_comm.crew_id,
            priority: new_comm.priority,
            due_date: new_comm.due_date,
            response: None,
            response_date: None,
            attachments: new_comm.attachments,
            created_by: caller.user_id.clone(),
            created_by_name: Some(caller.name.clone()),
            ship_name: None,
            created_at: now,
            updated_at: now,
        };
        let comm = self
            .communications
            .insert(&comm)
            .await
            .map_err(FleetError::internal)?;
        info!(comm_id = %comm.id, ref_no = %comm.ref_no, "communication created");
        self.present(comm).await
    }

    pub async fn list(&self, caller: &Caller, filter: CommunicationFilter) -> Result<Vec<Communication>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.ship_id.as_deref());
        let mut filters = Vec::new();
        if let Some(comm_type) = filter.comm_type {
            filters.push(FieldFilter::eq("comm_type", comm_type));
        }
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        if let Some(category) = filter.category {
            filters.push(FieldFilter::eq("category", category));
        }
        let mut comms = self
            .communications
            .find_scoped(&scope, "ship_id", filters)
            .await
            .map_err(FleetError::internal)?;
        comms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut out = Vec::with_capacity(comms.len());
        for comm in comms {
            out.push(self.present(comm).await?);
        }
        Ok(out)
    }

    pub async fn stats(&self, caller: &Caller, ship_id: Option<&str>) -> Result<CommunicationStats, FleetError> {
        let scope = ShipScope::resolve(caller, ship_id);
        let comms = self
            .communications
            .find_scoped(&scope, "ship_id", Vec::new())
            .await
            .map_err(FleetError::internal)?;

        let mut stats = CommunicationStats {
            total: comms.len(),
            ..Default::default()
        };
        for comm in &comms {
            match comm.status {
                CommunicationStatus::Pending => stats.pending += 1,
                CommunicationStatus::ActionRequired => stats.action_required += 1,
                CommunicationStatus::Completed => stats.completed += 1,
                CommunicationStatus::InProgress | CommunicationStatus::Archived => {}
            }
            match comm.comm_type {
                CommunicationType::Incoming => stats.incoming += 1,
                CommunicationType::Outgoing => stats.outgoing += 1,
            }
        }
        Ok(stats)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Communication, FleetError> {
        let comm = self.fetch_accessible(caller, id).await?;
        self.present(comm).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        update: CommunicationUpdate,
    ) -> Result<Communication, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        let comm = apply(&self.communications, "Communication", id, &update).await?;
        info!(comm_id = %id, "communication updated");
        self.present(comm).await
    }

    /// Record the reply, optionally closing the communication
    #[instrument(skip(self, caller, response))]
    pub async fn respond(
        &self,
        caller: &Caller,
        id: &str,
        response: String,
        mark_completed: bool,
    ) -> Result<Communication, FleetError> {
        caller.require_staff_or_master()?;
        require_text("response", &response)?;
        self.fetch_accessible(caller, id).await?;
        let patch = ResponsePatch {
            response: Some(response),
            response_date: Some(Utc::now()),
            status: mark_completed.then_some(CommunicationStatus::Completed),
        };
        let comm = apply(&self.communications, "Communication", id, &patch).await?;
        info!(comm_id = %id, completed = mark_completed, "communication answered");
        self.present(comm).await
    }

    #[instrument(skip(self, caller))]
    pub async fn complete(&self, caller: &Caller, id: &str) -> Result<Communication, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        let patch = ResponsePatch {
            status: Some(CommunicationStatus::Completed),
            ..Default::default()
        };
        let comm = apply(&self.communications, "Communication", id, &patch).await?;
        info!(comm_id = %id, "communication completed");
        self.present(comm).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.communications, "Communication", id).await?;
        info!(comm_id = %id, "communication deleted");
        Ok(())
    }
}
