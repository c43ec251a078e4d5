//! Conversions from REST DTOs to domain inputs

use super::dto::*;
use crate::contract::{AssigneeSelector, FleetError, TemplateSelector, WorkOrder};
use crate::domain::service::{
    BunkeringFilter, CandidateFilter, CargoFilter, ClientFilter, CommunicationFilter, InvoiceFilter,
    SubmissionFilter, TaskFilter, WorkLogFilter,
};

impl TryFrom<TriggerWorkRequest> for WorkOrder {
    type Error = FleetError;

    fn try_from(req: TriggerWorkRequest) -> Result<Self, Self::Error> {
        if req.vessel_id.trim().is_empty() {
            return Err(FleetError::validation("vessel_id is required"));
        }
        let templates = match (req.template_ids.is_empty(), req.category) {
            (false, _) => TemplateSelector::Ids(req.template_ids),
            (true, Some(category)) => TemplateSelector::Category(category),
            (true, None) => {
                return Err(FleetError::validation(
                    "either template_ids or category is required",
                ))
            }
        };
        let assignees = if !req.assigned_to.is_empty() {
            AssigneeSelector::Users(req.assigned_to)
        } else if req.assign_to_all_crew {
            AssigneeSelector::AllCrewOnVessel
        } else {
            AssigneeSelector::Unassigned
        };
        Ok(WorkOrder {
            vessel_id: req.vessel_id,
            templates,
            assignees,
            due_date: req.due_date,
        })
    }
}

impl From<TaskQuery> for TaskFilter {
    fn from(q: TaskQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            status: q.status,
            assigned_to: q.assigned_to,
        }
    }
}

impl From<WorkLogQuery> for WorkLogFilter {
    fn from(q: WorkLogQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            crew_id: q.crew_id,
            status: q.status,
        }
    }
}

impl From<InvoiceQuery> for InvoiceFilter {
    fn from(q: InvoiceQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            status: q.status,
        }
    }
}

impl From<BunkeringQuery> for BunkeringFilter {
    fn from(q: BunkeringQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            status: q.status,
        }
    }
}

impl From<CargoQuery> for CargoFilter {
    fn from(q: CargoQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            status: q.status,
        }
    }
}

impl From<CandidateQuery> for CandidateFilter {
    fn from(q: CandidateQuery) -> Self {
        Self {
            vessel_id: q.vessel_id,
            stage: q.stage,
            source: q.source,
        }
    }
}

impl From<CommunicationQuery> for CommunicationFilter {
    fn from(q: CommunicationQuery) -> Self {
        Self {
            ship_id: q.ship_id,
            comm_type: q.comm_type,
            status: q.status,
            category: q.category,
        }
    }
}

impl From<ClientQuery> for ClientFilter {
    fn from(q: ClientQuery) -> Self {
        Self {
            status: q.status,
            country: q.country,
        }
    }
}

impl From<SubmissionQuery> for SubmissionFilter {
    fn from(q: SubmissionQuery) -> Self {
        Self {
            vessel_id: q.vessel_id,
            status: q.status,
            template_id: q.template_id,
        }
    }
}
