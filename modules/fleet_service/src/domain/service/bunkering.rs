use super::{apply, fetch, remove, Directory};
use crate::contract::{
    Bunkering, BunkeringStatus, BunkeringUpdate, Caller, FleetError, NewBunkering,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_non_negative, require_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Bunkering {
    const COLLECTION: &'static str = "bunkering";
    const DERIVED: &'static [&'static str] = &["ship_name"];
}

#[derive(Debug, Default, Serialize)]
struct BunkeringPatch {
    #[serde(flatten)]
    update: BunkeringUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checklist_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_taken: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BunkeringFilter {
    pub ship_id: Option<String>,
    pub status: Option<BunkeringStatus>,
}

fn total_cost(quantity: f64, cost_per_mt: Option<f64>) -> Option<f64> {
    cost_per_mt.map(|cost| quantity * cost)
}

pub struct BunkeringService {
    operations: Collection<Bunkering>,
    directory: Directory,
}

impl BunkeringService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            operations: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut operation: Bunkering) -> Result<Bunkering, FleetError> {
        operation.ship_name = self.directory.ship_name(Some(&operation.ship_id)).await?;
        Ok(operation)
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<Bunkering, FleetError> {
        let operation = fetch(&self.operations, "Bunkering operation", id).await?;
        ensure_ship_access(caller, Some(&operation.ship_id))?;
        Ok(operation)
    }

    #[instrument(skip(self, caller, new_op), fields(ship_id = %new_op.ship_id))]
    pub async fn create(&self, caller: &Caller, new_op: NewBunkering) -> Result<Bunkering, FleetError> {
        caller.require_staff_or_master()?;
        require_text("port", &new_op.port)?;
        require_text("supplier", &new_op.supplier)?;
        require_non_negative("quantity", new_op.quantity)?;
        if let Some(cost) = new_op.cost_per_mt {
            require_non_negative("cost_per_mt", cost)?;
        }
        ensure_ship_access(caller, Some(&new_op.ship_id))?;
        self.directory.require_ship(&new_op.ship_id).await?;

        let now = Utc::now();
        let operation = Bunkering {
            id: String::new(),
            ship_id: new_op.ship_id,
            port: new_op.port,
            supplier: new_op.supplier,
            fuel_type: new_op.fuel_type,
            quantity: new_op.quantity,
            scheduled_date: new_op.scheduled_date,
            completed_date: None,
            status: BunkeringStatus::Scheduled,
            cost_per_mt: new_op.cost_per_mt,
            total_cost: total_cost(new_op.quantity, new_op.cost_per_mt),
            officer_in_charge: new_op.officer_in_charge,
            checklist_completed: false,
            sample_taken: false,
            remarks: new_op.remarks,
            created_by: caller.user_id.clone(),
            created_by_name: Some(caller.name.clone()),
            ship_name: None,
            created_at: now,
            updated_at: now,
        };
        let operation = self
            .operations
            .insert(&operation)
            .await
            .map_err(FleetError::internal)?;
        info!(operation_id = %operation.id, "bunkering operation created");
        self.present(operation).await
    }

    pub async fn list(&self, caller: &Caller, filter: BunkeringFilter) -> Result<Vec<Bunkering>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.ship_id.as_deref());
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        let mut operations = self
            .operations
            .find_scoped(&scope, "ship_id", filters)
            .await
            .map_err(FleetError::internal)?;
        operations.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date));

        let mut out = Vec::with_capacity(operations.len());
        for operation in operations {
            out.push(self.present(operation).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Bunkering, FleetError> {
        let operation = self.fetch_accessible(caller, id).await?;
        self.present(operation).await
    }

    /// Recomputes the total cost and stamps completion when relevant
    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: BunkeringUpdate) -> Result<Bunkering, FleetError> {
        caller.require_staff_or_master()?;
        let current = self.fetch_accessible(caller, id).await?;
        if let Some(quantity) = update.quantity {
            require_non_negative("quantity", quantity)?;
        }
        if let Some(cost) = update.cost_per_mt {
            require_non_negative("cost_per_mt", cost)?;
        }

        let mut patch = BunkeringPatch::default();
        if update.quantity.is_some() || update.cost_per_mt.is_some() {
            patch.total_cost = total_cost(
                update.quantity.unwrap_or(current.quantity),
                update.cost_per_mt.or(current.cost_per_mt),
            );
        }
        if update.status == Some(BunkeringStatus::Completed) {
            patch.completed_date = Some(Utc::now());
        }
        patch.update = update;

        let operation = apply(&self.operations, "Bunkering operation", id, &patch).await?;
        info!(operation_id = %id, status = ?operation.status, "bunkering operation updated");
        self.present(operation).await
    }

    #[instrument(skip(self, caller))]
    pub async fn complete_checklist(&self, caller: &Caller, id: &str) -> Result<Bunkering, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        let patch = BunkeringPatch {
            checklist_completed: Some(true),
            ..Default::default()
        };
        let operation = apply(&self.operations, "Bunkering operation", id, &patch).await?;
        self.present(operation).await
    }

    #[instrument(skip(self, caller))]
    pub async fn mark_sample_taken(&self, caller: &Caller, id: &str) -> Result<Bunkering, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        let patch = BunkeringPatch {
            sample_taken: Some(true),
            ..Default::default()
        };
        let operation = apply(&self.operations, "Bunkering operation", id, &patch).await?;
        self.present(operation).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.operations, "Bunkering operation", id).await?;
        info!(operation_id = %id, "bunkering operation deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_cost_needs_unit_price() {
        assert_eq!(total_cost(500.0, Some(620.0)), Some(310_000.0));
        assert_eq!(total_cost(500.0, None), None);
    }
}
