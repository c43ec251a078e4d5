use super::{apply, fetch, Directory};
use crate::contract::{Caller, Cargo, CargoStatus, CargoUpdate, FleetError, NewCargo};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_non_negative, require_text};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Cargo {
    const COLLECTION: &'static str = "cargo_operations";
    const DERIVED: &'static [&'static str] = &["ship_name"];
}

#[derive(Debug, Clone, Default)]
pub struct CargoFilter {
    pub ship_id: Option<String>,
    pub status: Option<CargoStatus>,
}

/// Completion date to store: the caller's, else now when the operation completes
fn completion_date(update: &CargoUpdate, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match (update.completed_date, update.status) {
        (Some(date), _) => Some(date),
        (None, Some(CargoStatus::Completed)) => Some(now),
        _ => None,
    }
}

pub struct CargoService {
    operations: Collection<Cargo>,
    directory: Directory,
}

impl CargoService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            operations: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut operation: Cargo) -> Result<Cargo, FleetError> {
        operation.ship_name = self.directory.ship_name(Some(&operation.ship_id)).await?;
        Ok(operation)
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<Cargo, FleetError> {
        let operation = fetch(&self.operations, "Cargo operation", id).await?;
        ensure_ship_access(caller, Some(&operation.ship_id))?;
        Ok(operation)
    }

    #[instrument(skip(self, caller, new_op), fields(ship_id = %new_op.ship_id))]
    pub async fn create(&self, caller: &Caller, new_op: NewCargo) -> Result<Cargo, FleetError> {
        caller.require_staff_or_master()?;
        require_text("cargo_name", &new_op.cargo_name)?;
        require_text("port", &new_op.port)?;
        require_text("unit", &new_op.unit)?;
        require_non_negative("quantity", new_op.quantity)?;
        ensure_ship_access(caller, Some(&new_op.ship_id))?;
        self.directory.require_ship(&new_op.ship_id).await?;

        let now = Utc::now();
        let operation = Cargo {
            id: String::new(),
            ship_id: new_op.ship_id,
            cargo_type: new_op.cargo_type,
            cargo_name: new_op.cargo_name,
            quantity: new_op.quantity,
            actual_quantity: None,
            unit: new_op.unit,
            port: new_op.port,
            status: CargoStatus::Planned,
            scheduled_date: new_op.scheduled_date,
            completed_date: None,
            notes: new_op.notes,
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
        info!(operation_id = %operation.id, cargo = %operation.cargo_name, "cargo operation created");
        self.present(operation).await
    }

    /// Newest scheduled first
    pub async fn list(&self, caller: &Caller, filter: CargoFilter) -> Result<Vec<Cargo>, FleetError> {
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

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Cargo, FleetError> {
        let operation = self.fetch_accessible(caller, id).await?;
        self.present(operation).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, mut update: CargoUpdate) -> Result<Cargo, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        if let Some(actual) = update.actual_quantity {
            require_non_negative("actual_quantity", actual)?;
        }

        update.completed_date = completion_date(&update, Utc::now());
        let operation = apply(&self.operations, "Cargo operation", id, &update).await?;
        info!(operation_id = %id, status = ?operation.status, "cargo operation updated");
        self.present(operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn completion_is_stamped_only_when_completing() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let given = Utc.with_ymd_and_hms(2025, 2, 28, 18, 30, 0).unwrap();

        let completing = CargoUpdate {
            status: Some(CargoStatus::Completed),
            ..Default::default()
        };
        assert_eq!(completion_date(&completing, now), Some(now));

        let backdated = CargoUpdate {
            completed_date: Some(given),
            ..completing
        };
        assert_eq!(completion_date(&backdated, now), Some(given));

        let started = CargoUpdate {
            status: Some(CargoStatus::InProgress),
            ..Default::default()
        };
        assert_eq!(completion_date(&started, now), None);
    }
}
