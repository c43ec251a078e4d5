//! Domain service layer - one service per entity kind.
//!
//! Services own all business rules: role checks beyond the coarse ones done
//! by the REST extractors, ship scoping, referential checks and read-time
//! denormalization. Handlers only translate HTTP to service calls.
//!
//! Every list goes through [`ShipScope`](crate::domain::scope::ShipScope) and
//! every point access to ship-bound data through
//! [`ensure_ship_access`](crate::domain::scope::ensure_ship_access).

use crate::contract::{FleetError, Ship, User};
use crate::domain::repository::{Collection, DocumentStore, Record};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod bunkering;
mod candidates;
mod cargo;
mod clients;
mod communications;
mod documents;
mod fanout;
mod invoices;
mod ships;
mod submissions;
mod tasks;
mod users;
mod work_logs;

pub use bunkering::{BunkeringFilter, BunkeringService};
pub use candidates::{CandidateFilter, CandidatesService};
pub use cargo::{CargoFilter, CargoService};
pub use clients::{ClientFilter, ClientsService};
pub use communications::{CommunicationFilter, CommunicationsService};
pub use documents::DocumentsService;
pub use fanout::FanoutService;
pub use invoices::{InvoiceFilter, InvoicesService};
pub use ships::ShipsService;
pub use submissions::{SubmissionFilter, SubmissionsService};
pub use tasks::{TaskFilter, TasksService};
pub use users::UsersService;
pub use work_logs::{WorkLogFilter, WorkLogsService};

/// Tunables of the domain services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Prefix of generated invoice numbers
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,

    /// Prefix of generated communication reference numbers
    #[serde(default = "default_communication_prefix")]
    pub communication_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: default_invoice_prefix(),
            communication_prefix: default_communication_prefix(),
        }
    }
}

fn default_invoice_prefix() -> String {
    "INV".to_owned()
}

fn default_communication_prefix() -> String {
    "DGS".to_owned()
}

/// Ship and user lookups used for referential checks and denormalization
#[derive(Clone)]
pub(crate) struct Directory {
    ships: Collection<Ship>,
    users: Collection<User>,
}

impl Directory {
    fn new(store: &Arc<dyn DocumentStore>) -> Self {
        Self {
            ships: Collection::new(store.clone()),
            users: Collection::new(store.clone()),
        }
    }

    pub(crate) async fn ship(&self, ship_id: &str) -> Result<Option<Ship>, FleetError> {
        self.ships.get(ship_id).await.map_err(FleetError::internal)
    }

    /// The ship, or NotFound
    pub(crate) async fn require_ship(&self, ship_id: &str) -> Result<Ship, FleetError> {
        self.ship(ship_id)
            .await?
            .ok_or_else(|| FleetError::not_found("Ship", ship_id))
    }

    pub(crate) async fn ship_name(&self, ship_id: Option<&str>) -> Result<Option<String>, FleetError> {
        match ship_id {
            Some(id) => Ok(self.ship(id).await?.map(|s| s.name)),
            None => Ok(None),
        }
    }

    pub(crate) async fn user(&self, user_id: &str) -> Result<Option<User>, FleetError> {
        self.users.get(user_id).await.map_err(FleetError::internal)
    }

    pub(crate) async fn require_user(&self, user_id: &str) -> Result<User, FleetError> {
        self.user(user_id)
            .await?
            .ok_or_else(|| FleetError::not_found("User", user_id))
    }

    pub(crate) async fn user_name(&self, user_id: Option<&str>) -> Result<Option<String>, FleetError> {
        match user_id {
            Some(id) => Ok(self.user(id).await?.map(|u| u.name)),
            None => Ok(None),
        }
    }
}

/// Fetch a record or fail with NotFound(`resource`)
pub(crate) async fn fetch<T: Record>(
    collection: &Collection<T>,
    resource: &str,
    id: &str,
) -> Result<T, FleetError> {
    collection
        .get(id)
        .await
        .map_err(FleetError::internal)?
        .ok_or_else(|| FleetError::not_found(resource, id))
}

/// Apply a patch and return the stored result, NotFound if it vanished meanwhile
pub(crate) async fn apply<T: Record, P: serde::Serialize>(
    collection: &Collection<T>,
    resource: &str,
    id: &str,
    patch: &P,
) -> Result<T, FleetError> {
    collection
        .patch(id, patch)
        .await
        .map_err(FleetError::internal)?
        .ok_or_else(|| FleetError::not_found(resource, id))
}

/// Delete a record or fail with NotFound(`resource`)
pub(crate) async fn remove<T: Record>(
    collection: &Collection<T>,
    resource: &str,
    id: &str,
) -> Result<(), FleetError> {
    if collection.delete(id).await.map_err(FleetError::internal)? {
        Ok(())
    } else {
        Err(FleetError::not_found(resource, id))
    }
}

/// DI container: every service, built once over one store handle
#[derive(Clone)]
pub struct FleetServices {
    pub users: Arc<UsersService>,
    pub ships: Arc<ShipsService>,
    pub tasks: Arc<TasksService>,
    pub work_logs: Arc<WorkLogsService>,
    pub invoices: Arc<InvoicesService>,
    pub bunkering: Arc<BunkeringService>,
    pub cargo: Arc<CargoService>,
    pub candidates: Arc<CandidatesService>,
    pub communications: Arc<CommunicationsService>,
    pub clients: Arc<ClientsService>,
    pub documents: Arc<DocumentsService>,
    pub submissions: Arc<SubmissionsService>,
    pub fanout: Arc<FanoutService>,
}

impl FleetServices {
    pub fn new(store: Arc<dyn DocumentStore>, config: ServiceConfig) -> Self {
        let directory = Directory::new(&store);
        Self {
            users: Arc::new(UsersService::new(store.clone(), directory.clone())),
            ships: Arc::new(ShipsService::new(store.clone())),
            tasks: Arc::new(TasksService::new(store.clone(), directory.clone())),
            work_logs: Arc::new(WorkLogsService::new(store.clone(), directory.clone())),
            invoices: Arc::new(InvoicesService::new(
                store.clone(),
                directory.clone(),
                config.invoice_prefix.clone(),
            )),
            bunkering: Arc::new(BunkeringService::new(store.clone(), directory.clone())),
            cargo: Arc::new(CargoService::new(store.clone(), directory.clone())),
            candidates: Arc::new(CandidatesService::new(store.clone(), directory.clone())),
            communications: Arc::new(CommunicationsService::new(
                store.clone(),
                directory.clone(),
                config.communication_prefix.clone(),
            )),
            clients: Arc::new(ClientsService::new(store.clone())),
            documents: Arc::new(DocumentsService::new(store.clone())),
            submissions: Arc::new(SubmissionsService::new(store.clone())),
            fanout: Arc::new(FanoutService::new(store, directory)),
        }
    }
}
