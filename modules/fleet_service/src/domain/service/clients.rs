use super::{apply, fetch, remove};
use crate::contract::{
    Caller, Client, ClientStats, ClientStatus, ClientUpdate, FleetError, NewClient, Ship,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::validation::{require_text, validate_email};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Client {
    const COLLECTION: &'static str = "clients";
    const DERIVED: &'static [&'static str] = &["vessels_count"];
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub country: Option<String>,
}

pub struct ClientsService {
    clients: Collection<Client>,
    ships: Collection<Ship>,
}

impl ClientsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            clients: Collection::new(store.clone()),
            ships: Collection::new(store),
        }
    }

    async fn present(&self, mut client: Client) -> Result<Client, FleetError> {
        client.vessels_count = self
            .ships
            .find(&[FieldFilter::eq("client_id", &client.id)])
            .await
            .map_err(FleetError::internal)?
            .len();
        Ok(client)
    }

    #[instrument(skip(self, caller, new_client), fields(company = %new_client.company))]
    pub async fn create(&self, caller: &Caller, new_client: NewClient) -> Result<Client, FleetError> {
        caller.require_staff_or_master()?;
        require_text("name", &new_client.name)?;
        require_text("company", &new_client.company)?;
        if let Some(email) = &new_client.email {
            validate_email(email)?;
        }

        let now = Utc::now();
        let client = Client {
            id: String::new(),
            name: new_client.name,
            company: new_client.company,
            contact_person: new_client.contact_person,
            email: new_client.email,
            phone: new_client.phone,
            address: new_client.address,
            country: new_client.country,
            contract_start: new_client.contract_start,
            contract_end: new_client.contract_end,
            status: new_client.status,
            notes: new_client.notes,
            created_by: caller.user_id.clone(),
            vessels_count: 0,
            created_at: now,
            updated_at: now,
        };
        let client = self.clients.insert(&client).await.map_err(FleetError::internal)?;
        info!(client_id = %client.id, "client created");
        Ok(client)
    }

    pub async fn list(&self, caller: &Caller, filter: ClientFilter) -> Result<Vec<Client>, FleetError> {
        caller.require_any()?;
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        if let Some(country) = filter.country {
            filters.push(FieldFilter::eq("country", country));
        }
        let mut clients = self.clients.find(&filters).await.map_err(FleetError::internal)?;
        clients.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = Vec::with_capacity(clients.len());
        for client in clients {
            out.push(self.present(client).await?);
        }
        Ok(out)
    }

    pub async fn stats(&self, caller: &Caller) -> Result<ClientStats, FleetError> {
        caller.require_any()?;
        let clients = self.clients.all().await.map_err(FleetError::internal)?;
        let active = clients
            .iter()
            .filter(|c| c.status == ClientStatus::Active)
            .count();
        Ok(ClientStats {
            total: clients.len(),
            active,
            inactive: clients.len() - active,
        })
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Client, FleetError> {
        caller.require_any()?;
        let client = fetch(&self.clients, "Client", id).await?;
        self.present(client).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: ClientUpdate) -> Result<Client, FleetError> {
        caller.require_staff_or_master()?;
        fetch(&self.clients, "Client", id).await?;
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        let client = apply(&self.clients, "Client", id, &update).await?;
        info!(client_id = %id, "client updated");
        self.present(client).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.clients, "Client", id).await?;
        info!(client_id = %id, "client deleted");
        Ok(())
    }
}
