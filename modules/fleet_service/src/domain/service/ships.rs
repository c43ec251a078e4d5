use super::{apply, fetch, remove};
use crate::contract::{Caller, Client, FleetError, NewShip, Ship, ShipUpdate, User};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::validation::require_text;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Ship {
    const COLLECTION: &'static str = "ships";
    const DERIVED: &'static [&'static str] = &["crew_count"];
}

pub struct ShipsService {
    ships: Collection<Ship>,
    users: Collection<User>,
    clients: Collection<Client>,
}

impl ShipsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ships: Collection::new(store.clone()),
            users: Collection::new(store.clone()),
            clients: Collection::new(store),
        }
    }

    async fn present(&self, mut ship: Ship) -> Result<Ship, FleetError> {
        ship.crew_count = self
            .users
            .find(&[FieldFilter::eq("ship_id", &ship.id)])
            .await
            .map_err(FleetError::internal)?
            .len();
        Ok(ship)
    }

    async fn ensure_client(&self, client_id: Option<&str>) -> Result<(), FleetError> {
        if let Some(client_id) = client_id {
            fetch(&self.clients, "Client", client_id).await?;
        }
        Ok(())
    }

    #[instrument(skip(self, caller, new_ship), fields(name = %new_ship.name))]
    pub async fn create(&self, caller: &Caller, new_ship: NewShip) -> Result<Ship, FleetError> {
        caller.require_master()?;
        require_text("name", &new_ship.name)?;
        require_text("imo_number", &new_ship.imo_number)?;
        self.ensure_client(new_ship.client_id.as_deref()).await?;

        let now = Utc::now();
        let ship = Ship {
            id: String::new(),
            name: new_ship.name,
            ship_type: new_ship.ship_type,
            imo_number: new_ship.imo_number,
            flag_state: new_ship.flag_state,
            call_sign: new_ship.call_sign,
            gross_tonnage: new_ship.gross_tonnage,
            built_year: new_ship.built_year,
            status: new_ship.status,
            owner: new_ship.owner,
            operator: new_ship.operator,
            client_id: new_ship.client_id,
            crew_count: 0,
            created_at: now,
            updated_at: now,
        };
        let ship = self.ships.insert(&ship).await.map_err(FleetError::internal)?;
        info!(ship_id = %ship.id, "ship created");
        Ok(ship)
    }

    /// CREW see only their own ship; everyone else sees the fleet
    pub async fn list(&self, caller: &Caller) -> Result<Vec<Ship>, FleetError> {
        let ships = if caller.is_crew() {
            match &caller.ship_id {
                Some(ship_id) => self
                    .ships
                    .get(ship_id)
                    .await
                    .map_err(FleetError::internal)?
                    .into_iter()
                    .collect(),
                None => Vec::new(),
            }
        } else {
            self.ships.all().await.map_err(FleetError::internal)?
        };

        let mut out = Vec::with_capacity(ships.len());
        for ship in ships {
            out.push(self.present(ship).await?);
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Ship, FleetError> {
        if caller.is_crew() && !caller.is_on_ship(id) {
            return Err(FleetError::forbidden("Access denied: not assigned to this vessel"));
        }
        let ship = fetch(&self.ships, "Ship", id).await?;
        self.present(ship).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: ShipUpdate) -> Result<Ship, FleetError> {
        caller.require_master()?;
        fetch(&self.ships, "Ship", id).await?;
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        self.ensure_client(update.client_id.as_deref()).await?;
        let ship = apply(&self.ships, "Ship", id, &update).await?;
        info!(ship_id = %id, "ship updated");
        self.present(ship).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.ships, "Ship", id).await?;
        info!(ship_id = %id, "ship deleted");
        Ok(())
    }
}
