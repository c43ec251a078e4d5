use super::{apply, fetch, remove, Directory};
use crate::contract::{Caller, FleetError, NewUser, User, UserUpdate};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_text, validate_email};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

impl Record for User {
    const COLLECTION: &'static str = "users";
    const DERIVED: &'static [&'static str] = &["ship_name"];
}

pub struct UsersService {
    users: Collection<User>,
    directory: Directory,
}

impl UsersService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory) -> Self {
        Self {
            users: Collection::new(store),
            directory,
        }
    }

    async fn present(&self, mut user: User) -> Result<User, FleetError> {
        user.ship_name = self.directory.ship_name(user.ship_id.as_deref()).await?;
        Ok(user)
    }

    async fn present_all(&self, users: Vec<User>) -> Result<Vec<User>, FleetError> {
        let mut out = Vec::with_capacity(users.len());
        for user in users {
            out.push(self.present(user).await?);
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn ensure_email_free(&self, email: &str, except: Option<&str>) -> Result<(), FleetError> {
        let taken = self
            .users
            .find(&[FieldFilter::eq("email", email)])
            .await
            .map_err(FleetError::internal)?
            .into_iter()
            .any(|u| Some(u.id.as_str()) != except);
        if taken {
            return Err(FleetError::validation(format!(
                "Email '{email}' is already registered"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, caller, new_user), fields(email = %new_user.email))]
    pub async fn create(&self, caller: &Caller, new_user: NewUser) -> Result<User, FleetError> {
        caller.require_master()?;
        require_text("name", &new_user.name)?;
        validate_email(&new_user.email)?;
        self.ensure_email_free(&new_user.email, None).await?;
        if let Some(ship_id) = &new_user.ship_id {
            self.directory.require_ship(ship_id).await?;
        }

        let now = Utc::now();
        let user = User {
            id: String::new(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            ship_id: new_user.ship_id,
            phone: new_user.phone,
            position: new_user.position,
            active: new_user.active,
            firebase_uid: new_user.firebase_uid,
            ship_name: None,
            created_at: now,
            updated_at: now,
        };
        let user = self.users.insert(&user).await.map_err(FleetError::internal)?;
        info!(user_id = %user.id, role = ?user.role, "user created");
        self.present(user).await
    }

    /// The caller's own profile
    pub async fn me(&self, caller: &Caller) -> Result<User, FleetError> {
        let user = fetch(&self.users, "User", &caller.user_id).await?;
        self.present(user).await
    }

    /// MASTER sees everyone; STAFF only users on their own ship
    pub async fn list(&self, caller: &Caller) -> Result<Vec<User>, FleetError> {
        caller.require_staff_or_master()?;
        let scope = ShipScope::resolve(caller, None);
        let users = self
            .users
            .find_scoped(&scope, "ship_id", Vec::new())
            .await
            .map_err(FleetError::internal)?;
        debug!(count = users.len(), "listed users");
        self.present_all(users).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<User, FleetError> {
        caller.require_staff_or_master()?;
        let user = fetch(&self.users, "User", id).await?;
        self.present(user).await
    }

    pub async fn list_by_ship(&self, caller: &Caller, ship_id: &str) -> Result<Vec<User>, FleetError> {
        caller.require_staff_or_master()?;
        ensure_ship_access(caller, Some(ship_id))?;
        let users = self
            .users
            .find(&[FieldFilter::eq("ship_id", ship_id)])
            .await
            .map_err(FleetError::internal)?;
        self.present_all(users).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: UserUpdate) -> Result<User, FleetError> {
        caller.require_master()?;
        fetch(&self.users, "User", id).await?;
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
            self.ensure_email_free(email, Some(id)).await?;
        }
        if let Some(ship_id) = &update.ship_id {
            self.directory.require_ship(ship_id).await?;
        }
        let user = apply(&self.users, "User", id, &update).await?;
        info!(user_id = %id, "user updated");
        self.present(user).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.users, "User", id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
