//! Authenticated caller identity and role checks

use super::error::FleetError;
use super::model::{Role, User};
use serde::Serialize;

/// The application user behind a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub ship_id: Option<String>,
}

impl Caller {
    pub fn is_master(&self) -> bool {
        self.role == Role::Master
    }

    pub fn is_crew(&self) -> bool {
        self.role == Role::Crew
    }

    /// Any authenticated user passes.
    pub fn require_any(&self) -> Result<(), FleetError> {
        Ok(())
    }

    pub fn require_staff_or_master(&self) -> Result<(), FleetError> {
        match self.role {
            Role::Staff | Role::Master => Ok(()),
            Role::Crew => Err(FleetError::forbidden("Staff or Master role required")),
        }
    }

    pub fn require_master(&self) -> Result<(), FleetError> {
        match self.role {
            Role::Master => Ok(()),
            _ => Err(FleetError::forbidden("Master role required")),
        }
    }

    /// Whether the caller is assigned to `ship_id`
    pub fn is_on_ship(&self, ship_id: &str) -> bool {
        self.ship_id.as_deref() == Some(ship_id)
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            ship_id: user.ship_id.clone(),
        }
    }
}
