//! Ship-based visibility rules shared by every list and point operation

use crate::contract::{Caller, FleetError, Role};

/// Effective ship restriction for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipScope {
    /// No restriction
    All,
    /// Only entities on this ship
    Ship(String),
    /// Nothing is visible
    Nothing,
}

impl ShipScope {
    /// Resolve the scope for `caller`, given the ship filter they asked for.
    ///
    /// MASTER keeps the requested filter. STAFF and CREW are pinned to their
    /// own ship whatever they asked for, and see nothing without one.
    pub fn resolve(caller: &Caller, requested: Option<&str>) -> Self {
        match caller.role {
            Role::Master => match requested {
                Some(ship_id) => Self::Ship(ship_id.to_owned()),
                None => Self::All,
            },
            Role::Staff | Role::Crew => match &caller.ship_id {
                Some(ship_id) => Self::Ship(ship_id.clone()),
                None => Self::Nothing,
            },
        }
    }

    pub fn allows(&self, ship_id: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Ship(own) => ship_id == Some(own.as_str()),
            Self::Nothing => false,
        }
    }
}

/// Point-operation check: MASTER passes, everyone else must share the ship
pub fn ensure_ship_access(caller: &Caller, ship_id: Option<&str>) -> Result<(), FleetError> {
    if caller.is_master() {
        return Ok(());
    }
    match ship_id {
        Some(ship_id) if caller.is_on_ship(ship_id) => Ok(()),
        _ => Err(FleetError::forbidden("Access denied: not assigned to this vessel")),
    }
}
