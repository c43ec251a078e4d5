//! Domain layer - business logic and services

pub mod auth;
pub mod repository;
pub mod scope;
pub mod service;
pub mod validation;

pub use auth::{AuthGate, IdentityError, IdentityProvider};
pub use repository::{Collection, Document, DocumentStore, FieldFilter, Record};
pub use scope::ShipScope;
pub use service::{FleetServices, ServiceConfig};
