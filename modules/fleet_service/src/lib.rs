//! Fleet Service Module
//!
//! Role-based fleet management back end: ships, crew, planned maintenance,
//! work logs, invoices, bunkering, cargo, recruitment, DG communications, clients,
//! and manual-derived form workflows. Every request is authenticated against
//! an identity provider and scoped to the caller's ship.

// Public exports
pub mod contract;
pub use contract::{Caller, FleetError};

pub mod module;
pub use module::FleetModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
