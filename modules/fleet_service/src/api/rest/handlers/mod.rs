//! HTTP request handlers - thin layer that delegates to the domain services
//!
//! Every handler takes the authenticated [`Caller`](crate::contract::Caller)
//! and the shared [`FleetServices`](crate::domain::FleetServices); role and
//! ship checks happen inside the services.

use super::error::Problem;

pub mod bunkering;
pub mod cargo;
pub mod clients;
pub mod communications;
pub mod documents;
pub mod invoices;
pub mod pms;
pub mod recruitment;
pub mod ships;
pub mod users;
pub mod work_logs;

pub type ApiResult<T> = Result<T, Problem>;
