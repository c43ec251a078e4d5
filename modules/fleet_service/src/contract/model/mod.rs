//! Contract models for the fleet service

mod bunkering;
mod candidate;
mod cargo;
mod client;
mod communication;
mod document;
mod invoice;
mod ship;
mod task;
mod user;
mod work_log;

pub use bunkering::*;
pub use candidate::*;
pub use cargo::*;
pub use client::*;
pub use communication::*;
pub use document::*;
pub use invoice::*;
pub use ship::*;
pub use task::*;
pub use user::*;
pub use work_log::*;

pub(crate) fn default_true() -> bool {
    true
}
