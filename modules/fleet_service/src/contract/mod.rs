//! Contract layer - public types shared by the domain and transport layers
//!
//! Models carry serde derives because they are also the persisted document
//! shape; the `Collection` adapter in the domain layer is the only place they
//! are converted to and from raw documents.

pub mod caller;
pub mod error;
pub mod model;

pub use caller::Caller;
pub use error::FleetError;
pub use model::*;
