//! Infrastructure adapters: persistence and identity verification

pub mod identity;
pub mod storage;
