//! Storage layer - document store implementations

pub mod document_store;
pub mod entity;
pub mod memory;
pub mod migrations;

pub use document_store::SeaOrmDocumentStore;
pub use memory::InMemoryDocumentStore;
