//! Music Catalog Server Library
//!
//! This library exposes the internal modules for testing and for the binaries.

pub mod admin;
pub mod catalog_service;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use admin::{AdminStore, AuthGate, SqliteAdminStore, TokenCodec};
pub use catalog_service::CatalogService;
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
