//! # Persistent Storage
//!
//! SQLite-backed implementation of `ItemStore` and its schema migration.

pub mod schema;
mod sqlite_store;

pub use schema::{MigrationReport, migrate};
pub use sqlite_store::SqliteStore;
