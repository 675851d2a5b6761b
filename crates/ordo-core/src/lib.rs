//! # ordo-core
//!
//! The item model and ordering engine for Ordo - THE LOGIC.
//!
//! A single-user task list: items are added, completed, reordered,
//! archived and deleted. This crate keeps item sequence, completion state
//! and archival state consistent on top of a single relation.
//!
//! ## Components
//!
//! - `store`: the `ItemStore` trait and the volatile `MemoryStore`
//! - `storage`: `SqliteStore` and the self-migrating schema
//! - `reconciler`: turns a client reorder into a full position rewrite
//! - `board`: validation, partitioning and backend selection
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies
//! - The store is the sole writer of `id`, `completed`, `archived`, `orderIndex`
//! - `reorder` is the only multi-statement transaction

// =============================================================================
// MODULES
// =============================================================================

pub mod board;
pub mod primitives;
pub mod reconciler;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Item, ItemId, OrderIndex, OrdoError, Partition, Position};

// =============================================================================
// RE-EXPORTS: Stores and Ordering
// =============================================================================

pub use board::{Board, BoardCounts, StorageBackend, validate_text};
pub use reconciler::{ActiveList, MoveOutcome, plan_move, positions_for};
pub use storage::{MigrationReport, SqliteStore};
pub use store::{ItemStore, MemoryStore};
