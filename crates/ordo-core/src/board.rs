//! # Board Module
//!
//! The task board: a storage backend plus the rules that live above the store.
//!
//! - Text validation for `add` (trim, non-empty, length cap)
//! - Active/archived partitioning and status counts
//! - Reordering through the `ActiveList` reconciler
//!
//! ## Storage Backends
//!
//! - `Memory`: `MemoryStore` (fast, volatile)
//! - `Sqlite`: `SqliteStore` for disk-backed storage

use crate::primitives::MAX_TEXT_LENGTH;
use crate::reconciler::{ActiveList, MoveOutcome};
use crate::storage::SqliteStore;
use crate::store::{ItemStore, MemoryStore};
use crate::{Item, ItemId, OrdoError, Partition, Position};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Storage backend for a Board.
#[derive(Debug)]
pub enum StorageBackend {
    /// Volatile in-memory store.
    Memory(MemoryStore),
    /// Disk-backed SQLite store.
    Sqlite(SqliteStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Memory(MemoryStore::new())
    }
}

impl ItemStore for StorageBackend {
    fn list_all(&self) -> Result<Vec<Item>, OrdoError> {
        match self {
            Self::Memory(s) => s.list_all(),
            Self::Sqlite(s) => s.list_all(),
        }
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, OrdoError> {
        match self {
            Self::Memory(s) => s.get(id),
            Self::Sqlite(s) => s.get(id),
        }
    }

    fn add(&mut self, text: &str) -> Result<Item, OrdoError> {
        match self {
            Self::Memory(s) => s.add(text),
            Self::Sqlite(s) => s.add(text),
        }
    }

    fn delete(&mut self, id: ItemId) -> Result<(), OrdoError> {
        match self {
            Self::Memory(s) => s.delete(id),
            Self::Sqlite(s) => s.delete(id),
        }
    }

    fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), OrdoError> {
        match self {
            Self::Memory(s) => s.set_completed(id, completed),
            Self::Sqlite(s) => s.set_completed(id, completed),
        }
    }

    fn archive(&mut self, id: ItemId) -> Result<(), OrdoError> {
        match self {
            Self::Memory(s) => s.archive(id),
            Self::Sqlite(s) => s.archive(id),
        }
    }

    fn reorder(&mut self, positions: &[Position]) -> Result<(), OrdoError> {
        match self {
            Self::Memory(s) => s.reorder(positions),
            Self::Sqlite(s) => s.reorder(positions),
        }
    }
}

/// Item counts per partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCounts {
    pub active: usize,
    pub incomplete: usize,
    pub completed: usize,
    pub archived: usize,
}

impl BoardCounts {
    #[must_use]
    pub fn from_partition(partition: &Partition) -> Self {
        Self {
            active: partition.active.len(),
            incomplete: partition.incomplete().count(),
            completed: partition.completed().count(),
            archived: partition.archived.len(),
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.active + self.archived
    }
}

/// Trim and check item text.
pub fn validate_text(text: &str) -> Result<&str, OrdoError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(OrdoError::Validation("text must not be empty".to_string()));
    }
    if trimmed.len() > MAX_TEXT_LENGTH {
        return Err(OrdoError::Validation(format!(
            "text length {} exceeds maximum {} bytes",
            trimmed.len(),
            MAX_TEXT_LENGTH
        )));
    }
    Ok(trimmed)
}

/// A Board combines an item store with validation and reordering.
#[derive(Debug, Default)]
pub struct Board {
    backend: StorageBackend,
}

impl Board {
    /// Create a new empty board with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or create a SQLite database at the given path.
    pub fn with_sqlite(path: impl AsRef<Path>) -> Result<Self, OrdoError> {
        Ok(Self::with_backend(StorageBackend::Sqlite(SqliteStore::open(
            path,
        )?)))
    }

    #[must_use]
    pub fn with_backend(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Sqlite(_))
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Every item in store order.
    pub fn list_all(&self) -> Result<Vec<Item>, OrdoError> {
        self.backend.list_all()
    }

    /// Items split into active and archived.
    pub fn partition(&self) -> Result<Partition, OrdoError> {
        Ok(Partition::from_sorted(self.backend.list_all()?))
    }

    pub fn counts(&self) -> Result<BoardCounts, OrdoError> {
        Ok(BoardCounts::from_partition(&self.partition()?))
    }

    /// Look up one item; a missing id is `NotFound`.
    pub fn get(&self, id: ItemId) -> Result<Item, OrdoError> {
        self.backend.get(id)?.ok_or(OrdoError::NotFound(id))
    }

    /// The active items as a reconciler view.
    pub fn active_list(&self) -> Result<ActiveList, OrdoError> {
        ActiveList::load(&self.backend)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Validate `text` and append a new item.
    pub fn add(&mut self, text: &str) -> Result<Item, OrdoError> {
        let text = validate_text(text)?;
        let item = self.backend.add(text)?;
        tracing::info!(id = item.id.0, order_index = item.order_index.value(), "item added");
        Ok(item)
    }

    pub fn delete(&mut self, id: ItemId) -> Result<(), OrdoError> {
        self.backend.delete(id)
    }

    pub fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), OrdoError> {
        self.backend.set_completed(id, completed)
    }

    /// Archive regardless of completion state.
    pub fn archive(&mut self, id: ItemId) -> Result<(), OrdoError> {
        self.backend.archive(id)
    }

    /// Raw batch update; prefer the move operations.
    pub fn reorder(&mut self, positions: &[Position]) -> Result<(), OrdoError> {
        self.backend.reorder(positions)
    }

    // =========================================================================
    // RECONCILED MOVES
    // =========================================================================

    /// Move `id` to index `to` of the current active list.
    ///
    /// On failure the returned list is the pre-move order.
    pub fn move_item(
        &mut self,
        id: ItemId,
        to: usize,
    ) -> (ActiveList, Result<MoveOutcome, OrdoError>) {
        let mut list = match self.active_list() {
            Ok(list) => list,
            Err(e) => return (ActiveList::default(), Err(e)),
        };
        let outcome = list.move_item(&mut self.backend, id, to);
        (list, outcome)
    }

    /// Replace the active order with `ids`.
    pub fn apply_sequence(
        &mut self,
        ids: &[ItemId],
    ) -> (ActiveList, Result<MoveOutcome, OrdoError>) {
        let mut list = match self.active_list() {
            Ok(list) => list,
            Err(e) => return (ActiveList::default(), Err(e)),
        };
        let outcome = list.apply_sequence(&mut self.backend, ids);
        (list, outcome)
    }
}

// =============================================================================
// TESTS
// =============================================================================
