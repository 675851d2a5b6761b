//! # Item Store
//!
//! The durable CRUD surface for items and the sole writer of
//! `id`, `completed`, `archived` and `orderIndex`.
//!
//! This module defines the `ItemStore` trait and the volatile `MemoryStore`.
//! The SQLite-backed implementation lives in `storage`.

use crate::{Item, ItemId, OrderIndex, OrdoError, Position};
use std::collections::BTreeMap;

// =============================================================================
// ITEMSTORE TRAIT
// =============================================================================

/// The ItemStore trait defines every persistence operation of the core.
///
/// Contract shared by all backends:
/// - `add` does not validate text; callers pass trimmed, non-empty text.
/// - `delete`, `set_completed` and `archive` on a missing id are silent no-ops.
/// - `reorder` is all-or-nothing.
pub trait ItemStore {
    /// All items: active before archived, then ascending `orderIndex`
    /// (ties broken by id).
    fn list_all(&self) -> Result<Vec<Item>, OrdoError>;

    /// Look up one item.
    fn get(&self, id: ItemId) -> Result<Option<Item>, OrdoError>;

    /// Insert a new active, incomplete item after the last active one.
    fn add(&mut self, text: &str) -> Result<Item, OrdoError>;

    /// Remove the item permanently.
    fn delete(&mut self, id: ItemId) -> Result<(), OrdoError>;

    /// Set the completion flag.
    fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), OrdoError>;

    /// Mark the item archived. `orderIndex` is left untouched.
    fn archive(&mut self, id: ItemId) -> Result<(), OrdoError>;

    /// Apply every `(id, orderIndex)` pair as one atomic unit.
    ///
    /// Pairs naming archived or missing ids are applied as plain updates;
    /// filtering them is the caller's job.
    fn reorder(&mut self, positions: &[Position]) -> Result<(), OrdoError>;
}

/// Next order index given the current active items.
pub(crate) fn next_order_index<'a>(active: impl Iterator<Item = &'a Item>) -> OrderIndex {
    active
        .map(|item| item.order_index)
        .max()
        .map(OrderIndex::next)
        .unwrap_or(OrderIndex::FIRST)
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Volatile item store.
///
/// Ids come from a high-water counter so deleted ids are never handed out again.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<ItemId, Item>,
    last_id: i64,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items, archived included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<Item>, OrdoError> {
        let mut items: Vec<Item> = self.items.values().cloned().collect();
        items.sort_by_key(Item::sort_key);
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, OrdoError> {
        Ok(self.items.get(&id).cloned())
    }

    fn add(&mut self, text: &str) -> Result<Item, OrdoError> {
        let order_index = next_order_index(self.items.values().filter(|item| item.is_active()));
        self.last_id = self.last_id.saturating_add(1);

        let item = Item {
            id: ItemId(self.last_id),
            text: text.to_string(),
            completed: false,
            archived: false,
            order_index,
        };
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    fn delete(&mut self, id: ItemId) -> Result<(), OrdoError> {
        self.items.remove(&id);
        Ok(())
    }

    fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), OrdoError> {
        if let Some(item) = self.items.get_mut(&id) {
            item.completed = completed;
        }
        Ok(())
    }

    fn archive(&mut self, id: ItemId) -> Result<(), OrdoError> {
        if let Some(item) = self.items.get_mut(&id) {
            item.archived = true;
        }
        Ok(())
    }

    fn reorder(&mut self, positions: &[Position]) -> Result<(), OrdoError> {
        // A map write cannot fail halfway, so updating in place is atomic.
        for position in positions {
            if let Some(item) = self.items.get_mut(&position.id) {
                item.order_index = position.order_index;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
