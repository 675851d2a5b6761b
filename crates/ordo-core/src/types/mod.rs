//! # Core Type Definitions
//!
//! This module contains all core types for Ordo:
//! - Identifiers and ordering keys (`ItemId`, `OrderIndex`, `Position`)
//! - The item record (`Item`) and its active/archived split (`Partition`)
//! - Error types (`OrdoError`)
//!
//! ## Ordering Guarantees
//!
//! `OrderIndex` values only need to be comparable, not contiguous. Ties are
//! tolerated when reading but never produced by the reconciler.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for an item.
///
/// Assigned by the store on creation. Monotonically increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relative position of an active item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct OrderIndex(pub i64);

impl OrderIndex {
    /// Position handed to the first item of an empty active list.
    pub const FIRST: Self = Self(1);

    /// Create a new order index.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The index directly after this one, saturating at `i64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Order index for the item at `rank` (zero-based) in a rewritten sequence.
    #[must_use]
    pub const fn from_rank(rank: usize) -> Self {
        Self((rank as i64).saturating_add(1))
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

// =============================================================================
// ITEM
// =============================================================================

/// A task list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
    pub archived: bool,
    #[serde(rename = "orderIndex")]
    pub order_index: OrderIndex,
}

impl Item {
    /// True when the item takes part in ordering.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.archived
    }

    /// Sort key used by `list_all`: active first, then by order, then by id.
    #[must_use]
    pub const fn sort_key(&self) -> (bool, OrderIndex, ItemId) {
        (self.archived, self.order_index, self.id)
    }
}

/// A single `(id, orderIndex)` assignment submitted to `reorder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub id: ItemId,
    #[serde(rename = "orderIndex")]
    pub order_index: OrderIndex,
}

impl Position {
    #[must_use]
    pub const fn new(id: ItemId, order_index: OrderIndex) -> Self {
        Self { id, order_index }
    }
}

// =============================================================================
// PARTITION
// =============================================================================

/// The output of `list_all` split on `archived`.
///
/// Both halves keep the store's ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub active: Vec<Item>,
    pub archived: Vec<Item>,
}

impl Partition {
    /// Split an already sorted listing.
    #[must_use]
    pub fn from_sorted(items: Vec<Item>) -> Self {
        let (active, archived) = items.into_iter().partition(Item::is_active);
        Self { active, archived }
    }

    /// Active items that are not completed yet.
    pub fn incomplete(&self) -> impl Iterator<Item = &Item> {
        self.active.iter().filter(|item| !item.completed)
    }

    /// Active items that are completed but not archived.
    pub fn completed(&self) -> impl Iterator<Item = &Item> {
        self.active.iter().filter(|item| item.completed)
    }

    /// Ids of the active items, in order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<ItemId> {
        self.active.iter().map(|item| item.id).collect()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Ordo.
///
/// - Store failures bubble up unmodified
/// - Missing ids on delete/toggle/archive are NOT errors
#[derive(Debug, Error)]
pub enum OrdoError {
    /// Item text was rejected (empty after trimming, or too long).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying persistence layer failed.
    #[error("Store error: {0}")]
    Store(String),

    /// The requested item does not exist.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// A submitted sequence is not a permutation of the active items.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// An I/O error occurred outside the store (files, sockets, terminal).
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for OrdoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, order: i64, archived: bool) -> Item {
        Item {
            id: ItemId(id),
            text: format!("item {id}"),
            completed: false,
            archived,
            order_index: OrderIndex(order),
        }
    }

    #[test]
    fn order_index_from_rank_is_one_based() {
        assert_eq!(OrderIndex::from_rank(0), OrderIndex::FIRST);
        assert_eq!(OrderIndex::from_rank(4).value(), 5);
    }

    #[test]
    fn order_index_next_saturates() {
        assert_eq!(OrderIndex(i64::MAX).next().value(), i64::MAX);
        assert_eq!(OrderIndex(1).next().value(), 2);
    }

    #[test]
    fn sort_key_puts_active_first() {
        let mut items = vec![item(1, 1, true), item(2, 5, false), item(3, 2, false)];
        items.sort_by_key(Item::sort_key);

        let ids: Vec<_> = items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn partition_splits_on_archived() {
        let mut done = item(2, 2, false);
        done.completed = true;
        let partition = Partition::from_sorted(vec![item(1, 1, false), done, item(3, 3, true)]);

        assert_eq!(partition.active.len(), 2);
        assert_eq!(partition.archived.len(), 1);
        assert_eq!(partition.incomplete().count(), 1);
        assert_eq!(partition.completed().count(), 1);
        assert_eq!(partition.active_ids(), vec![ItemId(1), ItemId(2)]);
    }
}
