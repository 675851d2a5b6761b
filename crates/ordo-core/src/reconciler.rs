//! # Ordering Reconciler
//!
//! Turns a client-side reorder of the active items into a complete
//! `(id, orderIndex)` list and submits it through `ItemStore::reorder`.
//!
//! ## Total rewrite
//!
//! Every move rewrites the position of every active item to `rank + 1`.
//! Positions never drift into fractions and ties are never produced.
//!
//! ## Failure
//!
//! `ActiveList` is the client's last known-good view. When the store
//! rejects a batch the list is restored to its pre-move order and the
//! store error is returned unchanged.

use crate::store::ItemStore;
use crate::{Item, ItemId, OrderIndex, OrdoError, Position};
use std::collections::BTreeSet;

/// Result of a reconcile attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The full position list that was committed.
    Applied(Vec<Position>),
    /// Nothing changed, so no batch was submitted.
    Skipped,
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Sequence after moving the element at `from` to `to`.
///
/// `to` past the end is clamped to the last slot. Returns `None` when the
/// move is a no-op or `from` is out of range.
#[must_use]
pub fn plan_move<T: Clone>(sequence: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= sequence.len() {
        return None;
    }
    let to = to.min(sequence.len() - 1);
    if from == to {
        return None;
    }

    let mut moved = sequence.to_vec();
    let element = moved.remove(from);
    moved.insert(to, element);
    Some(moved)
}

/// Assign `orderIndex = rank + 1` to every id, in sequence order.
#[must_use]
pub fn positions_for(ids: &[ItemId]) -> Vec<Position> {
    ids.iter()
        .enumerate()
        .map(|(rank, &id)| Position::new(id, OrderIndex::from_rank(rank)))
        .collect()
}

// =============================================================================
// ACTIVE LIST
// =============================================================================

/// The ordered active items as a client last saw them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveList {
    items: Vec<Item>,
}

impl ActiveList {
    /// Build from items already in display order. Archived items are dropped.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: items.into_iter().filter(Item::is_active).collect(),
        }
    }

    /// Load the current active items from a store.
    pub fn load<S: ItemStore + ?Sized>(store: &S) -> Result<Self, OrdoError> {
        Ok(Self::new(store.list_all()?))
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    #[must_use]
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move the item with `id` to index `to`.
    ///
    /// An unknown id is skipped without touching the store.
    pub fn move_item<S: ItemStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: ItemId,
        to: usize,
    ) -> Result<MoveOutcome, OrdoError> {
        match self.index_of(id) {
            Some(from) => self.move_index(store, from, to),
            None => {
                tracing::debug!(id = id.0, "move skipped: id not in active list");
                Ok(MoveOutcome::Skipped)
            }
        }
    }

    /// Move the item at index `from` to index `to`.
    pub fn move_index<S: ItemStore + ?Sized>(
        &mut self,
        store: &mut S,
        from: usize,
        to: usize,
    ) -> Result<MoveOutcome, OrdoError> {
        match plan_move(&self.items, from, to) {
            Some(reordered) => self.commit(store, reordered),
            None => {
                tracing::debug!(from, to, "move skipped: no-op");
                Ok(MoveOutcome::Skipped)
            }
        }
    }

    /// Replace the order with a full id sequence.
    ///
    /// `ids` must be a permutation of the current active ids.
    pub fn apply_sequence<S: ItemStore + ?Sized>(
        &mut self,
        store: &mut S,
        ids: &[ItemId],
    ) -> Result<MoveOutcome, OrdoError> {
        let current = self.ids();
        if ids == current.as_slice() {
            return Ok(MoveOutcome::Skipped);
        }
        if ids.len() != current.len() {
            return Err(OrdoError::InvalidOrder(format!(
                "expected {} ids, got {}",
                current.len(),
                ids.len()
            )));
        }

        let known: BTreeSet<ItemId> = current.iter().copied().collect();
        let mut seen = BTreeSet::new();
        for &id in ids {
            if !known.contains(&id) {
                return Err(OrdoError::InvalidOrder(format!("{id} is not an active item")));
            }
            if !seen.insert(id) {
                return Err(OrdoError::InvalidOrder(format!("{id} appears twice")));
            }
        }

        let reordered = ids
            .iter()
            .filter_map(|id| self.items.iter().find(|item| item.id == *id).cloned())
            .collect();
        self.commit(store, reordered)
    }

    /// Submit `reordered` as the new order, reverting on failure.
    fn commit<S: ItemStore + ?Sized>(
        &mut self,
        store: &mut S,
        mut reordered: Vec<Item>,
    ) -> Result<MoveOutcome, OrdoError> {
        let ids: Vec<ItemId> = reordered.iter().map(|item| item.id).collect();
        let positions = positions_for(&ids);

        for (item, position) in reordered.iter_mut().zip(&positions) {
            item.order_index = position.order_index;
        }
        let snapshot = std::mem::replace(&mut self.items, reordered);

        if let Err(e) = store.reorder(&positions) {
            tracing::warn!(error = %e, "reorder rejected, restoring previous order");
            self.items = snapshot;
            return Err(e);
        }

        Ok(MoveOutcome::Applied(positions))
    }
}

// =============================================================================
// TESTS
// =============================================================================
