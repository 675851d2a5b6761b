//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use ordo_core::{
    BoardCounts, Item, ItemId, MoveOutcome, OrdoError, Partition, Position,
    primitives::MAX_REORDER_BATCH, validate_text,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Item counts per partition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub active: usize,
    pub incomplete: usize,
    pub completed: usize,
    pub archived: usize,
    pub total: usize,
}

impl From<BoardCounts> for StatusResponse {
    fn from(counts: BoardCounts) -> Self {
        Self {
            active: counts.active,
            incomplete: counts.incomplete,
            completed: counts.completed,
            archived: counts.archived,
            total: counts.total(),
        }
    }
}

// =============================================================================
// ITEMS RESPONSE
// =============================================================================

/// Full listing, split on `archived`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub success: bool,
    pub active: Vec<Item>,
    pub archived: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemsResponse {
    pub fn success(partition: Partition) -> Self {
        Self {
            success: true,
            active: partition.active,
            archived: partition.archived,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            error: Some(msg.into()),
            ..Self::default()
        }
    }
}

// =============================================================================
// ADD REQUEST / ITEM RESPONSE
// =============================================================================

/// New item request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub text: String,
}

impl AddItemRequest {
    /// Trimmed text, rejected when empty or longer than `MAX_TEXT_LENGTH`.
    pub fn validated_text(&self) -> Result<&str, OrdoError> {
        validate_text(&self.text)
    }
}

/// A single item, or the reason there is none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResponse {
    pub fn success(item: Item) -> Self {
        Self {
            success: true,
            item: Some(item),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            item: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SIMPLE MUTATIONS
// =============================================================================

/// Completion toggle request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetCompletedRequest {
    pub completed: bool,
}

/// Outcome of delete, toggle and archive.
///
/// Missing ids still report success: those mutations are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// MOVE / REORDER
// =============================================================================

/// Move one active item to a new index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    pub id: ItemId,
    pub to: usize,
}

/// Replace the whole active order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<ItemId>,
}

impl ReorderRequest {
    /// Reject batches larger than `MAX_REORDER_BATCH`.
    pub fn validate(&self) -> Result<(), OrdoError> {
        if self.ids.len() > MAX_REORDER_BATCH {
            return Err(OrdoError::InvalidOrder(format!(
                "{} ids exceeds maximum batch of {}",
                self.ids.len(),
                MAX_REORDER_BATCH
            )));
        }
        Ok(())
    }
}

/// Result of a move or reorder.
///
/// `active` is always the order the client should display: the new order
/// on success, the reverted order on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    /// False when the request was a no-op and nothing was written.
    pub applied: bool,
    pub positions: Vec<Position>,
    pub active: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrderResponse {
    pub fn from_outcome(outcome: MoveOutcome, active: Vec<Item>) -> Self {
        let (applied, positions) = match outcome {
            MoveOutcome::Applied(positions) => (true, positions),
            MoveOutcome::Skipped => (false, Vec::new()),
        };
        Self {
            success: true,
            applied,
            positions,
            active,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>, active: Vec<Item>) -> Self {
        Self {
            active,
            error: Some(msg.into()),
            ..Self::default()
        }
    }
}
