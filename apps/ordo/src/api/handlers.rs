//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        AddItemRequest, HealthResponse, ItemResponse, ItemsResponse, MoveRequest,
        MutationResponse, OrderResponse, ReorderRequest, SetCompletedRequest, StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use ordo_core::{Item, ItemId, MoveOutcome, OrdoError};

/// HTTP status for a core error.
pub fn error_status(error: &OrdoError) -> StatusCode {
    match error {
        OrdoError::Validation(_) | OrdoError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
        OrdoError::NotFound(_) => StatusCode::NOT_FOUND,
        OrdoError::Store(_) | OrdoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(action: &str, error: &OrdoError) {
    if error_status(error).is_server_error() {
        tracing::error!("{} failed: {}", action, error);
    } else {
        tracing::debug!("{} rejected: {}", action, error);
    }
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Item counts.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.lock().await;
    match board.counts() {
        Ok(counts) => (StatusCode::OK, Json(StatusResponse::from(counts))).into_response(),
        Err(e) => {
            log_failure("status", &e);
            (error_status(&e), Json(MutationResponse::error(e.to_string()))).into_response()
        }
    }
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// All items, active first.
pub async fn list_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.lock().await;
    match board.partition() {
        Ok(partition) => (StatusCode::OK, Json(ItemsResponse::success(partition))),
        Err(e) => {
            log_failure("list", &e);
            (error_status(&e), Json(ItemsResponse::error(e.to_string())))
        }
    }
}

/// One item by id.
pub async fn get_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let board = state.board.lock().await;
    match board.get(ItemId(id)) {
        Ok(item) => (StatusCode::OK, Json(ItemResponse::success(item))),
        Err(e) => {
            log_failure("get", &e);
            (error_status(&e), Json(ItemResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// MUTATION HANDLERS
// =============================================================================

/// Add an item at the end of the active list.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> impl IntoResponse {
    let text = match request.validated_text() {
        Ok(text) => text,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ItemResponse::error(format!("Invalid item: {}", e))),
            );
        }
    };

    let mut board = state.board.lock().await;
    match board.add(text) {
        Ok(item) => (StatusCode::CREATED, Json(ItemResponse::success(item))),
        Err(e) => {
            log_failure("add", &e);
            (error_status(&e), Json(ItemResponse::error(e.to_string())))
        }
    }
}

/// Delete an item; absent ids succeed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut board = state.board.lock().await;
    mutation_result("delete", board.delete(ItemId(id)))
}

/// Set or clear the completed flag.
pub async fn set_completed_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetCompletedRequest>,
) -> impl IntoResponse {
    let mut board = state.board.lock().await;
    mutation_result(
        "set completed",
        board.set_completed(ItemId(id), request.completed),
    )
}

/// Archive an item whether or not it is completed.
pub async fn archive_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut board = state.board.lock().await;
    mutation_result("archive", board.archive(ItemId(id)))
}

fn mutation_result(
    action: &str,
    result: Result<(), OrdoError>,
) -> (StatusCode, Json<MutationResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(MutationResponse::success())),
        Err(e) => {
            log_failure(action, &e);
            (error_status(&e), Json(MutationResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// ORDERING HANDLERS
// =============================================================================

/// Move one active item to a new index.
pub async fn move_handler(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> impl IntoResponse {
    let mut board = state.board.lock().await;
    let (list, outcome) = board.move_item(request.id, request.to);
    order_result("move", outcome, list.items().to_vec())
}

/// Replace the active order with the given id sequence.
pub async fn reorder_handler(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(OrderResponse::error(e.to_string(), Vec::new())),
        );
    }

    let mut board = state.board.lock().await;
    let (list, outcome) = board.apply_sequence(&request.ids);
    order_result("reorder", outcome, list.items().to_vec())
}

fn order_result(
    action: &str,
    outcome: Result<MoveOutcome, OrdoError>,
    active: Vec<Item>,
) -> (StatusCode, Json<OrderResponse>) {
    match outcome {
        Ok(outcome) => (
            StatusCode::OK,
            Json(OrderResponse::from_outcome(outcome, active)),
        ),
        Err(e) => {
            log_failure(action, &e);
            (
                error_status(&e),
                Json(OrderResponse::error(e.to_string(), active)),
            )
        }
    }
}
