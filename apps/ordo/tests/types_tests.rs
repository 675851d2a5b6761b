//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use ordo::api::{
    AddItemRequest, HealthResponse, ItemResponse, MoveRequest, MutationResponse, OrderResponse,
    ReorderRequest, SetCompletedRequest, StatusResponse, error_status,
};
use ordo_core::{
    BoardCounts, Item, ItemId, MoveOutcome, OrderIndex, OrdoError, Position,
    primitives::MAX_REORDER_BATCH,
};

fn sample_item() -> Item {
    Item {
        id: ItemId(7),
        text: "Buy milk".to_string(),
        completed: true,
        archived: false,
        order_index: OrderIndex(2),
    }
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_status_response_from_counts() {
    let status = StatusResponse::from(BoardCounts {
        active: 4,
        incomplete: 3,
        completed: 1,
        archived: 2,
    });

    assert_eq!(status.total, 6);
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"incomplete\":3"));
    assert!(json.contains("\"archived\":2"));
}

// =============================================================================
// ITEM SERIALIZATION
// =============================================================================

#[test]
fn test_item_uses_camel_case_order_index() {
    let json = serde_json::to_value(sample_item()).unwrap();

    assert_eq!(json["id"], 7);
    assert_eq!(json["orderIndex"], 2);
    assert!(json.get("order_index").is_none());
}

#[test]
fn test_item_deserialization() {
    let json = r#"{"id":3,"text":"Walk dog","completed":false,"archived":true,"orderIndex":9}"#;
    let item: Item = serde_json::from_str(json).unwrap();

    assert_eq!(item.id, ItemId(3));
    assert!(item.archived);
    assert_eq!(item.order_index, OrderIndex(9));
}

#[test]
fn test_item_response_omits_empty_fields() {
    let ok = serde_json::to_string(&ItemResponse::success(sample_item())).unwrap();
    assert!(!ok.contains("error"));

    let err = serde_json::to_string(&ItemResponse::error("gone")).unwrap();
    assert!(err.contains("\"success\":false"));
    assert!(!err.contains("\"item\""));
}

#[test]
fn test_mutation_response_success() {
    let json = serde_json::to_string(&MutationResponse::success()).unwrap();
    assert_eq!(json, r#"{"success":true}"#);
}

// =============================================================================
// REQUESTS
// =============================================================================

#[test]
fn test_add_request_validation() {
    let request: AddItemRequest = serde_json::from_str(r#"{"text":"  Walk dog "}"#).unwrap();
    assert_eq!(request.validated_text().unwrap(), "Walk dog");

    let blank = AddItemRequest {
        text: "\n\t ".to_string(),
    };
    assert!(matches!(
        blank.validated_text(),
        Err(OrdoError::Validation(_))
    ));
}

#[test]
fn test_set_completed_request() {
    let request: SetCompletedRequest = serde_json::from_str(r#"{"completed":true}"#).unwrap();
    assert!(request.completed);
}

#[test]
fn test_move_request() {
    let request: MoveRequest = serde_json::from_str(r#"{"id":5,"to":0}"#).unwrap();
    assert_eq!(request.id, ItemId(5));
    assert_eq!(request.to, 0);

    assert!(serde_json::from_str::<MoveRequest>(r#"{"id":5,"to":-1}"#).is_err());
}

#[test]
fn test_reorder_request_batch_limit() {
    let ok = ReorderRequest {
        ids: vec![ItemId(1), ItemId(2)],
    };
    assert!(ok.validate().is_ok());

    let too_many = ReorderRequest {
        ids: (0..=MAX_REORDER_BATCH as i64).map(ItemId).collect(),
    };
    assert!(matches!(
        too_many.validate(),
        Err(OrdoError::InvalidOrder(_))
    ));
}

// =============================================================================
// ORDER RESPONSE
// =============================================================================

#[test]
fn test_order_response_from_applied() {
    let positions = vec![Position::new(ItemId(2), OrderIndex(1))];
    let response = OrderResponse::from_outcome(MoveOutcome::Applied(positions.clone()), vec![]);

    assert!(response.success);
    assert!(response.applied);
    assert_eq!(response.positions, positions);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["positions"][0]["orderIndex"], 1);
}

#[test]
fn test_order_response_from_skipped() {
    let response = OrderResponse::from_outcome(MoveOutcome::Skipped, vec![sample_item()]);

    assert!(response.success);
    assert!(!response.applied);
    assert!(response.positions.is_empty());
    assert_eq!(response.active.len(), 1);
}

#[test]
fn test_order_response_error_keeps_order() {
    let response = OrderResponse::error("store failed", vec![sample_item()]);

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("store failed"));
    assert_eq!(response.active[0].id, ItemId(7));
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

#[test]
fn test_error_status_mapping() {
    assert_eq!(
        error_status(&OrdoError::Validation("x".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        error_status(&OrdoError::InvalidOrder("x".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        error_status(&OrdoError::NotFound(ItemId(1))),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        error_status(&OrdoError::Store("disk".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
