//! Console mutation tests against the mock inventory service

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{alert_json, movement_json, page_json, product_json, stats_json, MockService};
use inventory_console_client::{ClientError, InventoryConsole};
use shared::{
    AdjustmentDraft, BatchDraft, BatchLineDraft, MovementDraft, MovementReason, MovementType,
    Notice, StockOperation, StockUpdateDraft, SubmissionState, ValidationError,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Mock with a three-product catalog and every read endpoint wired up
async fn inventory_service() -> MockService {
    let mock = MockService::start().await;
    mock.on_fn(Method::GET, "/products", |request| {
        let page: u32 = request.query["page"].parse().unwrap();
        let items = if page == 1 {
            vec![
                product_json(1, 10, 2),
                product_json(2, 3, 5),
                product_json(3, 0, 1),
            ]
        } else {
            Vec::new()
        };
        (StatusCode::OK, page_json(items, page, 100, 3))
    });
    mock.on(
        Method::GET,
        "/inventory/movements",
        StatusCode::OK,
        page_json(vec![movement_json(1, 1, "entry", "purchase", 10, 0, 10)], 1, 20, 1),
    );
    mock.on(Method::GET, "/inventory/stats", StatusCode::OK, stats_json(2));
    mock.on(
        Method::GET,
        "/inventory/alerts/low-stock",
        StatusCode::OK,
        alert_json(vec![(2, 3, 5), (3, 0, 1)]),
    );
    mock
}

async fn loaded_console(mock: &MockService) -> InventoryConsole {
    let mut console = InventoryConsole::new(mock.authenticated_client("tok"));
    console.load().await.unwrap();
    console
}

fn reads_since(mock: &MockService, before: usize) -> Vec<String> {
    mock.requests()
        .into_iter()
        .skip(before)
        .filter(|r| r.method == Method::GET)
        .map(|r| r.path)
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_fills_every_view() {
    let mock = inventory_service().await;
    let console = loaded_console(&mock).await;

    assert_eq!(console.products().len(), 3);
    assert_eq!(console.movements().unwrap().items.len(), 1);
    assert_eq!(console.stats().unwrap().low_stock_count, 2);

    // counts come from the rows, not the fetched totals
    let alerts = console.alerts();
    assert_eq!(alerts.critical_count, 1);
    assert_eq!(alerts.warning_count, 1);
    assert_eq!(alerts.entries[0].product_id, 3);
}

// ============================================================================
// Movements
// ============================================================================

#[tokio::test]
async fn test_exit_beyond_cached_stock_never_reaches_the_service() {
    let mock = inventory_service().await;
    let mut console = loaded_console(&mock).await;

    let mut draft = MovementDraft::for_product(2, MovementType::Exit);
    draft.quantity = 4;

    let err = console.create_movement(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InsufficientStock { available: 3, .. })
    ));
    assert!(mock.requests_to(Method::POST, "/inventory/movements").is_empty());
    assert!(matches!(console.submission(), SubmissionState::Invalid { .. }));
    assert!(console.is_form_open());

    let notices = console.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(
        notices[0],
        Notice::Invalid(ValidationError::InsufficientStock {
            available: 3,
            requested: 4
        })
    );

    // Editing the form clears the error
    console.edit_form();
    assert_eq!(*console.submission(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_recorded_movement_refetches_movement_views() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/movements",
        StatusCode::CREATED,
        movement_json(2, 1, "exit", "damaged", 4, 10, 6),
    );
    let mut console = loaded_console(&mock).await;
    let before = mock.request_count();

    let mut draft = MovementDraft::for_product(1, MovementType::Exit);
    draft.reason = MovementReason::Damaged;
    draft.quantity = 4;
    draft.reference = String::new();
    draft.notes = "dropped pallet".to_string();

    let movement = console.create_movement(&draft).await.unwrap();
    assert_eq!(movement.stock_after, 6);

    let post = &mock.requests_to(Method::POST, "/inventory/movements")[0];
    let body = post.body.as_ref().unwrap();
    assert_eq!(body["product_id"], json!(1));
    assert_eq!(body["movement_type"], json!("exit"));
    assert_eq!(body["reason"], json!("damaged"));
    assert_eq!(body["quantity"], json!(4));
    assert_eq!(body["reference"], json!(null));
    assert_eq!(body["notes"], json!("dropped pallet"));

    let reads = reads_since(&mock, before);
    assert!(reads.contains(&"/api/v1/inventory/movements".to_string()));
    assert!(reads.contains(&"/api/v1/inventory/stats".to_string()));
    assert!(reads.contains(&"/api/v1/inventory/alerts/low-stock".to_string()));
    assert!(!reads.contains(&"/api/v1/products".to_string()));

    assert_eq!(*console.submission(), SubmissionState::Idle);
    assert!(!console.is_form_open());
    assert_eq!(
        console.take_notices(),
        vec![Notice::Success("Movement recorded".to_string())]
    );
}

#[tokio::test]
async fn test_rejected_movement_keeps_form_open_with_service_message() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/movements",
        StatusCode::BAD_REQUEST,
        json!({ "detail": "Product is inactive" }),
    );
    let mut console = loaded_console(&mock).await;
    let before = mock.request_count();

    let draft = MovementDraft::for_product(1, MovementType::Entry);
    let err = console.create_movement(&draft).await.unwrap_err();
    assert_eq!(err.user_message(), "Product is inactive");

    // nothing is refetched after a failure
    assert!(reads_since(&mock, before).is_empty());
    assert_eq!(*console.submission(), SubmissionState::Idle);
    assert!(console.is_form_open());
    assert_eq!(
        console.take_notices(),
        vec![Notice::Error("Product is inactive".to_string())]
    );
}

#[tokio::test]
async fn test_failed_refetch_does_not_fail_the_mutation() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/movements",
        StatusCode::CREATED,
        movement_json(2, 1, "entry", "purchase", 5, 10, 15),
    );
    let mut console = loaded_console(&mock).await;
    mock.on(
        Method::GET,
        "/inventory/stats",
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "detail": "down" }),
    );

    let draft = MovementDraft::for_product(1, MovementType::Entry);
    assert!(console.create_movement(&draft).await.is_ok());
    // the stale stats stay in place
    assert_eq!(console.stats().unwrap().low_stock_count, 2);
}

// ============================================================================
// Adjustments
// ============================================================================

#[tokio::test]
async fn test_adjustment_patches_cached_stock() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/adjust",
        StatusCode::CREATED,
        movement_json(3, 2, "adjustment", "physical_count", 9, 3, 12),
    );
    let mut console = loaded_console(&mock).await;
    let before = mock.request_count();

    let product = console.products().get(2).cloned().unwrap();
    let mut draft = AdjustmentDraft::for_product(&product);
    draft.new_stock = 12;
    assert_eq!(draft.difference(), 9);

    console.adjust_stock(&draft).await.unwrap();

    let post = &mock.requests_to(Method::POST, "/inventory/adjust")[0];
    let body = post.body.as_ref().unwrap();
    assert_eq!(body["product_id"], json!(2));
    assert_eq!(body["new_stock"], json!(12));
    assert_eq!(body["reason"], json!("physical_count"));

    assert_eq!(console.products().get(2).unwrap().stock_current, 12);
    assert!(console.products().is_patched(2));
    assert!(!reads_since(&mock, before).contains(&"/api/v1/products".to_string()));
    assert_eq!(
        console.take_notices(),
        vec![Notice::Success("Stock adjusted".to_string())]
    );
}

#[tokio::test]
async fn test_adjustment_to_same_stock_is_rejected() {
    let mock = inventory_service().await;
    let mut console = loaded_console(&mock).await;

    let product = console.products().get(1).cloned().unwrap();
    let draft = AdjustmentDraft::for_product(&product);
    let err = console.adjust_stock(&draft).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(ValidationError::NoChange)));
    assert!(mock.requests_to(Method::POST, "/inventory/adjust").is_empty());
}

// ============================================================================
// Batch entry
// ============================================================================

#[tokio::test]
async fn test_batch_submits_only_complete_lines() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/batch-entry",
        StatusCode::CREATED,
        json!([
            movement_json(4, 1, "entry", "purchase", 5, 10, 15),
            movement_json(5, 3, "entry", "purchase", 2, 0, 2),
        ]),
    );
    let mut console = loaded_console(&mock).await;

    let mut draft = BatchDraft::new();
    draft.reference = "PO-1001".to_string();
    if let Some(line) = draft.line_mut(0) {
        line.product_id = Some(1);
        line.quantity = 5;
    }
    draft.push_line(BatchLineDraft::default());
    draft.push_line(BatchLineDraft {
        product_id: Some(3),
        quantity: 2,
        notes: "restock".to_string(),
    });
    draft.push_line(BatchLineDraft {
        product_id: Some(2),
        quantity: 0,
        notes: String::new(),
    });
    assert_eq!(draft.dropped_count(), 2);

    let movements = console.batch_entry(&draft).await.unwrap();
    assert_eq!(movements.len(), 2);

    let post = &mock.requests_to(Method::POST, "/inventory/batch-entry")[0];
    let body = post.body.as_ref().unwrap();
    assert_eq!(body["reason"], json!("purchase"));
    assert_eq!(body["reference"], json!("PO-1001"));
    assert_eq!(
        body["items"],
        json!([
            { "product_id": 1, "quantity": 5, "notes": null },
            { "product_id": 3, "quantity": 2, "notes": "restock" },
        ])
    );
    assert_eq!(
        console.take_notices(),
        vec![Notice::Success("Batch entry recorded".to_string())]
    );
}

#[tokio::test]
async fn test_batch_without_complete_lines_is_rejected() {
    let mock = inventory_service().await;
    let mut console = loaded_console(&mock).await;

    let err = console.batch_entry(&BatchDraft::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ValidationError::EmptyBatch)));
    assert!(mock.requests_to(Method::POST, "/inventory/batch-entry").is_empty());
}

// ============================================================================
// Stock updates
// ============================================================================

#[tokio::test]
async fn test_stock_update_refetches_products_and_alerts() {
    let mock = inventory_service().await;
    mock.on(
        Method::PATCH,
        "/products/1/stock",
        StatusCode::OK,
        product_json(1, 7, 2),
    );
    let mut console = loaded_console(&mock).await;
    let before = mock.request_count();

    let product = console.products().get(1).cloned().unwrap();
    let draft = StockUpdateDraft::for_product(&product, StockOperation::Remove, 3);
    assert_eq!(draft.preview(), 7);
    console.update_stock(&draft).await.unwrap();

    let patch = &mock.requests_to(Method::PATCH, "/products/1/stock")[0];
    assert_eq!(patch.query["quantity"], "-3");
    assert_eq!(patch.query["reason"], "sale");

    let reads = reads_since(&mock, before);
    assert!(reads.contains(&"/api/v1/products".to_string()));
    assert!(reads.contains(&"/api/v1/inventory/stats".to_string()));
    assert!(reads.contains(&"/api/v1/inventory/alerts/low-stock".to_string()));
    assert!(!reads.contains(&"/api/v1/inventory/movements".to_string()));
}

// ============================================================================
// Form lifecycle
// ============================================================================

#[tokio::test]
async fn test_closing_after_success_keeps_notices_and_data() {
    let mock = inventory_service().await;
    mock.on(
        Method::POST,
        "/inventory/movements",
        StatusCode::CREATED,
        movement_json(2, 1, "entry", "purchase", 1, 10, 11),
    );
    let mut console = loaded_console(&mock).await;

    console.open_form();
    assert!(console.is_form_open());
    console.create_movement(&MovementDraft::for_product(1, MovementType::Entry))
        .await
        .unwrap();
    console.close_form();

    assert!(!console.is_form_open());
    assert_eq!(
        *console.submission(),
        SubmissionState::Closed { in_flight: false }
    );
    assert_eq!(console.take_notices().len(), 1);
    assert!(console.take_notices().is_empty());
}
