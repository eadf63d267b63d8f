//! Session and error-handling tests against the mock inventory service

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{user_json, MockService};
use inventory_console_client::services::{AuthService, InventoryService};
use inventory_console_client::{ClientError, FileTokenStore, Session, SessionState};
use shared::LoginCredentials;

#[tokio::test]
async fn test_login_stores_token_and_sends_it_afterwards() {
    let mock = MockService::start().await;
    mock.on(
        Method::POST,
        "/auth/login/json",
        StatusCode::OK,
        json!({ "access_token": "tok-123", "token_type": "bearer" }),
    );
    mock.on(Method::GET, "/auth/me", StatusCode::OK, user_json(7, "keeper@example.com"));

    let session = Arc::new(Session::in_memory());
    let auth = AuthService::new(mock.client(session.clone()));

    let credentials = LoginCredentials {
        email: "keeper@example.com".to_string(),
        password: "secret".to_string(),
    };
    let token = auth.login(&credentials).await.unwrap();
    assert_eq!(token.access_token, "tok-123");
    assert_eq!(session.token().as_deref(), Some("tok-123"));

    let login = &mock.requests_to(Method::POST, "/auth/login/json")[0];
    assert!(login.authorization.is_none());
    assert_eq!(
        login.body.as_ref().unwrap()["email"],
        json!("keeper@example.com")
    );

    let user = auth.current_user().await.unwrap();
    assert_eq!(user.id, 7);
    let me = &mock.requests_to(Method::GET, "/auth/me")[0];
    assert_eq!(me.authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let mock = MockService::start().await;
    mock.on(
        Method::GET,
        "/inventory/stats",
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "Could not validate credentials" }),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileTokenStore::new(&path);
    let session = Arc::new(Session::open(Box::new(store)).unwrap());
    session.login("stale-token").unwrap();
    assert!(path.exists());

    let mut changes = session.subscribe();
    let inventory = InventoryService::new(mock.client(session.clone()));

    let err = inventory.stats().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Could not validate credentials");
    assert!(!session.is_authenticated());
    assert_eq!(session.state(), SessionState::Expired);
    assert!(changes.has_changed().unwrap());

    // The stored token is gone for the next run too
    let reopened = Session::open(Box::new(FileTokenStore::new(&path))).unwrap();
    assert!(reopened.token().is_none());
}

#[tokio::test]
async fn test_wrong_password_reports_detail_without_expiring() {
    let mock = MockService::start().await;
    mock.on(
        Method::POST,
        "/auth/login/json",
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "Incorrect email or password" }),
    );

    let session = Arc::new(Session::in_memory());
    let mut changes = session.subscribe();
    let auth = AuthService::new(mock.client(session.clone()));

    let credentials = LoginCredentials {
        email: "keeper@example.com".to_string(),
        password: "wrong".to_string(),
    };
    let err = auth.login(&credentials).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Incorrect email or password");

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(!changes.has_changed().unwrap());
    assert!(mock.requests_to(Method::POST, "/auth/login/json")[0]
        .authorization
        .is_none());
}

#[tokio::test]
async fn test_string_detail_becomes_the_message() {
    let mock = MockService::start().await;
    mock.on(
        Method::POST,
        "/inventory/movements",
        StatusCode::BAD_REQUEST,
        json!({ "detail": "Insufficient stock. Available: 3" }),
    );
    mock.on(
        Method::GET,
        "/inventory/stats",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "boom" }),
    );

    let inventory = InventoryService::new(mock.authenticated_client("tok"));
    let request = shared::MovementCreate {
        product_id: 1,
        movement_type: shared::MovementType::Exit,
        reason: shared::MovementReason::Sale,
        quantity: 5,
        reference: None,
        notes: None,
    };

    let err = inventory.create_movement(&request).await.unwrap_err();
    match &err {
        ClientError::Api { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Insufficient stock. Available: 3");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message(), "Insufficient stock. Available: 3");

    let err = inventory.stats().await.unwrap_err();
    assert_eq!(err.code(), "API_ERROR");
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_field_error_list_is_joined() {
    let mock = MockService::start().await;
    mock.on(
        Method::POST,
        "/inventory/adjust",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "detail": [
            { "loc": ["body", "new_stock"], "msg": "ensure this value is greater than or equal to 0", "type": "value_error" },
            { "loc": ["body", "reason"], "msg": "field required", "type": "value_error.missing" }
        ]}),
    );

    let inventory = InventoryService::new(mock.authenticated_client("tok"));
    let request = shared::StockAdjustment {
        product_id: 1,
        new_stock: 4,
        reason: shared::MovementReason::PhysicalCount,
        notes: None,
    };
    let err = inventory.adjust_stock(&request).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "new_stock: ensure this value is greater than or equal to 0; reason: field required"
    );
}

#[tokio::test]
async fn test_unreachable_service_is_a_network_error() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = inventory_console_client::config::ApiConfig {
        base_url: format!("http://{}", addr),
        ..Default::default()
    };
    let api = inventory_console_client::ApiClient::new(&config, Arc::new(Session::in_memory()))
        .unwrap();
    let err = InventoryService::new(api).stats().await.unwrap_err();
    assert_eq!(err.code(), "NETWORK_ERROR");
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_invalid_login_is_rejected_locally() {
    let mock = MockService::start().await;
    let auth = AuthService::new(mock.client(Arc::new(Session::in_memory())));

    let credentials = LoginCredentials {
        email: "not-an-email".to_string(),
        password: "secret".to_string(),
    };
    let err = auth.login(&credentials).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(mock.request_count(), 0);
}
