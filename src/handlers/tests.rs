//! # Tests for Handlers
//!
//! Unit tests for the unauthenticated service handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::handlers::{healthz, root};
use crate::llm::UnconfiguredModel;
use crate::repositories::test_support::setup_test_db;
use crate::server::AppState;

fn state_with(db: DatabaseConnection) -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        db,
        model: Arc::new(UnconfiguredModel),
    }
}

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let axum::Json(service_info) = root().await;

    assert_eq!(service_info.service, "zycle-api");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_handler_serializes_service_fields_only() {
    let axum::Json(service_info) = root().await;
    let json = serde_json::to_value(&service_info).unwrap();

    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object.contains_key("service"));
    assert!(object.contains_key("version"));
}

#[tokio::test]
async fn test_healthz_reports_ok_with_live_database() {
    let db = setup_test_db().await;

    let axum::Json(health) = healthz(State(state_with(db))).await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "ok");
}

#[tokio::test]
async fn test_healthz_returns_503_without_database() {
    let result = healthz(State(state_with(DatabaseConnection::default()))).await;

    let error = result.unwrap_err();
    assert_eq!(error.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&*error.code, "SERVICE_UNAVAILABLE");

    let response = error.into_response();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
}
