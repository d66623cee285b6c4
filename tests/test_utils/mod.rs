//! Test utilities shared by the integration suites.
//!
//! Provides in-memory SQLite databases with the full schema, tenant-scoped
//! fixtures, a scripted generative model and helpers for driving the router
//! with `tower::ServiceExt::oneshot`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use uuid::Uuid;

use zycle::config::AppConfig;
use zycle::llm::{
    Content, GenerateRequest, GenerateResponse, GenerativeModel, ModelError, Part,
    Role, UnconfiguredModel,
};
use zycle::models::{material, purchase_invoice, sale_invoice};
use zycle::repositories::{
    CreateTenantRequest, LineInput, MaterialRepository, NewInvoice, NewMaterial,
    PurchaseInvoiceRepository, SaleInvoiceRepository, TenantRepository,
};
use zycle::server::{AppState, create_app};

/// Bearer token accepted by [`test_config`].
#[allow(dead_code)]
pub const OPERATOR_TOKEN: &str = "test-operator-token";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Creates a tenant through the repository and returns its id.
#[allow(dead_code)]
pub async fn create_test_tenant(db: &DatabaseConnection, name: &str) -> Result<Uuid> {
    let tenant = TenantRepository::new(db)
        .create_tenant(CreateTenantRequest {
            name: name.to_string(),
        })
        .await?;
    Ok(tenant.id)
}

/// Inserts a material priced at 1000 purchase / 1500 sale.
#[allow(dead_code)]
pub async fn create_test_material(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    name: &str,
    stock: f64,
) -> Result<material::Model> {
    let material = MaterialRepository::new(db)
        .create(
            tenant_id,
            NewMaterial {
                name: name.to_string(),
                category: Some("Reciclable".to_string()),
                unit: None,
                purchase_price: 1000.0,
                sale_price: 1500.0,
                stock,
            },
        )
        .await?;
    Ok(material)
}

/// Invoice input with one line per `(material, quantity)` pair.
#[allow(dead_code)]
pub fn invoice_input(
    number: &str,
    issued_at: chrono::DateTime<chrono::Utc>,
    lines: &[(Uuid, f64)],
) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        counterparty: "Chatarrería El Sol".to_string(),
        issued_at: Some(issued_at),
        lines: lines
            .iter()
            .map(|(material_id, quantity)| LineInput {
                material_id: *material_id,
                quantity: *quantity,
            })
            .collect(),
        notes: None,
    }
}

#[allow(dead_code)]
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    input: NewInvoice,
) -> Result<purchase_invoice::Model> {
    Ok(PurchaseInvoiceRepository::new(db)
        .create(tenant_id, input)
        .await?)
}

#[allow(dead_code)]
pub async fn create_test_sale(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    input: NewInvoice,
) -> Result<sale_invoice::Model> {
    Ok(SaleInvoiceRepository::new(db).create(tenant_id, input).await?)
}

/// Configuration accepting [`OPERATOR_TOKEN`] with default assistant bounds.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        operator_tokens: vec![OPERATOR_TOKEN.to_string()],
        ..Default::default()
    }
}

/// Application state over `db`, answering model calls with `model`.
#[allow(dead_code)]
pub fn test_state(db: DatabaseConnection, model: Arc<dyn GenerativeModel>) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        db,
        model,
    }
}

/// Router over a fresh database with no model configured.
#[allow(dead_code)]
pub async fn test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let app = create_app(test_state(db.clone(), Arc::new(UnconfiguredModel)));
    Ok((app, db))
}

/// JSON request carrying only the operator token.
#[allow(dead_code)]
pub fn operator_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    request_with_headers(method, uri, None, body)
}

/// Authenticated JSON request scoped to `tenant_id`.
#[allow(dead_code)]
pub fn api_request(method: Method, uri: &str, tenant_id: Uuid, body: Option<Value>) -> Request<Body> {
    request_with_headers(method, uri, Some(tenant_id), body)
}

fn request_with_headers(
    method: Method,
    uri: &str,
    tenant_id: Option<Uuid>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {OPERATOR_TOKEN}"));
    if let Some(tenant_id) = tenant_id {
        builder = builder.header("X-Tenant-Id", tenant_id.to_string());
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON (`Value::Null` for an empty body).
#[allow(dead_code)]
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// A generative model that replays canned responses in order and records
/// every request it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<GenerateResponse, ModelError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new(replies: Vec<Result<GenerateResponse, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GenerateResponse::empty()))
    }
}

/// A final text answer from the model.
#[allow(dead_code)]
pub fn text_reply(text: &str) -> Result<GenerateResponse, ModelError> {
    Ok(GenerateResponse {
        content: Content::model_text(text),
        finish_reason: Some("STOP".to_string()),
    })
}

/// A model turn requesting the named tools, in order.
#[allow(dead_code)]
pub fn tool_reply(names: &[&str]) -> Result<GenerateResponse, ModelError> {
    Ok(GenerateResponse {
        content: Content {
            role: Role::Model,
            parts: names
                .iter()
                .map(|name| Part::function_call(*name, serde_json::json!({})))
                .collect(),
        },
        finish_reason: Some("STOP".to_string()),
    })
}

/// Function responses carried by a request's last content, by tool name.
#[allow(dead_code)]
pub fn function_responses(request: &GenerateRequest) -> Vec<(String, Value)> {
    request
        .contents
        .last()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.function_response.as_ref())
                .map(|response| (response.name.clone(), response.response.clone()))
                .collect()
        })
        .unwrap_or_default()
}
