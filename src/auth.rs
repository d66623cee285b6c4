//! # Operator and company gates
//!
//! `/api/v1` sits behind two layers. [`operator_middleware`] checks the
//! operator bearer token on every route. [`tenant_middleware`] runs on the
//! company-scoped routes only: it reads `X-Tenant-Id`, resolves the company
//! and hands its [`TenantId`] to the handler. A company that was never
//! registered is answered with 404 before any handler runs.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, not_found, unauthorized, validation_error};
use crate::repositories::TenantRepository;
use crate::server::AppState;

/// Header naming the company a request acts for
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Identifier of a registered company
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Proof that the operator token was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorAuth;

/// The resolved company of a company-scoped request
#[derive(Debug, Clone)]
pub struct TenantExtension(pub TenantId);

/// Rejects requests without a configured operator bearer token.
pub async fn operator_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = bearer_token(request.headers())
        .map(|token| token_is_configured(&config.operator_tokens, token))?;

    if !authorized {
        return Err(unauthorized(Some("Invalid bearer token")));
    }

    request.extensions_mut().insert(OperatorAuth);
    Ok(next.run(request).await)
}

/// Resolves `X-Tenant-Id` to a registered company.
pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let requested = tenant_header(request.headers())?;

    let tenant = TenantRepository::new(&state.db)
        .get_tenant_by_id(requested)
        .await?
        .ok_or_else(|| not_found("Tenant", requested))?;

    tracing::debug!(tenant_id = %tenant.id, "Company context resolved");
    request
        .extensions_mut()
        .insert(TenantExtension(TenantId(tenant.id)));

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))?
        .to_str()
        .map_err(|_| unauthorized(Some("Invalid Authorization header")))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
}

fn token_is_configured(configured: &[String], token: &str) -> bool {
    configured
        .iter()
        .any(|candidate| candidate.as_bytes().ct_eq(token.as_bytes()).into())
}

fn tenant_header(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers.get(TENANT_HEADER).ok_or_else(|| {
        validation_error(
            "Missing required header",
            serde_json::json!({ TENANT_HEADER: "Required header is missing" }),
        )
    })?;

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<Uuid>().ok())
        .ok_or_else(|| {
            validation_error(
                "Invalid tenant ID",
                serde_json::json!({ TENANT_HEADER: "Must be a valid UUID" }),
            )
        })
}

/// OpenAPI header parameter for X-Tenant-Id
#[derive(Debug, Serialize, Deserialize, IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Header)]
pub struct TenantHeader {
    /// Registered company (UUID) the request acts for
    #[serde(rename = "X-Tenant-Id")]
    #[param(rename = "X-Tenant-Id", value_type = String)]
    pub tenant_id: String,
}

impl<S> FromRequestParts<S> for TenantExtension
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantExtension>()
            .cloned()
            .ok_or_else(|| {
                validation_error(
                    "Tenant context missing",
                    serde_json::json!({ TENANT_HEADER: "Tenant context not present" }),
                )
            })
    }
}

impl<S> FromRequestParts<S> for OperatorAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OperatorAuth>()
            .copied()
            .ok_or_else(|| unauthorized(Some("Operator authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use tower::ServiceExt;

    use crate::llm::UnconfiguredModel;
    use crate::repositories::CreateTenantRequest;

    async fn test_state(tokens: &[&str]) -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        AppState {
            config: Arc::new(AppConfig {
                operator_tokens: tokens.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }),
            db,
            model: Arc::new(UnconfiguredModel),
        }
    }

    async fn register(state: &AppState) -> Uuid {
        TenantRepository::new(&state.db)
            .create_tenant(CreateTenantRequest {
                name: "Reciclajes del Norte".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn run_gates(state: AppState, request: Request<Body>) -> Response {
        async fn handler(TenantExtension(tenant): TenantExtension) -> String {
            tenant.to_string()
        }

        let config = Arc::clone(&state.config);
        Router::new()
            .route("/test", get(handler))
            .route_layer(from_fn_with_state(state.clone(), tenant_middleware))
            .route_layer(from_fn_with_state(config, operator_middleware))
            .with_state(state)
            .oneshot(request)
            .await
            .unwrap()
    }

    fn request(authorization: Option<&str>, tenant: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        if let Some(value) = tenant {
            builder = builder.header(TENANT_HEADER, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_or_malformed_bearer_is_401() {
        let state = test_state(&["op-token"]).await;
        let tenant = register(&state).await.to_string();

        for authorization in [None, Some("Basic dGVzdDoxMjM="), Some("Bearer "), Some("Bearer nope")] {
            let response = run_gates(state.clone(), request(authorization, Some(&tenant))).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{authorization:?}");
        }
    }

    #[tokio::test]
    async fn bad_token_is_refused_before_the_company_lookup() {
        let state = test_state(&["op-token"]).await;
        let unknown = Uuid::new_v4().to_string();

        let response = run_gates(state, request(Some("Bearer nope"), Some(&unknown))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_or_invalid_tenant_header_is_400() {
        let state = test_state(&["op-token"]).await;

        for tenant in [None, Some("not-a-uuid")] {
            let response = run_gates(state.clone(), request(Some("Bearer op-token"), tenant)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{tenant:?}");
        }
    }

    #[tokio::test]
    async fn unregistered_tenant_is_404() {
        let state = test_state(&["op-token"]).await;
        let unknown = Uuid::new_v4().to_string();

        let response = run_gates(state, request(Some("Bearer op-token"), Some(&unknown))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registered_tenant_reaches_the_handler_with_any_configured_token() {
        let state = test_state(&["token-one", "token-two"]).await;
        let tenant = register(&state).await;

        for token in ["token-one", "token-two"] {
            let response = run_gates(
                state.clone(),
                request(Some(&format!("Bearer {token}")), Some(&tenant.to_string())),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(body, tenant.to_string().as_bytes());
        }
    }
}
