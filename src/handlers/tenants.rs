//! # Tenants API Handlers
//!
//! Company account registration and lookup.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{Created, created, found};
use crate::auth::OperatorAuth;
use crate::error::ApiError;
use crate::models::tenant;
use crate::repositories::{CreateTenantRequest, TenantRepository};
use crate::server::AppState;

/// Request payload for creating a new tenant
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTenantRequestDto {
    /// Company display name (required, max 255 characters)
    #[schema(example = "Reciclajes del Valle S.A.S.")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Reciclajes del Valle S.A.S.")]
    pub name: String,
    /// Creation timestamp (RFC 3339)
    #[schema(example = "2026-03-02T10:30:00+00:00")]
    pub created_at: String,
}

impl From<tenant::Model> for TenantResponse {
    fn from(tenant: tenant::Model) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name.unwrap_or_default(),
            created_at: tenant.created_at.to_rfc3339(),
        }
    }
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    security(("bearer_auth" = [])),
    request_body = CreateTenantRequestDto,
    responses(
        (status = 201, description = "Tenant created", body = TenantResponse, headers(
            ("Location", description = "URL of the created tenant"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    payload: Result<Json<CreateTenantRequestDto>, JsonRejection>,
) -> Result<Created<TenantResponse>, ApiError> {
    let Json(request) = payload?;

    let tenant = TenantRepository::new(&state.db)
        .create_tenant(CreateTenantRequest { name: request.name })
        .await?;

    tracing::info!(tenant_id = %tenant.id, "Tenant created");

    Ok(created(
        format!("/api/v1/tenants/{}", tenant.id),
        TenantResponse::from(tenant),
    ))
}

/// Get a tenant by ID
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tenant UUID")),
    responses(
        (status = 200, description = "Tenant found", body = TenantResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn get_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<TenantResponse>, ApiError> {
    let tenant = TenantRepository::new(&state.db)
        .get_tenant_by_id(tenant_id)
        .await?;

    Ok(Json(found(tenant, "Tenant", tenant_id)?.into()))
}
