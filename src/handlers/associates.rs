//! # Associate Handlers
//!
//! Independent recyclers who sell material to the company.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{Created, created, found};
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::ApiError;
use crate::models::associate;
use crate::repositories::{AssociateRepository, NewAssociate};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAssociateRequest {
    #[schema(example = "Marta Ríos")]
    pub name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssociateResponse {
    pub id: Uuid,
    pub name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<associate::Model> for AssociateResponse {
    fn from(associate: associate::Model) -> Self {
        Self {
            id: associate.id,
            name: associate.name,
            document_id: associate.document_id,
            phone: associate.phone,
            address: associate.address,
            active: associate.active,
            created_at: associate.created_at.to_rfc3339(),
            updated_at: associate.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssociatesResponse {
    pub associates: Vec<AssociateResponse>,
}

#[utoipa::path(
    post,
    path = "/api/v1/associates",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateAssociateRequest,
    responses(
        (status = 201, description = "Associate registered", body = AssociateResponse),
        (status = 400, description = "Validation failed", body = ApiError)
    ),
    tag = "associates"
)]
pub async fn create_associate(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateAssociateRequest>, JsonRejection>,
) -> Result<Created<AssociateResponse>, ApiError> {
    let Json(request) = payload?;

    let associate = AssociateRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewAssociate {
                name: request.name,
                document_id: request.document_id,
                phone: request.phone,
                address: request.address,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/associates/{}", associate.id),
        associate.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/associates",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Associates by name", body = AssociatesResponse)
    ),
    tag = "associates"
)]
pub async fn list_associates(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<AssociatesResponse>, ApiError> {
    let associates = AssociateRepository::new(&state.db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(AssociatesResponse {
        associates: associates.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/associates/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Associate UUID")),
    responses(
        (status = 200, description = "Associate found", body = AssociateResponse),
        (status = 404, description = "Associate not found", body = ApiError)
    ),
    tag = "associates"
)]
pub async fn get_associate(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<AssociateResponse>, ApiError> {
    let associate = AssociateRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(associate, "Associate", id)?.into()))
}
