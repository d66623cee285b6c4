//! # Collaborator Handlers

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
use crate::models::collaborator;
use crate::repositories::{CollaboratorChanges, CollaboratorRepository, NewCollaborator};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCollaboratorRequest {
    #[schema(example = "Luisa Gómez")]
    pub full_name: String,
    /// National identity document number
    #[schema(example = "1144000111")]
    pub document_id: String,
    #[schema(example = "Operaria de bodega")]
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCollaboratorRequest {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorResponse {
    pub id: Uuid,
    pub full_name: String,
    pub document_id: String,
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<collaborator::Model> for CollaboratorResponse {
    fn from(collaborator: collaborator::Model) -> Self {
        Self {
            id: collaborator.id,
            full_name: collaborator.full_name,
            document_id: collaborator.document_id,
            role: collaborator.role,
            phone: collaborator.phone,
            email: collaborator.email,
            active: collaborator.active,
            created_at: collaborator.created_at.to_rfc3339(),
            updated_at: collaborator.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorsResponse {
    pub collaborators: Vec<CollaboratorResponse>,
}

#[utoipa::path(
    post,
    path = "/api/v1/collaborators",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateCollaboratorRequest,
    responses(
        (status = 201, description = "Collaborator created", body = CollaboratorResponse),
        (status = 400, description = "Validation failed", body = ApiError)
    ),
    tag = "collaborators"
)]
pub async fn create_collaborator(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateCollaboratorRequest>, JsonRejection>,
) -> Result<Created<CollaboratorResponse>, ApiError> {
    let Json(request) = payload?;

    let collaborator = CollaboratorRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewCollaborator {
                full_name: request.full_name,
                document_id: request.document_id,
                role: request.role,
                phone: request.phone,
                email: request.email,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/collaborators/{}", collaborator.id),
        collaborator.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/collaborators",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Collaborators by name", body = CollaboratorsResponse)
    ),
    tag = "collaborators"
)]
pub async fn list_collaborators(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<CollaboratorsResponse>, ApiError> {
    let collaborators = CollaboratorRepository::new(&state.db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(CollaboratorsResponse {
        collaborators: collaborators.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/collaborators/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Collaborator UUID")),
    responses(
        (status = 200, description = "Collaborator found", body = CollaboratorResponse),
        (status = 404, description = "Collaborator not found", body = ApiError)
    ),
    tag = "collaborators"
)]
pub async fn get_collaborator(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<CollaboratorResponse>, ApiError> {
    let collaborator = CollaboratorRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(collaborator, "Collaborator", id)?.into()))
}

/// Edit a collaborator or deactivate them
#[utoipa::path(
    patch,
    path = "/api/v1/collaborators/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Collaborator UUID")),
    request_body = UpdateCollaboratorRequest,
    responses(
        (status = 200, description = "Collaborator updated", body = CollaboratorResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Collaborator not found", body = ApiError)
    ),
    tag = "collaborators"
)]
pub async fn update_collaborator(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateCollaboratorRequest>, JsonRejection>,
) -> Result<Json<CollaboratorResponse>, ApiError> {
    let Json(request) = payload?;

    let collaborator = CollaboratorRepository::new(&state.db)
        .update(
            tenant.as_uuid(),
            id,
            CollaboratorChanges {
                full_name: request.full_name,
                role: request.role,
                phone: request.phone,
                email: request.email,
                active: request.active,
            },
        )
        .await?;

    Ok(Json(collaborator.into()))
}
