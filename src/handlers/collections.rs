//! # Collection Handlers
//!
//! Pickups of material at source points.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{Created, created, found};
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::ApiError;
use crate::models::collection::{self, CollectionStatus};
use crate::repositories::{CollectionRepository, NewCollection};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCollectionRequest {
    #[schema(example = "Conjunto Residencial Los Álamos")]
    pub source_point: String,
    pub material_id: Uuid,
    /// Weight in the material's unit
    #[schema(example = 35.5)]
    pub weight: f64,
    /// Defaults to now
    pub collected_at: Option<DateTime<Utc>>,
    pub vehicle_id: Option<Uuid>,
    pub collaborator_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCollectionStatusRequest {
    pub status: CollectionStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollectionResponse {
    pub id: Uuid,
    pub source_point: String,
    pub material_id: Uuid,
    pub material_name: String,
    pub weight: f64,
    pub collected_at: String,
    pub vehicle_id: Option<Uuid>,
    pub collaborator_id: Option<Uuid>,
    pub notes: Option<String>,
    pub status: CollectionStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<collection::Model> for CollectionResponse {
    fn from(collection: collection::Model) -> Self {
        Self {
            id: collection.id,
            source_point: collection.source_point,
            material_id: collection.material_id,
            material_name: collection.material_name,
            weight: collection.weight,
            collected_at: collection.collected_at.to_rfc3339(),
            vehicle_id: collection.vehicle_id,
            collaborator_id: collection.collaborator_id,
            notes: collection.notes,
            status: collection.status,
            created_at: collection.created_at.to_rfc3339(),
            updated_at: collection.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollectionsResponse {
    pub collections: Vec<CollectionResponse>,
}

/// Schedule a collection
#[utoipa::path(
    post,
    path = "/api/v1/collections",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, description = "Collection created", body = CollectionResponse),
        (status = 400, description = "Validation failed or unknown reference", body = ApiError)
    ),
    tag = "collections"
)]
pub async fn create_collection(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> Result<Created<CollectionResponse>, ApiError> {
    let Json(request) = payload?;

    let collection = CollectionRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewCollection {
                source_point: request.source_point,
                material_id: request.material_id,
                weight: request.weight,
                collected_at: request.collected_at,
                vehicle_id: request.vehicle_id,
                collaborator_id: request.collaborator_id,
                notes: request.notes,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/collections/{}", collection.id),
        collection.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/collections",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Collections, most recent first", body = CollectionsResponse)
    ),
    tag = "collections"
)]
pub async fn list_collections(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<CollectionsResponse>, ApiError> {
    let collections = CollectionRepository::new(&state.db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(CollectionsResponse {
        collections: collections.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/collections/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Collection UUID")),
    responses(
        (status = 200, description = "Collection found", body = CollectionResponse),
        (status = 404, description = "Collection not found", body = ApiError)
    ),
    tag = "collections"
)]
pub async fn get_collection(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let collection = CollectionRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(collection, "Collection", id)?.into()))
}

/// Complete or cancel a scheduled collection
#[utoipa::path(
    patch,
    path = "/api/v1/collections/{id}/status",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Collection UUID")),
    request_body = UpdateCollectionStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = CollectionResponse),
        (status = 400, description = "Transition not allowed", body = ApiError),
        (status = 404, description = "Collection not found", body = ApiError)
    ),
    tag = "collections"
)]
pub async fn update_collection_status(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateCollectionStatusRequest>, JsonRejection>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let Json(request) = payload?;

    let collection = CollectionRepository::new(&state.db)
        .update_status(tenant.as_uuid(), id, request.status)
        .await?;

    Ok(Json(collection.into()))
}
