//! # Material Catalog Handlers

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
use crate::models::material;
use crate::repositories::{MaterialChanges, MaterialRepository, NewMaterial};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMaterialRequest {
    #[schema(example = "PET")]
    pub name: String,
    #[schema(example = "Plásticos")]
    pub category: Option<String>,
    /// Unit of measure (default: kg)
    #[schema(example = "kg")]
    pub unit: Option<String>,
    #[schema(example = 900.0)]
    pub purchase_price: f64,
    #[schema(example = 1300.0)]
    pub sale_price: f64,
    /// Initial stock (default: 0)
    #[serde(default)]
    pub stock: f64,
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMaterialRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub stock: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaterialResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub stock: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<material::Model> for MaterialResponse {
    fn from(material: material::Model) -> Self {
        Self {
            id: material.id,
            name: material.name,
            category: material.category,
            unit: material.unit,
            purchase_price: material.purchase_price,
            sale_price: material.sale_price,
            stock: material.stock,
            created_at: material.created_at.to_rfc3339(),
            updated_at: material.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaterialsResponse {
    pub materials: Vec<MaterialResponse>,
}

/// Add a material to the catalog
#[utoipa::path(
    post,
    path = "/api/v1/materials",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Material created", body = MaterialResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateMaterialRequest>, JsonRejection>,
) -> Result<Created<MaterialResponse>, ApiError> {
    let Json(request) = payload?;

    let material = MaterialRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewMaterial {
                name: request.name,
                category: request.category,
                unit: request.unit,
                purchase_price: request.purchase_price,
                sale_price: request.sale_price,
                stock: request.stock,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/materials/{}", material.id),
        material.into(),
    ))
}

/// List the catalog alphabetically
#[utoipa::path(
    get,
    path = "/api/v1/materials",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Materials of the tenant", body = MaterialsResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<MaterialsResponse>, ApiError> {
    let materials = MaterialRepository::new(&state.db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(MaterialsResponse {
        materials: materials.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/materials/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Material UUID")),
    responses(
        (status = 200, description = "Material found", body = MaterialResponse),
        (status = 404, description = "Material not found", body = ApiError)
    ),
    tag = "materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let material = MaterialRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(material, "Material", id)?.into()))
}

/// Edit catalog fields or correct the stock level
#[utoipa::path(
    patch,
    path = "/api/v1/materials/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Material UUID")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Material updated", body = MaterialResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Material not found", body = ApiError)
    ),
    tag = "materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateMaterialRequest>, JsonRejection>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let Json(request) = payload?;

    let material = MaterialRepository::new(&state.db)
        .update(
            tenant.as_uuid(),
            id,
            MaterialChanges {
                name: request.name,
                category: request.category,
                unit: request.unit,
                purchase_price: request.purchase_price,
                sale_price: request.sale_price,
                stock: request.stock,
            },
        )
        .await?;

    Ok(Json(material.into()))
}
