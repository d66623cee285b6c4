//! # Vehicle Handlers

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
use crate::models::vehicle;
use crate::repositories::{NewVehicle, VehicleRepository};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateVehicleRequest {
    /// License plate, unique within the company
    #[schema(example = "ABC123")]
    pub plate: String,
    #[schema(example = "Camión NHR")]
    pub description: Option<String>,
    #[schema(example = 2500.0)]
    pub capacity_kg: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub description: Option<String>,
    pub capacity_kg: Option<f64>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<vehicle::Model> for VehicleResponse {
    fn from(vehicle: vehicle::Model) -> Self {
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            description: vehicle.description,
            capacity_kg: vehicle.capacity_kg,
            active: vehicle.active,
            created_at: vehicle.created_at.to_rfc3339(),
            updated_at: vehicle.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehiclesResponse {
    pub vehicles: Vec<VehicleResponse>,
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = VehicleResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Plate already registered", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<Created<VehicleResponse>, ApiError> {
    let Json(request) = payload?;

    let vehicle = VehicleRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewVehicle {
                plate: request.plate,
                description: request.description,
                capacity_kg: request.capacity_kg,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/vehicles/{}", vehicle.id),
        vehicle.into(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Vehicles by plate", body = VehiclesResponse)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<VehiclesResponse>, ApiError> {
    let vehicles = VehicleRepository::new(&state.db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(VehiclesResponse {
        vehicles: vehicles.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Vehicle UUID")),
    responses(
        (status = 200, description = "Vehicle found", body = VehicleResponse),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let vehicle = VehicleRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(vehicle, "Vehicle", id)?.into()))
}
