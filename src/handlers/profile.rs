//! # Company Profile Handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::types::found;
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::ApiError;
use crate::models::company_profile;
use crate::repositories::{CompanyProfileRepository, ProfileFields};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileRequest {
    #[schema(example = "Reciclajes del Valle S.A.S.")]
    pub company_name: String,
    /// Tax identification number (NIT)
    #[schema(example = "900123456-7")]
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub company_name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<company_profile::Model> for ProfileResponse {
    fn from(profile: company_profile::Model) -> Self {
        Self {
            company_name: profile.company_name,
            tax_id: profile.tax_id,
            email: profile.email,
            phone: profile.phone,
            address: profile.address,
            city: profile.city,
            logo_url: profile.logo_url,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Get the company profile of the calling tenant
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Company profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 404, description = "Profile not set up yet", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = CompanyProfileRepository::new(&state.db)
        .get(tenant.as_uuid())
        .await?;

    Ok(Json(found(profile, "Company profile", tenant.as_uuid())?.into()))
}

/// Create or replace the company profile of the calling tenant
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn put_profile(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(request) = payload?;

    let profile = CompanyProfileRepository::new(&state.db)
        .upsert(
            tenant.as_uuid(),
            ProfileFields {
                company_name: request.company_name,
                tax_id: request.tax_id,
                email: request.email,
                phone: request.phone,
                address: request.address,
                city: request.city,
                logo_url: request.logo_url,
            },
        )
        .await?;

    Ok(Json(profile.into()))
}
