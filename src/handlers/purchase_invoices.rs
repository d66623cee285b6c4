//! # Purchase Invoice Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use uuid::Uuid;

use super::invoices;
use super::types::{
    CreateInvoiceRequest, Created, InvoiceResponse, InvoicesResponse, UpdateInvoiceStatusRequest,
};
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::ApiError;
use crate::models::purchase_invoice::Entity as PurchaseInvoice;
use crate::server::AppState;

/// Record a purchase; lines are priced from the catalog's purchase price
#[utoipa::path(
    post,
    path = "/api/v1/purchase-invoices",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Purchase invoice created", body = InvoiceResponse),
        (status = 400, description = "Validation failed or unknown material", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "purchase-invoices"
)]
pub async fn create_purchase_invoice(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<Created<InvoiceResponse>, ApiError> {
    invoices::create::<PurchaseInvoice>(&state.db, tenant, "/api/v1/purchase-invoices", payload).await
}

/// List purchases, newest first
#[utoipa::path(
    get,
    path = "/api/v1/purchase-invoices",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Purchase invoices of the tenant", body = InvoicesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "purchase-invoices"
)]
pub async fn list_purchase_invoices(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<InvoicesResponse>, ApiError> {
    invoices::list::<PurchaseInvoice>(&state.db, tenant).await
}

#[utoipa::path(
    get,
    path = "/api/v1/purchase-invoices/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Invoice UUID")),
    responses(
        (status = 200, description = "Purchase invoice found", body = InvoiceResponse),
        (status = 404, description = "Purchase invoice not found", body = ApiError)
    ),
    tag = "purchase-invoices"
)]
pub async fn get_purchase_invoice(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    invoices::get::<PurchaseInvoice>(&state.db, tenant, id).await
}

/// Mark a purchase as paid or cancelled
#[utoipa::path(
    patch,
    path = "/api/v1/purchase-invoices/{id}/status",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Invoice UUID")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = InvoiceResponse),
        (status = 400, description = "Transition not allowed", body = ApiError),
        (status = 404, description = "Purchase invoice not found", body = ApiError)
    ),
    tag = "purchase-invoices"
)]
pub async fn update_purchase_invoice_status(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateInvoiceStatusRequest>, JsonRejection>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    invoices::update_status::<PurchaseInvoice>(&state.db, tenant, id, payload).await
}
