//! # Sale Invoice Handlers

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
use crate::models::sale_invoice::Entity as SaleInvoice;
use crate::server::AppState;

/// Record a sale; lines are priced from the catalog's sale price
#[utoipa::path(
    post,
    path = "/api/v1/sale-invoices",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Sale invoice created", body = InvoiceResponse),
        (status = 400, description = "Validation failed or unknown material", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "sale-invoices"
)]
pub async fn create_sale_invoice(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<Created<InvoiceResponse>, ApiError> {
    invoices::create::<SaleInvoice>(&state.db, tenant, "/api/v1/sale-invoices", payload).await
}

/// List sales, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sale-invoices",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Sale invoices of the tenant", body = InvoicesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "sale-invoices"
)]
pub async fn list_sale_invoices(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<InvoicesResponse>, ApiError> {
    invoices::list::<SaleInvoice>(&state.db, tenant).await
}

#[utoipa::path(
    get,
    path = "/api/v1/sale-invoices/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Invoice UUID")),
    responses(
        (status = 200, description = "Sale invoice found", body = InvoiceResponse),
        (status = 404, description = "Sale invoice not found", body = ApiError)
    ),
    tag = "sale-invoices"
)]
pub async fn get_sale_invoice(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    invoices::get::<SaleInvoice>(&state.db, tenant, id).await
}

/// Mark a sale as paid or cancelled
#[utoipa::path(
    patch,
    path = "/api/v1/sale-invoices/{id}/status",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Invoice UUID")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = InvoiceResponse),
        (status = 400, description = "Transition not allowed", body = ApiError),
        (status = 404, description = "Sale invoice not found", body = ApiError)
    ),
    tag = "sale-invoices"
)]
pub async fn update_sale_invoice_status(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateInvoiceStatusRequest>, JsonRejection>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    invoices::update_status::<SaleInvoice>(&state.db, tenant, id, payload).await
}
