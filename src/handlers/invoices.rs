//! Request flow shared by the purchase and sale invoice routes. The route
//! modules keep the OpenAPI annotations and pick the book.

use axum::{extract::rejection::JsonRejection, response::Json};
use sea_orm::{ActiveModelBehavior, DatabaseConnection, IntoActiveModel, PrimaryKeyTrait};
use uuid::Uuid;

use super::types::{
    CreateInvoiceRequest, Created, InvoiceResponse, InvoicesResponse, UpdateInvoiceStatusRequest,
    created, found,
};
use crate::auth::TenantId;
use crate::error::ApiError;
use crate::repositories::{InvoiceBook, InvoiceRepository};

pub(super) async fn create<B>(
    db: &DatabaseConnection,
    tenant: TenantId,
    collection_path: &str,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<Created<InvoiceResponse>, ApiError>
where
    B: InvoiceBook,
    B::Model: IntoActiveModel<B::ActiveModel> + Into<InvoiceResponse>,
    B::ActiveModel: ActiveModelBehavior + Send,
    <B::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let Json(request) = payload?;

    let invoice: InvoiceResponse = InvoiceRepository::<B>::new(db)
        .create(tenant.as_uuid(), request.into())
        .await?
        .into();

    tracing::info!(
        tenant_id = %tenant,
        invoice_id = %invoice.id,
        total = invoice.total,
        book = B::LABEL,
        "Invoice recorded"
    );

    Ok(created(format!("{collection_path}/{}", invoice.id), invoice))
}

pub(super) async fn list<B>(
    db: &DatabaseConnection,
    tenant: TenantId,
) -> Result<Json<InvoicesResponse>, ApiError>
where
    B: InvoiceBook,
    B::Model: IntoActiveModel<B::ActiveModel> + Into<InvoiceResponse>,
    B::ActiveModel: ActiveModelBehavior + Send,
    <B::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let invoices = InvoiceRepository::<B>::new(db)
        .list(tenant.as_uuid())
        .await?;

    Ok(Json(InvoicesResponse {
        invoices: invoices.into_iter().map(Into::into).collect(),
    }))
}

pub(super) async fn get<B>(
    db: &DatabaseConnection,
    tenant: TenantId,
    id: Uuid,
) -> Result<Json<InvoiceResponse>, ApiError>
where
    B: InvoiceBook,
    B::Model: IntoActiveModel<B::ActiveModel> + Into<InvoiceResponse>,
    B::ActiveModel: ActiveModelBehavior + Send,
    <B::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let invoice = InvoiceRepository::<B>::new(db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(invoice, B::LABEL, id)?.into()))
}

pub(super) async fn update_status<B>(
    db: &DatabaseConnection,
    tenant: TenantId,
    id: Uuid,
    payload: Result<Json<UpdateInvoiceStatusRequest>, JsonRejection>,
) -> Result<Json<InvoiceResponse>, ApiError>
where
    B: InvoiceBook,
    B::Model: IntoActiveModel<B::ActiveModel> + Into<InvoiceResponse>,
    B::ActiveModel: ActiveModelBehavior + Send,
    <B::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let Json(request) = payload?;

    let invoice = InvoiceRepository::<B>::new(db)
        .update_status(tenant.as_uuid(), id, request.status)
        .await?;

    Ok(Json(invoice.into()))
}
