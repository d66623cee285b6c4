//! # Common API Types
//!
//! Shared request/response pieces used by several handler modules.

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, not_found};
use crate::models::invoice::{InvoiceLine, InvoiceStatus};
use crate::models::{purchase_invoice, sale_invoice};
use crate::repositories::{LineInput, NewInvoice};

/// `201 Created` with a `Location` header
pub type Created<T> = (StatusCode, [(&'static str, String); 1], Json<T>);

pub fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [("Location", location)], Json(body))
}

/// Turn a tenant-scoped lookup miss into a 404
pub fn found<T>(value: Option<T>, resource: &str, id: Uuid) -> Result<T, ApiError> {
    value.ok_or_else(|| not_found(resource, id))
}

/// Request payload for creating a purchase or sale invoice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    #[schema(example = "FC-0001")]
    pub invoice_number: String,
    /// Supplier (purchases) or customer (sales)
    #[schema(example = "Bodega El Progreso")]
    pub counterparty: String,
    /// Issue date; defaults to now
    pub issued_at: Option<DateTime<Utc>>,
    pub lines: Vec<InvoiceLineRequest>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceLineRequest {
    pub material_id: Uuid,
    #[schema(example = 125.5)]
    pub quantity: f64,
}

impl From<CreateInvoiceRequest> for NewInvoice {
    fn from(request: CreateInvoiceRequest) -> Self {
        Self {
            invoice_number: request.invoice_number,
            counterparty: request.counterparty,
            issued_at: request.issued_at,
            lines: request
                .lines
                .into_iter()
                .map(|line| LineInput {
                    material_id: line.material_id,
                    quantity: line.quantity,
                })
                .collect(),
            notes: request.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

/// Purchase or sale invoice as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub counterparty: String,
    /// Issue timestamp (RFC 3339)
    pub issued_at: String,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

macro_rules! invoice_response_from {
    ($($model:ty),+) => {$(
        impl From<$model> for InvoiceResponse {
            fn from(invoice: $model) -> Self {
                Self {
                    id: invoice.id,
                    invoice_number: invoice.invoice_number,
                    counterparty: invoice.counterparty,
                    issued_at: invoice.issued_at.to_rfc3339(),
                    lines: invoice.lines.0,
                    total: invoice.total,
                    status: invoice.status,
                    notes: invoice.notes,
                    created_at: invoice.created_at.to_rfc3339(),
                    updated_at: invoice.updated_at.to_rfc3339(),
                }
            }
        }
    )+};
}

invoice_response_from!(purchase_invoice::Model, sale_invoice::Model);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoicesResponse {
    pub invoices: Vec<InvoiceResponse>,
}
