//! Read-only queries the assistant tools expose.
//!
//! Records are trimmed to what the model needs to answer; ids and audit
//! timestamps stay out of the prompt.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::invoice::{InvoiceLines, InvoiceStatus};
use crate::models::{material, purchase_invoice, sale_invoice};
use crate::repositories::{MaterialRepository, PurchaseInvoiceRepository, SaleInvoiceRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub stock: f64,
    pub purchase_price: f64,
    pub sale_price: f64,
}

impl From<material::Model> for InventoryItem {
    fn from(material: material::Model) -> Self {
        Self {
            name: material.name,
            category: material.category,
            unit: material.unit,
            stock: material.stock,
            purchase_price: material.purchase_price,
            sale_price: material.sale_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub invoice_number: String,
    pub counterparty: String,
    /// Issue date as `YYYY-MM-DD`
    pub date: String,
    pub total: f64,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    pub material: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

fn items(lines: InvoiceLines) -> Vec<InvoiceItem> {
    lines
        .0
        .into_iter()
        .map(|line| InvoiceItem {
            material: line.material_name,
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
        })
        .collect()
}

// Both books store the same columns.
macro_rules! invoice_summary_from {
    ($($model:ty),+) => {$(
        impl From<$model> for InvoiceSummary {
            fn from(invoice: $model) -> Self {
                Self {
                    invoice_number: invoice.invoice_number,
                    counterparty: invoice.counterparty,
                    date: invoice.issued_at.format("%Y-%m-%d").to_string(),
                    total: invoice.total,
                    status: invoice.status,
                    items: items(invoice.lines),
                }
            }
        }
    )+};
}

invoice_summary_from!(purchase_invoice::Model, sale_invoice::Model);

/// The tenant's materials, highest stock first
pub async fn list_inventory(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<Vec<InventoryItem>, RepositoryError> {
    let materials = MaterialRepository::new(db)
        .list_by_stock_desc(tenant_id)
        .await?;
    Ok(materials.into_iter().map(InventoryItem::from).collect())
}

/// At most `limit` purchase invoices, newest first
pub async fn recent_purchases(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    limit: u64,
) -> Result<Vec<InvoiceSummary>, RepositoryError> {
    let invoices = PurchaseInvoiceRepository::new(db)
        .recent(tenant_id, limit)
        .await?;
    Ok(invoices.into_iter().map(InvoiceSummary::from).collect())
}

/// At most `limit` sale invoices, newest first
pub async fn recent_sales(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    limit: u64,
) -> Result<Vec<InvoiceSummary>, RepositoryError> {
    let invoices = SaleInvoiceRepository::new(db)
        .recent(tenant_id, limit)
        .await?;
    Ok(invoices.into_iter().map(InvoiceSummary::from).collect())
}
