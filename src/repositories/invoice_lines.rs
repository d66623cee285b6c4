//! Invoice preparation shared by the purchase and sale repositories.
//!
//! Lines arrive as `(material_id, quantity)` pairs. The material's current
//! name and price are copied into each line so the stored invoice no longer
//! depends on the catalog.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::{MaterialRepository, optional_text, positive, required_text};
use crate::error::RepositoryError;
use crate::models::invoice::{InvoiceLine, InvoiceLines};
use crate::models::material;

#[derive(Debug, Clone)]
pub struct LineInput {
    pub material_id: Uuid,
    pub quantity: f64,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    /// Supplier for purchases, customer for sales
    pub counterparty: String,
    /// Defaults to now when absent
    pub issued_at: Option<DateTime<Utc>>,
    pub lines: Vec<LineInput>,
    pub notes: Option<String>,
}

/// Which catalog price a line copies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSide {
    Purchase,
    Sale,
}

impl PriceSide {
    fn price_of(self, material: &material::Model) -> f64 {
        match self {
            PriceSide::Purchase => material.purchase_price,
            PriceSide::Sale => material.sale_price,
        }
    }
}

/// A validated invoice ready to insert
#[derive(Debug, Clone)]
pub struct PreparedInvoice {
    pub invoice_number: String,
    pub counterparty: String,
    pub issued_at: DateTime<Utc>,
    pub lines: InvoiceLines,
    pub total: f64,
    pub notes: Option<String>,
}

pub(crate) async fn prepare_invoice(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    side: PriceSide,
    input: NewInvoice,
) -> Result<PreparedInvoice, RepositoryError> {
    let invoice_number = required_text("invoice_number", &input.invoice_number)?;
    let counterparty = required_text("counterparty", &input.counterparty)?;

    if input.lines.is_empty() {
        return Err(RepositoryError::validation_error(
            "invoice must have at least one line",
        ));
    }

    let ids: Vec<Uuid> = input.lines.iter().map(|line| line.material_id).collect();
    let materials: HashMap<Uuid, material::Model> = MaterialRepository::new(db)
        .find_many(tenant_id, &ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut lines = Vec::with_capacity(input.lines.len());
    for line in input.lines {
        let quantity = positive("quantity", line.quantity)?;
        let material = materials.get(&line.material_id).ok_or_else(|| {
            RepositoryError::validation_error(format!(
                "material {} does not exist",
                line.material_id
            ))
        })?;
        let unit_price = side.price_of(material);
        let subtotal = finite_amount("line subtotal", quantity * unit_price)?;

        lines.push(InvoiceLine {
            material_id: material.id,
            material_name: material.name.clone(),
            quantity,
            unit_price,
            subtotal,
        });
    }

    let lines = InvoiceLines(lines);
    let total = finite_amount("invoice total", lines.total())?;

    Ok(PreparedInvoice {
        invoice_number,
        counterparty,
        issued_at: input.issued_at.unwrap_or_else(Utc::now),
        lines,
        total,
        notes: optional_text(input.notes),
    })
}

fn finite_amount(what: &str, value: f64) -> Result<f64, RepositoryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RepositoryError::validation_error(format!(
            "{what} is too large to record"
        )))
    }
}
