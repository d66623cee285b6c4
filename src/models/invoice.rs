//! Types shared by the purchase and sale invoice entities.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single invoice line. Name and price are copied from the material when
/// the invoice is written, so later catalog edits do not rewrite history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceLine {
    #[schema(value_type = String)]
    pub material_id: Uuid,
    pub material_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// JSON column wrapper for invoice lines
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct InvoiceLines(pub Vec<InvoiceLine>);

impl InvoiceLines {
    /// Sum of all line subtotals
    pub fn total(&self) -> f64 {
        self.0.iter().map(|line| line.subtotal).sum()
    }
}

/// Lifecycle state of an invoice
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl InvoiceStatus {
    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Cancelled invoices are final; a paid invoice can still be cancelled.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        match (self, next) {
            (InvoiceStatus::Cancelled, _) => false,
            (current, next) if current == next => false,
            (InvoiceStatus::Paid, InvoiceStatus::Pending) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(subtotal: f64) -> InvoiceLine {
        InvoiceLine {
            material_id: Uuid::new_v4(),
            material_name: "PET".to_string(),
            quantity: 1.0,
            unit_price: subtotal,
            subtotal,
        }
    }

    #[test]
    fn total_sums_line_subtotals() {
        let lines = InvoiceLines(vec![line(1200.0), line(800.5)]);
        assert_eq!(lines.total(), 2000.5);
        assert_eq!(InvoiceLines::default().total(), 0.0);
    }

    #[test]
    fn cancelled_is_final() {
        assert!(!InvoiceStatus::Cancelled.can_transition_to(InvoiceStatus::Pending));
        assert!(!InvoiceStatus::Cancelled.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Cancelled));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Pending));
        assert!(!InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Pending));
    }
}
