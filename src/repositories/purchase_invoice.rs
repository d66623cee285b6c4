//! Purchase invoice repository
//!
//! Purchases record material bought from suppliers and associates. Lines are
//! priced with the material's `purchase_price` at the time of writing.

use sea_orm::{IntoActiveModel, Set, entity::prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use super::invoice::{InvoiceBook, InvoiceRepository};
use super::invoice_lines::{PreparedInvoice, PriceSide};
use crate::models::invoice::InvoiceStatus;
use crate::models::purchase_invoice::{self, Column, Entity as PurchaseInvoice};

pub type PurchaseInvoiceRepository<'a> = InvoiceRepository<'a, PurchaseInvoice>;

impl InvoiceBook for PurchaseInvoice {
    const SIDE: PriceSide = PriceSide::Purchase;
    const LABEL: &'static str = "Purchase invoice";
    const TENANT_ID: Column = Column::TenantId;
    const ISSUED_AT: Column = Column::IssuedAt;
    const CREATED_AT: Column = Column::CreatedAt;

    fn draft(
        tenant_id: Uuid,
        invoice: PreparedInvoice,
        now: DateTimeWithTimeZone,
    ) -> purchase_invoice::ActiveModel {
        purchase_invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            invoice_number: Set(invoice.invoice_number),
            counterparty: Set(invoice.counterparty),
            issued_at: Set(invoice.issued_at.into()),
            lines: Set(invoice.lines),
            total: Set(invoice.total),
            status: Set(InvoiceStatus::Pending),
            notes: Set(invoice.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn status_of(model: &purchase_invoice::Model) -> InvoiceStatus {
        model.status
    }

    fn restate(
        model: purchase_invoice::Model,
        status: InvoiceStatus,
        now: DateTimeWithTimeZone,
    ) -> purchase_invoice::ActiveModel {
        let mut active = model.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(now);
        active
    }
}
