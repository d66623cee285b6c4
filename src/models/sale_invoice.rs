//! Sale invoice entity model
//!
//! This module contains the SeaORM entity model for the sale_invoices table.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::invoice::{InvoiceLines, InvoiceStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sale_invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Human-facing invoice number
    pub invoice_number: String,

    /// Customer the material was sold to
    pub counterparty: String,

    /// Date the invoice was issued; drives the most-recent listings
    pub issued_at: DateTimeWithTimeZone,

    /// Denormalized invoice lines
    #[sea_orm(column_type = "JsonBinary")]
    pub lines: InvoiceLines,

    /// Sum of line subtotals
    #[sea_orm(column_type = "Double")]
    pub total: f64,

    pub status: InvoiceStatus,

    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
