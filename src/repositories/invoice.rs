//! Storage shared by the purchase and sale books.
//!
//! Both invoice tables have the same shape. [`InvoiceBook`] names what differs
//! between them (table, catalog price, labels) and [`InvoiceRepository`]
//! implements the tenant-scoped operations once for both.

use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
    entity::prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::invoice_lines::{NewInvoice, PreparedInvoice, PriceSide, prepare_invoice};
use crate::error::RepositoryError;
use crate::models::invoice::InvoiceStatus;

/// An invoice table: purchases or sales.
pub trait InvoiceBook: EntityTrait {
    /// Catalog price copied into each line
    const SIDE: PriceSide;
    /// Name used in error messages, e.g. "Purchase invoice"
    const LABEL: &'static str;
    const TENANT_ID: Self::Column;
    const ISSUED_AT: Self::Column;
    const CREATED_AT: Self::Column;

    /// A new pending row for `invoice`.
    fn draft(
        tenant_id: Uuid,
        invoice: PreparedInvoice,
        now: DateTimeWithTimeZone,
    ) -> Self::ActiveModel;

    fn status_of(model: &Self::Model) -> InvoiceStatus;

    /// `model` moved to `status`.
    fn restate(
        model: Self::Model,
        status: InvoiceStatus,
        now: DateTimeWithTimeZone,
    ) -> Self::ActiveModel;
}

pub struct InvoiceRepository<'a, B> {
    db: &'a DatabaseConnection,
    book: PhantomData<fn() -> B>,
}

impl<'a, B> InvoiceRepository<'a, B>
where
    B: InvoiceBook,
    B::Model: IntoActiveModel<B::ActiveModel>,
    B::ActiveModel: ActiveModelBehavior + Send,
    <B::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            book: PhantomData,
        }
    }

    /// Prices the lines from the tenant's catalog and stores a pending invoice.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewInvoice,
    ) -> Result<B::Model, RepositoryError> {
        let prepared = prepare_invoice(self.db, tenant_id, B::SIDE, input).await?;

        B::draft(tenant_id, prepared, Utc::now().into())
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<B::Model>, RepositoryError> {
        B::find_by_id(id)
            .filter(B::TENANT_ID.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// All invoices of the book, newest first
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<B::Model>, RepositoryError> {
        self.newest_first(tenant_id, None).await
    }

    /// At most `limit` invoices, newest issue date first
    pub async fn recent(
        &self,
        tenant_id: Uuid,
        limit: u64,
    ) -> Result<Vec<B::Model>, RepositoryError> {
        self.newest_first(tenant_id, Some(limit)).await
    }

    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<B::Model, RepositoryError> {
        let existing = self
            .get(tenant_id, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("{} {id} not found", B::LABEL)))?;

        let current = B::status_of(&existing);
        if !current.can_transition_to(status) {
            return Err(RepositoryError::validation_error(format!(
                "cannot move invoice from {current:?} to {status:?}"
            )));
        }

        B::restate(existing, status, Utc::now().into())
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    async fn newest_first(
        &self,
        tenant_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<B::Model>, RepositoryError> {
        B::find()
            .filter(B::TENANT_ID.eq(tenant_id))
            .order_by_desc(B::ISSUED_AT)
            .order_by_desc(B::CREATED_AT)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
