//! Sale invoice repository
//!
//! Sales record material sold to customers. Lines are priced with the
//! material's `sale_price` at the time of writing.

use sea_orm::{IntoActiveModel, Set, entity::prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use super::invoice::{InvoiceBook, InvoiceRepository};
use super::invoice_lines::{PreparedInvoice, PriceSide};
use crate::models::invoice::InvoiceStatus;
use crate::models::sale_invoice::{self, Column, Entity as SaleInvoice};

pub type SaleInvoiceRepository<'a> = InvoiceRepository<'a, SaleInvoice>;

impl InvoiceBook for SaleInvoice {
    const SIDE: PriceSide = PriceSide::Sale;
    const LABEL: &'static str = "Sale invoice";
    const TENANT_ID: Column = Column::TenantId;
    const ISSUED_AT: Column = Column::IssuedAt;
    const CREATED_AT: Column = Column::CreatedAt;

    fn draft(
        tenant_id: Uuid,
        invoice: PreparedInvoice,
        now: DateTimeWithTimeZone,
    ) -> sale_invoice::ActiveModel {
        sale_invoice::ActiveModel {
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

    fn status_of(model: &sale_invoice::Model) -> InvoiceStatus {
        model.status
    }

    fn restate(
        model: sale_invoice::Model,
        status: InvoiceStatus,
        now: DateTimeWithTimeZone,
    ) -> sale_invoice::ActiveModel {
        let mut active = model.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(now);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repositories::invoice_lines::{LineInput, NewInvoice};
    use sea_orm::DatabaseConnection;
    use crate::repositories::test_support::{create_tenant, setup_test_db};
    use crate::repositories::{MaterialRepository, NewMaterial};

    async fn seed_material(db: &DatabaseConnection, tenant: Uuid) -> Uuid {
        MaterialRepository::new(db)
            .create(
                tenant,
                NewMaterial {
                    name: "Vidrio".to_string(),
                    category: None,
                    unit: None,
                    purchase_price: 150.0,
                    sale_price: 260.0,
                    stock: 80.0,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn sale(material_id: Uuid) -> NewInvoice {
        NewInvoice {
            invoice_number: "V-100".to_string(),
            counterparty: "Vidriera Andina".to_string(),
            issued_at: None,
            lines: vec![LineInput {
                material_id,
                quantity: 20.0,
            }],
            notes: Some("  entrega en planta ".to_string()),
        }
    }

    #[tokio::test]
    async fn create_uses_sale_price() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let material = seed_material(&db, tenant).await;
        let repo = SaleInvoiceRepository::new(&db);

        let invoice = repo.create(tenant, sale(material)).await.unwrap();
        assert_eq!(invoice.total, 5200.0);
        assert_eq!(invoice.notes.as_deref(), Some("entrega en planta"));
    }

    #[tokio::test]
    async fn listings_are_tenant_scoped() {
        let db = setup_test_db().await;
        let owner = create_tenant(&db, "Owner").await;
        let other = create_tenant(&db, "Other").await;
        let material = seed_material(&db, owner).await;
        let repo = SaleInvoiceRepository::new(&db);

        let invoice = repo.create(owner, sale(material)).await.unwrap();

        assert_eq!(repo.recent(owner, 5).await.unwrap().len(), 1);
        assert!(repo.recent(other, 5).await.unwrap().is_empty());
        assert!(repo.list(other).await.unwrap().is_empty());
        assert!(repo.get(other, invoice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancelled_sale_cannot_be_reopened() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let material = seed_material(&db, tenant).await;
        let repo = SaleInvoiceRepository::new(&db);
        let invoice = repo.create(tenant, sale(material)).await.unwrap();

        repo.update_status(tenant, invoice.id, InvoiceStatus::Cancelled)
            .await
            .unwrap();
        let result = repo
            .update_status(tenant, invoice.id, InvoiceStatus::Paid)
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }
}
