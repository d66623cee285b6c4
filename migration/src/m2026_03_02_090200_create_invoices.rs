//! Migration to create the purchase_invoices and sale_invoices tables.
//!
//! Both tables share one shape: invoice lines are stored denormalized as a
//! JSON array, and `issued_at` drives the most-recent listings.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

const INVOICE_TABLES: [&str; 2] = ["purchase_invoices", "sale_invoices"];

#[derive(DeriveMigrationName)]
pub struct Migration;

fn invoice_table(table: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Invoice::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Invoice::TenantId).uuid().not_null())
        .col(ColumnDef::new(Invoice::InvoiceNumber).text().not_null())
        .col(ColumnDef::new(Invoice::Counterparty).text().not_null())
        .col(
            ColumnDef::new(Invoice::IssuedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Invoice::Lines).json_binary().not_null())
        .col(ColumnDef::new(Invoice::Total).double().not_null())
        .col(
            ColumnDef::new(Invoice::Status)
                .text()
                .not_null()
                .default("pending"),
        )
        .col(ColumnDef::new(Invoice::Notes).text().null())
        .col(
            ColumnDef::new(Invoice::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Invoice::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_tenant_id"))
                .from(Alias::new(table), Invoice::TenantId)
                .to(Tenants::Table, Tenants::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in INVOICE_TABLES {
            manager.create_table(invoice_table(table)).await?;

            manager
                .get_connection()
                .execute(Statement::from_string(
                    manager.get_database_backend(),
                    format!(
                        "CREATE INDEX IF NOT EXISTS idx_{table}_tenant_issued ON {table} (tenant_id, issued_at DESC)"
                    ),
                ))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in INVOICE_TABLES {
            manager
                .drop_index(
                    Index::drop()
                        .name(format!("idx_{table}_tenant_issued"))
                        .to_owned(),
                )
                .await?;

            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Invoice {
    Id,
    TenantId,
    InvoiceNumber,
    Counterparty,
    IssuedAt,
    Lines,
    Total,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
