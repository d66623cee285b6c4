//! Migration to create the materials table.
//!
//! Materials form the per-tenant catalog and carry the current stock level
//! used by the inventory listing.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Materials::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Materials::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Materials::Name).text().not_null())
                    .col(ColumnDef::new(Materials::Category).text().null())
                    .col(
                        ColumnDef::new(Materials::Unit)
                            .text()
                            .not_null()
                            .default("kg"),
                    )
                    .col(
                        ColumnDef::new(Materials::PurchasePrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Materials::SalePrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Materials::Stock)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Materials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Materials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_materials_tenant_id")
                            .from(Materials::Table, Materials::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_materials_tenant_stock ON materials (tenant_id, stock DESC)".to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_materials_tenant_stock").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Materials {
    Table,
    Id,
    TenantId,
    Name,
    Category,
    Unit,
    PurchasePrice,
    SalePrice,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
