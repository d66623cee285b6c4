//! Migration to create the collections table.
//!
//! A collection records material picked up at a source point.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Collections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Collections::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Collections::SourcePoint).text().not_null())
                    .col(ColumnDef::new(Collections::MaterialId).uuid().not_null())
                    .col(ColumnDef::new(Collections::MaterialName).text().not_null())
                    .col(ColumnDef::new(Collections::Weight).double().not_null())
                    .col(
                        ColumnDef::new(Collections::CollectedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Collections::VehicleId).uuid().null())
                    .col(ColumnDef::new(Collections::CollaboratorId).uuid().null())
                    .col(ColumnDef::new(Collections::Notes).text().null())
                    .col(
                        ColumnDef::new(Collections::Status)
                            .text()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(Collections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Collections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collections_tenant_id")
                            .from(Collections::Table, Collections::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_collections_tenant_collected")
                    .table(Collections::Table)
                    .col(Collections::TenantId)
                    .col(Collections::CollectedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_collections_tenant_collected")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Collections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
    TenantId,
    SourcePoint,
    MaterialId,
    MaterialName,
    Weight,
    CollectedAt,
    VehicleId,
    CollaboratorId,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
