//! Migration to create the collaborators, vehicles and associates tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
}

fn tenant_fk(name: &str, table: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, Audit::TenantId)
        .to(Tenants::Table, Tenants::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut collaborators = Table::create();
        collaborators
            .table(Collaborators::Table)
            .if_not_exists()
            .col(ColumnDef::new(Collaborators::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Audit::TenantId).uuid().not_null())
            .col(ColumnDef::new(Collaborators::FullName).text().not_null())
            .col(ColumnDef::new(Collaborators::DocumentId).text().not_null())
            .col(ColumnDef::new(Collaborators::Role).text().not_null())
            .col(ColumnDef::new(Collaborators::Phone).text().null())
            .col(ColumnDef::new(Collaborators::Email).text().null())
            .col(
                ColumnDef::new(Collaborators::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut collaborators)
            .foreign_key(&mut tenant_fk(
                "fk_collaborators_tenant_id",
                Collaborators::Table,
            ));
        manager.create_table(collaborators).await?;

        let mut vehicles = Table::create();
        vehicles
            .table(Vehicles::Table)
            .if_not_exists()
            .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Audit::TenantId).uuid().not_null())
            .col(ColumnDef::new(Vehicles::Plate).text().not_null())
            .col(ColumnDef::new(Vehicles::Description).text().null())
            .col(ColumnDef::new(Vehicles::CapacityKg).double().null())
            .col(
                ColumnDef::new(Vehicles::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut vehicles)
            .foreign_key(&mut tenant_fk("fk_vehicles_tenant_id", Vehicles::Table));
        manager.create_table(vehicles).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_tenant_plate")
                    .table(Vehicles::Table)
                    .col(Audit::TenantId)
                    .col(Vehicles::Plate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut associates = Table::create();
        associates
            .table(Associates::Table)
            .if_not_exists()
            .col(ColumnDef::new(Associates::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Audit::TenantId).uuid().not_null())
            .col(ColumnDef::new(Associates::Name).text().not_null())
            .col(ColumnDef::new(Associates::DocumentId).text().null())
            .col(ColumnDef::new(Associates::Phone).text().null())
            .col(ColumnDef::new(Associates::Address).text().null())
            .col(
                ColumnDef::new(Associates::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        timestamps(&mut associates)
            .foreign_key(&mut tenant_fk("fk_associates_tenant_id", Associates::Table));
        manager.create_table(associates).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_vehicles_tenant_plate").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Associates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collaborators::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Audit {
    TenantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Collaborators {
    Table,
    Id,
    FullName,
    DocumentId,
    Role,
    Phone,
    Email,
    Active,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Plate,
    Description,
    CapacityKg,
    Active,
}

#[derive(DeriveIden)]
enum Associates {
    Table,
    Id,
    Name,
    DocumentId,
    Phone,
    Address,
    Active,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
