//! Migration to create the company_profiles table.
//!
//! One profile row per tenant, keyed by the tenant id itself.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyProfiles::TenantId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyProfiles::CompanyName).text().not_null())
                    .col(ColumnDef::new(CompanyProfiles::TaxId).text().null())
                    .col(ColumnDef::new(CompanyProfiles::Email).text().null())
                    .col(ColumnDef::new(CompanyProfiles::Phone).text().null())
                    .col(ColumnDef::new(CompanyProfiles::Address).text().null())
                    .col(ColumnDef::new(CompanyProfiles::City).text().null())
                    .col(ColumnDef::new(CompanyProfiles::LogoUrl).text().null())
                    .col(
                        ColumnDef::new(CompanyProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CompanyProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_profiles_tenant_id")
                            .from(CompanyProfiles::Table, CompanyProfiles::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompanyProfiles {
    Table,
    TenantId,
    CompanyName,
    TaxId,
    Email,
    Phone,
    Address,
    City,
    LogoUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
