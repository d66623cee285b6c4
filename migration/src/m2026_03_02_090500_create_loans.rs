//! Migration to create the loans and loan_payments tables.
//!
//! A loan carries its outstanding `balance`; each payment row reduces it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Loans::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Loans::CollaboratorId).uuid().not_null())
                    .col(ColumnDef::new(Loans::Amount).double().not_null())
                    .col(ColumnDef::new(Loans::Balance).double().not_null())
                    .col(ColumnDef::new(Loans::Reason).text().null())
                    .col(
                        ColumnDef::new(Loans::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Loans::Status)
                            .text()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Loans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Loans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loans_tenant_id")
                            .from(Loans::Table, Loans::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoanPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoanPayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoanPayments::TenantId).uuid().not_null())
                    .col(ColumnDef::new(LoanPayments::LoanId).uuid().not_null())
                    .col(ColumnDef::new(LoanPayments::Amount).double().not_null())
                    .col(
                        ColumnDef::new(LoanPayments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoanPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_payments_loan_id")
                            .from(LoanPayments::Table, LoanPayments::LoanId)
                            .to(Loans::Table, Loans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loan_payments_loan_paid")
                    .table(LoanPayments::Table)
                    .col(LoanPayments::LoanId)
                    .col(LoanPayments::PaidAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_loan_payments_loan_paid").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LoanPayments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Loans {
    Table,
    Id,
    TenantId,
    CollaboratorId,
    Amount,
    Balance,
    Reason,
    IssuedAt,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LoanPayments {
    Table,
    Id,
    TenantId,
    LoanId,
    Amount,
    PaidAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
