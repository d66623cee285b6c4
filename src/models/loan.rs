//! Loan entity model
//!
//! A loan advanced to a collaborator. `balance` starts at `amount` and is
//! reduced by each recorded payment; it reaches `paid` at zero.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub collaborator_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    /// Outstanding amount
    #[sea_orm(column_type = "Double")]
    pub balance: f64,
    pub reason: Option<String>,
    pub issued_at: DateTimeWithTimeZone,
    pub status: LoanStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paid")]
    Paid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan_payment::Entity")]
    Payments,
    #[sea_orm(
        belongs_to = "super::collaborator::Entity",
        from = "Column::CollaboratorId",
        to = "super::collaborator::Column::Id"
    )]
    Collaborator,
}

impl Related<super::loan_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::collaborator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collaborator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
