//! Material entity model
//!
//! This module contains the SeaORM entity model for the materials table,
//! the per-tenant catalog of recyclable materials and their stock levels.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Material entity representing one catalog entry
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    /// Unique identifier for the material (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Display name (e.g., "PET", "Cartón")
    pub name: String,

    /// Optional grouping such as plastics, paper or metals
    pub category: Option<String>,

    /// Unit the stock and prices are expressed in (default: kg)
    pub unit: String,

    /// Price paid per unit when buying from suppliers
    #[sea_orm(column_type = "Double")]
    pub purchase_price: f64,

    /// Price charged per unit when selling
    #[sea_orm(column_type = "Double")]
    pub sale_price: f64,

    /// Current stock level
    #[sea_orm(column_type = "Double")]
    pub stock: f64,

    /// Timestamp when the material was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the material was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
