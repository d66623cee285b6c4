//! Collection entity model
//!
//! A collection is a pickup of material at a source point (a household,
//! business or collection center), optionally tied to a vehicle and the
//! collaborator who performed it.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Where the material was picked up
    pub source_point: String,
    pub material_id: Uuid,
    /// Material name copied at write time
    pub material_name: String,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    pub collected_at: DateTimeWithTimeZone,
    pub vehicle_id: Option<Uuid>,
    pub collaborator_id: Option<Uuid>,
    pub notes: Option<String>,
    pub status: CollectionStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Lifecycle state of a collection
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl CollectionStatus {
    /// Only scheduled collections can change state.
    pub fn can_transition_to(self, next: CollectionStatus) -> bool {
        self == CollectionStatus::Scheduled && next != CollectionStatus::Scheduled
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
