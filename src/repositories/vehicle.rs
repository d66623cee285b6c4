//! Vehicle repository
//!
//! Plates are normalized to upper case without spaces and are unique per
//! tenant; a duplicate surfaces as a unique violation from the database.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{non_negative, optional_text, required_text};
use crate::error::RepositoryError;
use crate::models::vehicle::{self, Entity as Vehicle};

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub plate: String,
    pub description: Option<String>,
    pub capacity_kg: Option<f64>,
}

pub struct VehicleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VehicleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewVehicle,
    ) -> Result<vehicle::Model, RepositoryError> {
        let plate: String = required_text("plate", &input.plate)?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        let capacity_kg = input
            .capacity_kg
            .map(|capacity| non_negative("capacity_kg", capacity))
            .transpose()?;

        let now = Utc::now();
        let vehicle = vehicle::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            plate: Set(plate),
            description: Set(optional_text(input.description)),
            capacity_kg: Set(capacity_kg),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        vehicle
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<vehicle::Model>, RepositoryError> {
        Vehicle::find_by_id(id)
            .filter(vehicle::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<vehicle::Model>, RepositoryError> {
        Vehicle::find()
            .filter(vehicle::Column::TenantId.eq(tenant_id))
            .order_by_asc(vehicle::Column::Plate)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
