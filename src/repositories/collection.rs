//! Collection repository
//!
//! Collections reference a material, and optionally a vehicle and a
//! collaborator, all of which must belong to the same tenant when the
//! collection is written.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{CollaboratorRepository, MaterialRepository, VehicleRepository};
use super::{optional_text, positive, required_text};
use crate::error::RepositoryError;
use crate::models::collection::{self, CollectionStatus, Entity as Collection};

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub source_point: String,
    pub material_id: Uuid,
    pub weight: f64,
    pub collected_at: Option<DateTime<Utc>>,
    pub vehicle_id: Option<Uuid>,
    pub collaborator_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub struct CollectionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CollectionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewCollection,
    ) -> Result<collection::Model, RepositoryError> {
        let source_point = required_text("source_point", &input.source_point)?;
        let weight = positive("weight", input.weight)?;

        let material = MaterialRepository::new(self.db)
            .get(tenant_id, input.material_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::validation_error(format!(
                    "material {} does not exist",
                    input.material_id
                ))
            })?;

        if let Some(vehicle_id) = input.vehicle_id
            && VehicleRepository::new(self.db)
                .get(tenant_id, vehicle_id)
                .await?
                .is_none()
        {
            return Err(RepositoryError::validation_error(format!(
                "vehicle {vehicle_id} does not exist"
            )));
        }

        if let Some(collaborator_id) = input.collaborator_id
            && CollaboratorRepository::new(self.db)
                .get(tenant_id, collaborator_id)
                .await?
                .is_none()
        {
            return Err(RepositoryError::validation_error(format!(
                "collaborator {collaborator_id} does not exist"
            )));
        }

        let now = Utc::now();
        let collection = collection::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            source_point: Set(source_point),
            material_id: Set(material.id),
            material_name: Set(material.name),
            weight: Set(weight),
            collected_at: Set(input.collected_at.unwrap_or(now).into()),
            vehicle_id: Set(input.vehicle_id),
            collaborator_id: Set(input.collaborator_id),
            notes: Set(optional_text(input.notes)),
            status: Set(CollectionStatus::Scheduled),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        collection
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<collection::Model>, RepositoryError> {
        Collection::find_by_id(id)
            .filter(collection::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<collection::Model>, RepositoryError> {
        Collection::find()
            .filter(collection::Column::TenantId.eq(tenant_id))
            .order_by_desc(collection::Column::CollectedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: CollectionStatus,
    ) -> Result<collection::Model, RepositoryError> {
        let existing = self
            .get(tenant_id, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Collection {id} not found")))?;

        if !existing.status.can_transition_to(status) {
            return Err(RepositoryError::validation_error(format!(
                "cannot move collection from {:?} to {:?}",
                existing.status, status
            )));
        }

        let mut active = existing.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
