//! Collaborator repository

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{optional_text, required_text};
use crate::error::RepositoryError;
use crate::models::collaborator::{self, Entity as Collaborator};

#[derive(Debug, Clone)]
pub struct NewCollaborator {
    pub full_name: String,
    pub document_id: String,
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollaboratorChanges {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

pub struct CollaboratorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CollaboratorRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewCollaborator,
    ) -> Result<collaborator::Model, RepositoryError> {
        let now = Utc::now();
        let collaborator = collaborator::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            full_name: Set(required_text("full_name", &input.full_name)?),
            document_id: Set(required_text("document_id", &input.document_id)?),
            role: Set(required_text("role", &input.role)?),
            phone: Set(optional_text(input.phone)),
            email: Set(checked_email(input.email)?),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        collaborator
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<collaborator::Model>, RepositoryError> {
        Collaborator::find_by_id(id)
            .filter(collaborator::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<collaborator::Model>, RepositoryError> {
        Collaborator::find()
            .filter(collaborator::Column::TenantId.eq(tenant_id))
            .order_by_asc(collaborator::Column::FullName)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: CollaboratorChanges,
    ) -> Result<collaborator::Model, RepositoryError> {
        let existing = self
            .get(tenant_id, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Collaborator {id} not found")))?;

        let mut active = existing.into_active_model();
        if let Some(full_name) = changes.full_name {
            active.full_name = Set(required_text("full_name", &full_name)?);
        }
        if let Some(role) = changes.role {
            active.role = Set(required_text("role", &role)?);
        }
        if changes.phone.is_some() {
            active.phone = Set(optional_text(changes.phone));
        }
        if changes.email.is_some() {
            active.email = Set(checked_email(changes.email)?);
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

fn checked_email(email: Option<String>) -> Result<Option<String>, RepositoryError> {
    match optional_text(email) {
        Some(email) if !email.contains('@') => Err(RepositoryError::validation_error(
            "email must be a valid address",
        )),
        other => Ok(other),
    }
}
