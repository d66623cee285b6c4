//! Associate repository

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{optional_text, required_text};
use crate::error::RepositoryError;
use crate::models::associate::{self, Entity as Associate};

#[derive(Debug, Clone)]
pub struct NewAssociate {
    pub name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct AssociateRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssociateRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewAssociate,
    ) -> Result<associate::Model, RepositoryError> {
        let now = Utc::now();
        let associate = associate::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(required_text("name", &input.name)?),
            document_id: Set(optional_text(input.document_id)),
            phone: Set(optional_text(input.phone)),
            address: Set(optional_text(input.address)),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        associate
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<associate::Model>, RepositoryError> {
        Associate::find_by_id(id)
            .filter(associate::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<associate::Model>, RepositoryError> {
        Associate::find()
            .filter(associate::Column::TenantId.eq(tenant_id))
            .order_by_asc(associate::Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
