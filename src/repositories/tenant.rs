//! # Tenant Repository
//!
//! Tenants are the company accounts that scope every other row.

use crate::error::RepositoryError;
use crate::models::tenant::{
    ActiveModel as TenantActiveModel, Entity as Tenant, Model as TenantModel,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Request data for creating a new tenant
#[derive(Debug, Clone)]
pub struct CreateTenantRequest {
    /// Company display name
    pub name: String,
}

/// Repository for Tenant database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create_tenant(
        &self,
        request: CreateTenantRequest,
    ) -> Result<TenantModel, RepositoryError> {
        let name = validate_tenant_name(&request.name)?;

        let tenant = TenantActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(Some(name)),
            created_at: Set(Utc::now().into()),
        };

        tenant
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get tenant by ID
    pub async fn get_tenant_by_id(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<TenantModel>, RepositoryError> {
        Tenant::find_by_id(tenant_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

/// Company names may carry punctuation ("Reciclajes del Valle S.A.S."), so
/// only blank, oversized, or control-character names are refused.
fn validate_tenant_name(name: &str) -> Result<String, RepositoryError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(RepositoryError::validation_error(
            "Tenant name cannot be empty",
        ));
    }

    if trimmed.len() > 255 {
        return Err(RepositoryError::validation_error(
            "Tenant name cannot exceed 255 characters",
        ));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(RepositoryError::validation_error(
            "Tenant name cannot contain control characters",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup_test_db;

    #[tokio::test]
    async fn test_create_tenant_success() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let tenant = repo
            .create_tenant(CreateTenantRequest {
                name: "  Reciclajes del Valle S.A.S. ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(tenant.name.as_deref(), Some("Reciclajes del Valle S.A.S."));
        assert!(tenant.created_at.timestamp() > 0);
    }

    #[tokio::test]
    async fn test_create_tenant_validation() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        for name in ["", "   ", &"a".repeat(256), "bad\u{0007}name"] {
            let result = repo
                .create_tenant(CreateTenantRequest {
                    name: name.to_string(),
                })
                .await;
            assert!(
                matches!(result, Err(RepositoryError::Validation(_))),
                "name {name:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_get_tenant_by_id() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let created = repo
            .create_tenant(CreateTenantRequest {
                name: "Zycle Demo".to_string(),
            })
            .await
            .unwrap();

        let found = repo.get_tenant_by_id(created.id).await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(created.id));
        assert!(repo.get_tenant_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
