//! Material repository
//!
//! The material catalog doubles as the inventory: `stock` is the current
//! on-hand quantity in the material's unit.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{non_negative, optional_text, required_text};
use crate::error::RepositoryError;
use crate::models::material::{self, Entity as Material};

const DEFAULT_UNIT: &str = "kg";

#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub stock: f64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct MaterialChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub stock: Option<f64>,
}

pub struct MaterialRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MaterialRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewMaterial,
    ) -> Result<material::Model, RepositoryError> {
        let now = Utc::now();
        let unit = optional_text(input.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string());

        let material = material::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(required_text("name", &input.name)?),
            category: Set(optional_text(input.category)),
            unit: Set(unit),
            purchase_price: Set(non_negative("purchase_price", input.purchase_price)?),
            sale_price: Set(non_negative("sale_price", input.sale_price)?),
            stock: Set(non_negative("stock", input.stock)?),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        material
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<material::Model>, RepositoryError> {
        Material::find_by_id(id)
            .filter(material::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Catalog listing, alphabetical
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<material::Model>, RepositoryError> {
        Material::find()
            .filter(material::Column::TenantId.eq(tenant_id))
            .order_by_asc(material::Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Inventory listing, highest stock first. Ties fall back to name so the
    /// order is stable.
    pub async fn list_by_stock_desc(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<material::Model>, RepositoryError> {
        Material::find()
            .filter(material::Column::TenantId.eq(tenant_id))
            .order_by_desc(material::Column::Stock)
            .order_by_asc(material::Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Fetch several materials at once, still scoped to the tenant. Ids
    /// belonging to other tenants are simply absent from the result.
    pub async fn find_many(
        &self,
        tenant_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<material::Model>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Material::find()
            .filter(material::Column::TenantId.eq(tenant_id))
            .filter(material::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: MaterialChanges,
    ) -> Result<material::Model, RepositoryError> {
        let existing = self
            .get(tenant_id, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("Material {id} not found")))?;

        let mut active = existing.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(required_text("name", &name)?);
        }
        if let Some(category) = changes.category {
            active.category = Set(optional_text(Some(category)));
        }
        if let Some(unit) = changes.unit {
            active.unit = Set(required_text("unit", &unit)?);
        }
        if let Some(price) = changes.purchase_price {
            active.purchase_price = Set(non_negative("purchase_price", price)?);
        }
        if let Some(price) = changes.sale_price {
            active.sale_price = Set(non_negative("sale_price", price)?);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(non_negative("stock", stock)?);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{create_tenant, setup_test_db};

    fn pet(stock: f64) -> NewMaterial {
        NewMaterial {
            name: "PET".to_string(),
            category: Some("Plásticos".to_string()),
            unit: None,
            purchase_price: 900.0,
            sale_price: 1300.0,
            stock,
        }
    }

    #[tokio::test]
    async fn create_defaults_unit_to_kg() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let repo = MaterialRepository::new(&db);

        let material = repo.create(tenant, pet(120.0)).await.unwrap();
        assert_eq!(material.unit, "kg");
        assert_eq!(material.tenant_id, tenant);
    }

    #[tokio::test]
    async fn create_rejects_negative_values() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let repo = MaterialRepository::new(&db);

        let result = repo.create(tenant, pet(-1.0)).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn get_is_tenant_scoped() {
        let db = setup_test_db().await;
        let owner = create_tenant(&db, "Owner").await;
        let other = create_tenant(&db, "Other").await;
        let repo = MaterialRepository::new(&db);

        let material = repo.create(owner, pet(10.0)).await.unwrap();
        assert!(repo.get(owner, material.id).await.unwrap().is_some());
        assert!(repo.get(other, material.id).await.unwrap().is_none());
        assert!(repo.find_many(other, &[material.id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stock_listing_is_descending() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let repo = MaterialRepository::new(&db);

        for (name, stock) in [("Cartón", 50.0), ("Vidrio", 300.0), ("Cobre", 5.5)] {
            let mut input = pet(stock);
            input.name = name.to_string();
            repo.create(tenant, input).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_by_stock_desc(tenant)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Vidrio", "Cartón", "Cobre"]);
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let db = setup_test_db().await;
        let tenant = create_tenant(&db, "Zycle").await;
        let repo = MaterialRepository::new(&db);
        let material = repo.create(tenant, pet(10.0)).await.unwrap();

        let updated = repo
            .update(
                tenant,
                material.id,
                MaterialChanges {
                    stock: Some(42.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.stock, 42.0);
        assert_eq!(updated.name, "PET");
        assert_eq!(updated.sale_price, 1300.0);

        let missing = repo
            .update(tenant, Uuid::new_v4(), MaterialChanges::default())
            .await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }
}
