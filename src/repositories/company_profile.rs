//! Company profile repository
//!
//! One profile per tenant, created on first save and overwritten afterwards.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use super::{optional_text, required_text};
use crate::error::RepositoryError;
use crate::models::company_profile::{self, Entity as CompanyProfile};

/// Editable profile fields captured by the setup form
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub company_name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
}

pub struct CompanyProfileRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyProfileRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<company_profile::Model>, RepositoryError> {
        CompanyProfile::find_by_id(tenant_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Insert the tenant's profile or replace every editable field of the
    /// existing one. `created_at` survives replacement.
    pub async fn upsert(
        &self,
        tenant_id: Uuid,
        fields: ProfileFields,
    ) -> Result<company_profile::Model, RepositoryError> {
        let company_name = required_text("company_name", &fields.company_name)?;
        let email = optional_text(fields.email);
        if let Some(email) = &email
            && !email.contains('@')
        {
            return Err(RepositoryError::validation_error(
                "email must be a valid address",
            ));
        }
        let now = Utc::now();

        match self.get(tenant_id).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.company_name = Set(company_name);
                active.tax_id = Set(optional_text(fields.tax_id));
                active.email = Set(email);
                active.phone = Set(optional_text(fields.phone));
                active.address = Set(optional_text(fields.address));
                active.city = Set(optional_text(fields.city));
                active.logo_url = Set(optional_text(fields.logo_url));
                active.updated_at = Set(now.into());
                active
                    .update(self.db)
                    .await
                    .map_err(RepositoryError::database_error)
            }
            None => {
                let profile = company_profile::ActiveModel {
                    tenant_id: Set(tenant_id),
                    company_name: Set(company_name),
                    tax_id: Set(optional_text(fields.tax_id)),
                    email: Set(email),
                    phone: Set(optional_text(fields.phone)),
                    address: Set(optional_text(fields.address)),
                    city: Set(optional_text(fields.city)),
                    logo_url: Set(optional_text(fields.logo_url)),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                profile
                    .insert(self.db)
                    .await
                    .map_err(RepositoryError::database_error)
            }
        }
    }
}
