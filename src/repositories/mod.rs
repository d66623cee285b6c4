//! # Repository Layer
//!
//! Repositories wrap SeaORM operations for each entity. Every read and write
//! except tenant creation takes the caller's tenant id and filters on it, so a
//! row belonging to another company is indistinguishable from a missing one.

pub mod associate;
pub mod collaborator;
pub mod collection;
pub mod company_profile;
pub mod invoice;
pub mod invoice_lines;
pub mod loan;
pub mod material;
pub mod purchase_invoice;
pub mod sale_invoice;
pub mod tenant;
pub mod vehicle;

pub use associate::{AssociateRepository, NewAssociate};
pub use collaborator::{CollaboratorChanges, CollaboratorRepository, NewCollaborator};
pub use collection::{CollectionRepository, NewCollection};
pub use company_profile::{CompanyProfileRepository, ProfileFields};
pub use invoice::{InvoiceBook, InvoiceRepository};
pub use invoice_lines::{LineInput, NewInvoice};
pub use loan::{LoanRepository, NewLoan, NewLoanPayment};
pub use material::{MaterialChanges, MaterialRepository, NewMaterial};
pub use purchase_invoice::PurchaseInvoiceRepository;
pub use sale_invoice::SaleInvoiceRepository;
pub use tenant::{CreateTenantRequest, TenantRepository};
pub use vehicle::{NewVehicle, VehicleRepository};

use crate::error::RepositoryError;

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, RepositoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::validation_error(format!(
            "{field} cannot be empty"
        )));
    }
    if trimmed.chars().count() > 255 {
        return Err(RepositoryError::validation_error(format!(
            "{field} cannot exceed 255 characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value, mapping blank strings to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<f64, RepositoryError> {
    if !value.is_finite() || value < 0.0 {
        return Err(RepositoryError::validation_error(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}

pub(crate) fn positive(field: &str, value: f64) -> Result<f64, RepositoryError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RepositoryError::validation_error(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod test_support {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use uuid::Uuid;

    use super::{CreateTenantRequest, TenantRepository};

    /// Fresh in-memory database with the full schema applied.
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory sqlite");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        db
    }

    pub async fn create_tenant(db: &DatabaseConnection, name: &str) -> Uuid {
        TenantRepository::new(db)
            .create_tenant(CreateTenantRequest {
                name: name.to_string(),
            })
            .await
            .expect("Failed to create tenant")
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  PET ").unwrap(), "PET");
        assert!(required_text("name", "   ").is_err());
        assert!(required_text("name", &"x".repeat(256)).is_err());
        // 255 two-byte characters still fit
        assert_eq!(required_text("name", &"ñ".repeat(255)).unwrap().chars().count(), 255);
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" 300 ".to_string())), Some("300".to_string()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn numeric_guards() {
        assert!(non_negative("stock", 0.0).is_ok());
        assert!(non_negative("stock", -1.0).is_err());
        assert!(non_negative("stock", f64::NAN).is_err());
        assert!(positive("amount", 0.0).is_err());
        assert!(positive("amount", 0.5).is_ok());
    }
}
