//! # Data Models
//!
//! This module contains all the data models used throughout the ZYCLE API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod associate;
pub mod collaborator;
pub mod collection;
pub mod company_profile;
pub mod invoice;
pub mod loan;
pub mod loan_payment;
pub mod material;
pub mod purchase_invoice;
pub mod sale_invoice;
pub mod tenant;
pub mod vehicle;

pub use associate::Entity as Associate;
pub use collaborator::Entity as Collaborator;
pub use collection::Entity as Collection;
pub use company_profile::Entity as CompanyProfile;
pub use loan::Entity as Loan;
pub use loan_payment::Entity as LoanPayment;
pub use material::Entity as Material;
pub use purchase_invoice::Entity as PurchaseInvoice;
pub use sale_invoice::Entity as SaleInvoice;
pub use tenant::Entity as Tenant;
pub use vehicle::Entity as Vehicle;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "zycle-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
