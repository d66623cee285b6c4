//! Database migrations for the ZYCLE API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_01_01_000001_create_tenants;
mod m2026_03_02_090000_create_company_profiles;
mod m2026_03_02_090100_create_materials;
mod m2026_03_02_090200_create_invoices;
mod m2026_03_02_090300_create_collections;
mod m2026_03_02_090400_create_people_and_fleet;
mod m2026_03_02_090500_create_loans;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_01_01_000001_create_tenants::Migration),
            Box::new(m2026_03_02_090000_create_company_profiles::Migration),
            Box::new(m2026_03_02_090100_create_materials::Migration),
            Box::new(m2026_03_02_090200_create_invoices::Migration),
            Box::new(m2026_03_02_090300_create_collections::Migration),
            Box::new(m2026_03_02_090400_create_people_and_fleet::Migration),
            Box::new(m2026_03_02_090500_create_loans::Migration),
        ]
    }
}
