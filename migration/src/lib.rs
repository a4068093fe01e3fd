//! Database migrations for the RentEase API.
//!
//! Tables are created in foreign-key dependency order: users, properties,
//! units, leases, maintenance requests, payments.

pub use sea_orm_migration::prelude::*;

mod m2025_01_06_000001_create_users;
mod m2025_01_06_000002_create_properties;
mod m2025_01_06_000003_create_units;
mod m2025_01_06_000004_create_leases;
mod m2025_01_06_000005_create_maintenance_requests;
mod m2025_01_06_000006_create_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_06_000001_create_users::Migration),
            Box::new(m2025_01_06_000002_create_properties::Migration),
            Box::new(m2025_01_06_000003_create_units::Migration),
            Box::new(m2025_01_06_000004_create_leases::Migration),
            Box::new(m2025_01_06_000005_create_maintenance_requests::Migration),
            Box::new(m2025_01_06_000006_create_payments::Migration),
        ]
    }
}
