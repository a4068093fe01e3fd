//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for database entities, providing a clean API for data access with role-scoped methods.

use uuid::Uuid;

pub mod lease;
pub mod maintenance_request;
pub mod payment;
pub mod property;
pub mod unit;
pub mod user;

pub use lease::{LeaseRepository, NewLease};
pub use maintenance_request::{MaintenanceRequestRepository, NewMaintenanceRequest};
pub use payment::{NewPayment, PaymentRepository};
pub use property::{NewProperty, PropertyRepository};
pub use unit::{NewUnit, UnitRepository};
pub use user::{NewUser, UserRepository};

/// Row visibility for the caller of a list or lookup.
///
/// Landlords see what hangs off the properties they own; tenants see what
/// hangs off the units assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    All,
    Owner(Uuid),
    Tenant(Uuid),
}
