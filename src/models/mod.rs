//! # Data Models
//!
//! SeaORM entities for the RentEase schema plus the shared enumerations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod enums;
pub mod lease;
pub mod maintenance_request;
pub mod payment;
pub mod property;
pub mod unit;
pub mod user;

pub use enums::{
    LeaseStatus, MaintenancePriority, MaintenanceStatus, PaymentStatus, PaymentType, Role,
};
pub use lease::Entity as Lease;
pub use maintenance_request::Entity as MaintenanceRequest;
pub use payment::Entity as Payment;
pub use property::Entity as Property;
pub use unit::Entity as Unit;
pub use user::{Entity as User, PublicUser};

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
            service: "rentease-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
