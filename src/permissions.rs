//! # Role Permissions
//!
//! Static lookup table from [`Role`] to the `resource:action` permissions it
//! grants. Handlers gate every protected route on one of these.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::Role;

/// A single `resource:action` capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    UsersRead,
    UsersCreate,
    UsersUpdate,
    UsersDelete,
    PropertiesRead,
    PropertiesCreate,
    PropertiesUpdate,
    PropertiesDelete,
    UnitsRead,
    UnitsCreate,
    UnitsUpdate,
    UnitsDelete,
    LeasesRead,
    LeasesCreate,
    LeasesUpdate,
    LeasesDelete,
    TenantsRead,
    MaintenanceRead,
    MaintenanceCreate,
    MaintenanceUpdate,
    MaintenanceDelete,
    PaymentsRead,
    PaymentsCreate,
    PaymentsUpdate,
    PaymentsDelete,
    DocumentsRead,
    DocumentsCreate,
    DocumentsDelete,
    MessagesRead,
    MessagesCreate,
    SettingsUpdate,
}

impl Permission {
    /// Every permission, in table order.
    pub const ALL: &'static [Permission] = &[
        Permission::UsersRead,
        Permission::UsersCreate,
        Permission::UsersUpdate,
        Permission::UsersDelete,
        Permission::PropertiesRead,
        Permission::PropertiesCreate,
        Permission::PropertiesUpdate,
        Permission::PropertiesDelete,
        Permission::UnitsRead,
        Permission::UnitsCreate,
        Permission::UnitsUpdate,
        Permission::UnitsDelete,
        Permission::LeasesRead,
        Permission::LeasesCreate,
        Permission::LeasesUpdate,
        Permission::LeasesDelete,
        Permission::TenantsRead,
        Permission::MaintenanceRead,
        Permission::MaintenanceCreate,
        Permission::MaintenanceUpdate,
        Permission::MaintenanceDelete,
        Permission::PaymentsRead,
        Permission::PaymentsCreate,
        Permission::PaymentsUpdate,
        Permission::PaymentsDelete,
        Permission::DocumentsRead,
        Permission::DocumentsCreate,
        Permission::DocumentsDelete,
        Permission::MessagesRead,
        Permission::MessagesCreate,
        Permission::SettingsUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UsersRead => "users:read",
            Permission::UsersCreate => "users:create",
            Permission::UsersUpdate => "users:update",
            Permission::UsersDelete => "users:delete",
            Permission::PropertiesRead => "properties:read",
            Permission::PropertiesCreate => "properties:create",
            Permission::PropertiesUpdate => "properties:update",
            Permission::PropertiesDelete => "properties:delete",
            Permission::UnitsRead => "units:read",
            Permission::UnitsCreate => "units:create",
            Permission::UnitsUpdate => "units:update",
            Permission::UnitsDelete => "units:delete",
            Permission::LeasesRead => "leases:read",
            Permission::LeasesCreate => "leases:create",
            Permission::LeasesUpdate => "leases:update",
            Permission::LeasesDelete => "leases:delete",
            Permission::TenantsRead => "tenants:read",
            Permission::MaintenanceRead => "maintenance:read",
            Permission::MaintenanceCreate => "maintenance:create",
            Permission::MaintenanceUpdate => "maintenance:update",
            Permission::MaintenanceDelete => "maintenance:delete",
            Permission::PaymentsRead => "payments:read",
            Permission::PaymentsCreate => "payments:create",
            Permission::PaymentsUpdate => "payments:update",
            Permission::PaymentsDelete => "payments:delete",
            Permission::DocumentsRead => "documents:read",
            Permission::DocumentsCreate => "documents:create",
            Permission::DocumentsDelete => "documents:delete",
            Permission::MessagesRead => "messages:read",
            Permission::MessagesCreate => "messages:create",
            Permission::SettingsUpdate => "settings:update",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

const LANDLORD_PERMISSIONS: &[Permission] = &[
    Permission::PropertiesRead,
    Permission::PropertiesCreate,
    Permission::PropertiesUpdate,
    Permission::PropertiesDelete,
    Permission::UnitsRead,
    Permission::UnitsCreate,
    Permission::UnitsUpdate,
    Permission::LeasesRead,
    Permission::LeasesCreate,
    Permission::LeasesUpdate,
    Permission::TenantsRead,
    Permission::MaintenanceRead,
    Permission::MaintenanceUpdate,
    Permission::PaymentsRead,
    Permission::PaymentsCreate,
    Permission::PaymentsUpdate,
    Permission::DocumentsRead,
    Permission::DocumentsCreate,
    Permission::MessagesRead,
    Permission::MessagesCreate,
];

const TENANT_PERMISSIONS: &[Permission] = &[
    Permission::UnitsRead,
    Permission::LeasesRead,
    Permission::MaintenanceRead,
    Permission::MaintenanceCreate,
    Permission::PaymentsRead,
    Permission::PaymentsCreate,
    Permission::DocumentsRead,
    Permission::MessagesRead,
    Permission::MessagesCreate,
];

/// Role to permission table.
pub static ROLE_PERMISSIONS: &[(Role, &[Permission])] = &[
    (Role::Admin, Permission::ALL),
    (Role::Landlord, LANDLORD_PERMISSIONS),
    (Role::Tenant, TENANT_PERMISSIONS),
];

/// Permissions granted to `role`.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    ROLE_PERMISSIONS
        .iter()
        .find(|(candidate, _)| *candidate == role)
        .map(|(_, permissions)| *permissions)
        .unwrap_or(&[])
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}
