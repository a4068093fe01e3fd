//! Database seeding functionality
//!
//! This module populates a fresh database with a small demo portfolio and
//! wipes all domain tables in foreign-key order.

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};

use crate::auth::password::hash_password;
use crate::models::{
    self, LeaseStatus, MaintenancePriority, MaintenanceStatus, PaymentStatus, PaymentType, Role,
};
use crate::repositories::{
    LeaseRepository, MaintenanceRequestRepository, NewLease, NewMaintenanceRequest, NewPayment,
    NewProperty, NewUnit, NewUser, PaymentRepository, PropertyRepository, UnitRepository,
    UserRepository,
};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "Password123";

/// Rows created by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub properties: usize,
    pub units: usize,
    pub leases: usize,
    pub maintenance_requests: usize,
    pub payments: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

struct DemoAccount {
    email: &'static str,
    name: &'static str,
    role: Role,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "admin@rentease.dev",
        name: "Ada Admin",
        role: Role::Admin,
    },
    DemoAccount {
        email: "landlord@rentease.dev",
        name: "Lee Landlord",
        role: Role::Landlord,
    },
    DemoAccount {
        email: "tenant@rentease.dev",
        name: "Tia Tenant",
        role: Role::Tenant,
    },
    DemoAccount {
        email: "tenant2@rentease.dev",
        name: "Tom Tenant",
        role: Role::Tenant,
    },
];

/// Seeds demo accounts and one property with units, leases, maintenance
/// requests and payments.
///
/// Does nothing when any user already exists, so it is safe to run repeatedly.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<SeedSummary> {
    let existing = UserRepository::new(db).count_users().await?;
    if existing > 0 {
        log::info!("Database already has {} user(s), skipping demo seed", existing);
        return Ok(SeedSummary::default());
    }

    let today = Utc::now().date_naive();
    let this_month = today
        .with_day0(0)
        .context("first day of the current month is out of range")?;

    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    let users = UserRepository::new(&txn);
    let mut accounts = Vec::with_capacity(DEMO_ACCOUNTS.len());
    for account in DEMO_ACCOUNTS {
        let password_hash = hash_password(DEMO_PASSWORD)
            .map_err(|e| anyhow::anyhow!("Failed to hash demo password: {e}"))?;
        let user = users
            .create_user(NewUser {
                email: account.email.to_string(),
                password_hash,
                name: account.name.to_string(),
                role: account.role,
            })
            .await?;
        log::info!("Created {} account {}", user.role, user.email);
        accounts.push(user);
    }
    summary.users = accounts.len();
    let (landlord, tenant, second_tenant) = (&accounts[1], &accounts[2], &accounts[3]);

    let property = PropertyRepository::new(&txn)
        .create_property(NewProperty {
            name: "Maple Court".to_string(),
            address: "12 Maple Street, Springfield".to_string(),
            owner_id: landlord.id,
        })
        .await?;
    summary.properties = 1;

    let units = UnitRepository::new(&txn);
    let mut created_units = Vec::new();
    for (number, rent) in [("1A", 1450.0), ("1B", 1300.0), ("2A", 1600.0)] {
        created_units.push(
            units
                .create_unit(NewUnit {
                    property_id: property.id,
                    number: number.to_string(),
                    rent,
                })
                .await?,
        );
    }
    summary.units = created_units.len();
    let unit_1a = units
        .assign_tenant(created_units[0].clone(), Some(tenant.id))
        .await?;
    let unit_1b = units
        .assign_tenant(created_units[1].clone(), Some(second_tenant.id))
        .await?;

    let leases = LeaseRepository::new(&txn);
    let active_start = months_from(this_month, -3)?;
    leases
        .create_lease(NewLease {
            unit_id: unit_1a.id,
            start_date: active_start,
            end_date: months_from(active_start, 12)?
                .pred_opt()
                .context("lease end date out of range")?,
            rent_amount: unit_1a.rent,
            deposit: unit_1a.rent,
            status: LeaseStatus::Active,
        })
        .await?;
    let pending_start = months_from(this_month, 1)?;
    leases
        .create_lease(NewLease {
            unit_id: unit_1b.id,
            start_date: pending_start,
            end_date: months_from(pending_start, 12)?
                .pred_opt()
                .context("lease end date out of range")?,
            rent_amount: unit_1b.rent,
            deposit: unit_1b.rent,
            status: LeaseStatus::Pending,
        })
        .await?;
    summary.leases = 2;

    let requests = MaintenanceRequestRepository::new(&txn);
    requests
        .create_request(NewMaintenanceRequest {
            title: "Leaking kitchen tap".to_string(),
            description: "Cold tap drips constantly, even when fully closed.".to_string(),
            priority: MaintenancePriority::High,
            unit_id: unit_1a.id,
            creator_id: tenant.id,
        })
        .await?;
    let hallway = requests
        .create_request(NewMaintenanceRequest {
            title: "Hallway light out".to_string(),
            description: "Ceiling light by the front door no longer turns on.".to_string(),
            priority: MaintenancePriority::Low,
            unit_id: unit_1a.id,
            creator_id: tenant.id,
        })
        .await?;
    requests
        .update_status(hallway, MaintenanceStatus::InProgress)
        .await?;
    summary.maintenance_requests = 2;

    let payments = PaymentRepository::new(&txn);
    let last_month_rent = payments
        .create_payment(NewPayment {
            amount: unit_1a.rent,
            payment_type: PaymentType::Rent,
            unit_id: unit_1a.id,
            creator_id: tenant.id,
            due_date: Some(months_from(this_month, -1)?),
        })
        .await?;
    payments
        .update_status(last_month_rent, PaymentStatus::Completed)
        .await?;
    payments
        .create_payment(NewPayment {
            amount: unit_1a.rent,
            payment_type: PaymentType::Rent,
            unit_id: unit_1a.id,
            creator_id: tenant.id,
            due_date: Some(this_month),
        })
        .await?;
    payments
        .create_payment(NewPayment {
            amount: unit_1b.rent,
            payment_type: PaymentType::Deposit,
            unit_id: unit_1b.id,
            creator_id: second_tenant.id,
            due_date: Some(pending_start),
        })
        .await?;
    summary.payments = 3;

    txn.commit().await?;
    log::info!("Demo seeding completed: {:?}", summary);
    Ok(summary)
}

/// Deletes every row from the domain tables, children before parents.
pub async fn clean_database(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;

    let payments = models::Payment::delete_many().exec(&txn).await?;
    let requests = models::MaintenanceRequest::delete_many().exec(&txn).await?;
    let leases = models::Lease::delete_many().exec(&txn).await?;
    let units = models::Unit::delete_many().exec(&txn).await?;
    let properties = models::Property::delete_many().exec(&txn).await?;
    let users = models::User::delete_many().exec(&txn).await?;

    txn.commit().await?;
    log::info!(
        "Database cleaned: {} payments, {} maintenance requests, {} leases, {} units, {} properties, {} users",
        payments.rows_affected,
        requests.rows_affected,
        leases.rows_affected,
        units.rows_affected,
        properties.rows_affected,
        users.rows_affected
    );
    Ok(())
}

fn months_from(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.context("seed date out of range")
}
