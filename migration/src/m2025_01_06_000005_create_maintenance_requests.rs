//! Migration to create the maintenance_requests table.
//!
//! Requests reference both the unit they concern and the user who filed them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::Priority)
                            .string()
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::UnitId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::CreatorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_requests_unit_id")
                            .from(MaintenanceRequests::Table, MaintenanceRequests::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_requests_creator_id")
                            .from(MaintenanceRequests::Table, MaintenanceRequests::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_requests_unit_status")
                    .table(MaintenanceRequests::Table)
                    .col(MaintenanceRequests::UnitId)
                    .col(MaintenanceRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_maintenance_requests_unit_status")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MaintenanceRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MaintenanceRequests {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    UnitId,
    CreatorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
