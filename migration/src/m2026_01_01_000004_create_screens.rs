//! Migration to create the screens table.
//!
//! Screens are tenant-owned content entries addressed by a normalized path
//! that is unique within each tenant.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Screens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Screens::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Screens::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Screens::Path).text().not_null())
                    .col(
                        ColumnDef::new(Screens::ScreenType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Screens::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Screens::Content).json_binary().not_null())
                    .col(ColumnDef::new(Screens::RedirectTargetUrl).text().null())
                    .col(ColumnDef::new(Screens::RedirectStatus).integer().null())
                    .col(
                        ColumnDef::new(Screens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Screens::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screens_tenant")
                            .from(Screens::Table, Screens::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_screens_tenant_path")
                    .table(Screens::Table)
                    .col(Screens::TenantId)
                    .col(Screens::Path)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Screens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Screens {
    Table,
    Id,
    TenantId,
    Path,
    ScreenType,
    Status,
    Content,
    RedirectTargetUrl,
    RedirectStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
