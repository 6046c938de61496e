//! Create `waste_pickups` table.
//! One row per pickup request; enums are stored as their canonical names.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WastePickups::Table)
                    .if_not_exists()
                    .col(pk_auto(WastePickups::Id))
                    .col(string_len(WastePickups::WasteType, 16).not_null())
                    .col(string_len(WastePickups::PickupLocation, 512).not_null())
                    .col(date_time(WastePickups::PickupDateTime).not_null())
                    .col(string_len(WastePickups::Status, 16).not_null())
                    .col(string_len(WastePickups::UserName, 256).not_null())
                    .col(date_time(WastePickups::CreationTimestamp).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WastePickups::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum WastePickups {
    Table,
    Id,
    WasteType,
    PickupLocation,
    PickupDateTime,
    Status,
    UserName,
    CreationTimestamp,
}
