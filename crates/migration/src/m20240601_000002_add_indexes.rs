use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_waste_pickups::WastePickups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Status filter and the completion sweep both scan by status + time
        manager
            .create_index(
                Index::create()
                    .name("idx_waste_pickups_status_time")
                    .table(WastePickups::Table)
                    .col(WastePickups::Status)
                    .col(WastePickups::PickupDateTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_waste_pickups_user")
                    .table(WastePickups::Table)
                    .col(WastePickups::UserName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_waste_pickups_user").table(WastePickups::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_waste_pickups_status_time").table(WastePickups::Table).to_owned())
            .await
    }
}
