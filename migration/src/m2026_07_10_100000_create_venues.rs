//! Migration to create the venues table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venues::Name).text().not_null())
                    .col(ColumnDef::new(Venues::City).text().not_null())
                    .col(ColumnDef::new(Venues::State).text().not_null())
                    .col(ColumnDef::new(Venues::Address).text().not_null())
                    .col(ColumnDef::new(Venues::Phone).text().null())
                    .col(ColumnDef::new(Venues::ImageLink).text().null())
                    .col(ColumnDef::new(Venues::FacebookLink).text().null())
                    .col(ColumnDef::new(Venues::WebsiteLink).text().null())
                    .col(
                        ColumnDef::new(Venues::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Venues::SeekingDescription).text().null())
                    .to_owned(),
            )
            .await?;

        // The grouped listing orders by (state, city); keep that scan cheap.
        manager
            .create_index(
                Index::create()
                    .name("idx_venues_state_city")
                    .table(Venues::Table)
                    .col(Venues::State)
                    .col(Venues::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_venues_state_city").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    ImageLink,
    FacebookLink,
    WebsiteLink,
    SeekingTalent,
    SeekingDescription,
}
