//! Migration to create the shows table.
//!
//! A show joins one venue and one artist at a start time. The composite
//! unique index on (venue_id, artist_id, start_time) backs the duplicate-show
//! rejection at the storage layer, so two concurrent submissions of the same
//! booking cannot both land. Foreign keys are RESTRICT: a venue with booked
//! shows cannot be deleted out from under them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shows::VenueId).integer().not_null())
                    .col(ColumnDef::new(Shows::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Shows::StartTime).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_venue_id")
                            .from(Shows::Table, Shows::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_artist_id")
                            .from(Shows::Table, Shows::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_venue_artist_start")
                    .table(Shows::Table)
                    .col(Shows::VenueId)
                    .col(Shows::ArtistId)
                    .col(Shows::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing and partitioning walk shows by start time.
        manager
            .create_index(
                Index::create()
                    .name("idx_shows_start_time")
                    .table(Shows::Table)
                    .col(Shows::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_shows_start_time").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_shows_venue_artist_start")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Shows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Shows {
    Table,
    Id,
    VenueId,
    ArtistId,
    StartTime,
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    Id,
}
