//! Migration to create the venue_genres and artist_genres junction tables.
//!
//! Both carry a composite primary key and cascade when the owning venue,
//! artist, or genre row disappears, so genre links never outlive either side.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VenueGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VenueGenres::VenueId).integer().not_null())
                    .col(ColumnDef::new(VenueGenres::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(VenueGenres::VenueId)
                            .col(VenueGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_genres_venue_id")
                            .from(VenueGenres::Table, VenueGenres::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_genres_genre_id")
                            .from(VenueGenres::Table, VenueGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ArtistGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ArtistGenres::ArtistId).integer().not_null())
                    .col(ColumnDef::new(ArtistGenres::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ArtistGenres::ArtistId)
                            .col(ArtistGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_genres_artist_id")
                            .from(ArtistGenres::Table, ArtistGenres::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_genres_genre_id")
                            .from(ArtistGenres::Table, ArtistGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArtistGenres::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(VenueGenres::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VenueGenres {
    Table,
    VenueId,
    GenreId,
}

#[derive(DeriveIden)]
enum ArtistGenres {
    Table,
    ArtistId,
    GenreId,
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

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
}
