//! # Genre Repository
//!
//! Genre tags live in their own table and are shared between venues and
//! artists through junction rows. Resolution is by exact, case-sensitive
//! name: an existing row is reused, a missing one is created.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::error::AppError;
use crate::models::genre::{self, Entity as Genre};
use crate::models::{artist, artist_genre, venue, venue_genre};

/// Repository for genre rows and their junction links.
pub struct GenreRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> GenreRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Resolve a tag against existing genre rows, creating the row only when
    /// it is missing.
    pub async fn find_or_create(&self, name: &str) -> Result<genre::Model, AppError> {
        if let Some(existing) = Genre::find()
            .filter(genre::Column::Name.eq(name))
            .one(self.conn)
            .await?
        {
            return Ok(existing);
        }

        let fresh = genre::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        Ok(fresh.insert(self.conn).await?)
    }

    /// Genre names linked to a venue, alphabetical.
    pub async fn names_for_venue(&self, venue: &venue::Model) -> Result<Vec<String>, AppError> {
        let genres = venue
            .find_related(Genre)
            .order_by_asc(genre::Column::Name)
            .all(self.conn)
            .await?;
        Ok(genres.into_iter().map(|g| g.name).collect())
    }

    /// Genre names linked to an artist, alphabetical.
    pub async fn names_for_artist(&self, artist: &artist::Model) -> Result<Vec<String>, AppError> {
        let genres = artist
            .find_related(Genre)
            .order_by_asc(genre::Column::Name)
            .all(self.conn)
            .await?;
        Ok(genres.into_iter().map(|g| g.name).collect())
    }

    /// Replace the genre set linked to a venue with the given tags.
    pub async fn set_venue_genres(&self, venue_id: i32, names: &[String]) -> Result<(), AppError> {
        venue_genre::Entity::delete_many()
            .filter(venue_genre::Column::VenueId.eq(venue_id))
            .exec(self.conn)
            .await?;

        let mut linked = Vec::new();
        let mut links = Vec::new();
        for name in names {
            let genre = self.find_or_create(name).await?;
            if linked.contains(&genre.id) {
                continue;
            }
            linked.push(genre.id);
            links.push(venue_genre::ActiveModel {
                venue_id: Set(venue_id),
                genre_id: Set(genre.id),
            });
        }

        if !links.is_empty() {
            venue_genre::Entity::insert_many(links)
                .exec(self.conn)
                .await?;
        }
        Ok(())
    }

    /// Replace the genre set linked to an artist with the given tags.
    pub async fn set_artist_genres(
        &self,
        artist_id: i32,
        names: &[String],
    ) -> Result<(), AppError> {
        artist_genre::Entity::delete_many()
            .filter(artist_genre::Column::ArtistId.eq(artist_id))
            .exec(self.conn)
            .await?;

        let mut linked = Vec::new();
        let mut links = Vec::new();
        for name in names {
            let genre = self.find_or_create(name).await?;
            if linked.contains(&genre.id) {
                continue;
            }
            linked.push(genre.id);
            links.push(artist_genre::ActiveModel {
                artist_id: Set(artist_id),
                genre_id: Set(genre.id),
            });
        }

        if !links.is_empty() {
            artist_genre::Entity::insert_many(links)
                .exec(self.conn)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn find_or_create_reuses_existing_row() {
        let db = test_db().await;
        let repo = GenreRepository::new(&db);

        let first = repo.find_or_create("Jazz").await.unwrap();
        let second = repo.find_or_create("Jazz").await.unwrap();
        assert_eq!(first.id, second.id);

        let count = Genre::find().count(&db).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn resolution_is_case_sensitive() {
        let db = test_db().await;
        let repo = GenreRepository::new(&db);

        repo.find_or_create("Jazz").await.unwrap();
        repo.find_or_create("jazz").await.unwrap();

        let count = Genre::find().count(&db).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn set_venue_genres_replaces_links_and_dedups() {
        let db = test_db().await;
        let venue = crate::test_support::seed_venue(&db, "The Musical Hop", "San Francisco", "CA")
            .await
            .unwrap();

        let repo = GenreRepository::new(&db);
        repo.set_venue_genres(venue.id, &["Jazz".into(), "Blues".into(), "Jazz".into()])
            .await
            .unwrap();
        assert_eq!(
            repo.names_for_venue(&venue).await.unwrap(),
            vec!["Blues".to_string(), "Jazz".to_string()]
        );

        repo.set_venue_genres(venue.id, &["Folk".into()])
            .await
            .unwrap();
        assert_eq!(
            repo.names_for_venue(&venue).await.unwrap(),
            vec!["Folk".to_string()]
        );

        // Replacing links never deletes the genre rows themselves.
        let count = Genre::find().count(&db).await.unwrap();
        assert_eq!(count, 3);
    }
}
